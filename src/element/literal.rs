//! Typed literal values and their renderings

use crate::config::{MAX_FRACTION_DIGITS, PARAMETER_SIGIL};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire format of datetime literals
pub const DATETIME_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATETIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static CAST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^cast\(\s*[^,\s][^,]*,\s*'?[A-Za-z_][\w.]*'?\s*\)$").expect("valid cast pattern")
});

static PARAMETER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}[A-Za-z_][A-Za-z0-9_]*$", regex::escape(&PARAMETER_SIGIL.to_string())))
        .expect("valid parameter pattern")
});

/// Value on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Literal {
    Text(String),
    DateTime(NaiveDateTime),
    Int(i64),
    Double(f64),
    Boolean(bool),
    Guid(Uuid),
    /// Rendered verbatim: a cast(expr, type) call or a named parameter
    Expression(String),
}

impl Literal {
    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }

    pub fn expression(value: impl Into<String>) -> Self {
        Literal::Expression(value.into())
    }

    /// Whether this literal is a recognized two-argument cast call
    pub fn is_cast(&self) -> bool {
        matches!(self, Literal::Expression(e) if CAST_PATTERN.is_match(e.trim()))
    }

    /// Whether this literal is a named-parameter placeholder
    pub fn is_parameter(&self) -> bool {
        matches!(self, Literal::Expression(e) if PARAMETER_PATTERN.is_match(e.trim()))
    }

    /// Whether this literal is an empty string
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Literal::Text(s) if s.is_empty())
    }

    /// Render in the wire filter grammar
    pub fn render_wire(&self) -> String {
        match self {
            Literal::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::DateTime(dt) => format!("datetime'{}'", dt.format(DATETIME_WIRE_FORMAT)),
            Literal::Int(i) => i.to_string(),
            Literal::Double(f) => format_decimal(*f),
            Literal::Boolean(b) => b.to_string(),
            Literal::Guid(g) => format!("guid'{}'", g.hyphenated()),
            Literal::Expression(e) => e.clone(),
        }
    }

    /// Render for people
    pub fn render_display(&self) -> String {
        match self {
            Literal::Text(s) => format!("\"{}\"", s),
            Literal::DateTime(dt) => dt.format(DATETIME_DISPLAY_FORMAT).to_string(),
            Literal::Guid(g) => g.hyphenated().to_string(),
            other => other.render_wire(),
        }
    }
}

/// Format a decimal with `.` and at most MAX_FRACTION_DIGITS digits
fn format_decimal(value: f64) -> String {
    let mut s = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value as i64)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(value: NaiveDateTime) -> Self {
        Literal::DateTime(value)
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Literal::Guid(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_text_quoting() {
        assert_eq!(Literal::text("x").render_wire(), "'x'");
        assert_eq!(Literal::text("O'Brien").render_wire(), "'O''Brien'");
        assert_eq!(Literal::text("x").render_display(), "\"x\"");
    }

    #[test]
    fn test_datetime_and_guid() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        assert_eq!(Literal::DateTime(dt).render_wire(), "datetime'2024-01-31T08:05:00'");
        assert_eq!(Literal::DateTime(dt).render_display(), "2024-01-31 08:05:00");

        let g = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        assert_eq!(
            Literal::Guid(g).render_wire(),
            "guid'6f9619ff-8b86-d011-b42d-00c04fc964ff'"
        );
    }

    #[test]
    fn test_decimal_formatting() {
        assert_eq!(Literal::Double(5.5).render_wire(), "5.5");
        assert_eq!(Literal::Double(2.0).render_wire(), "2");
        assert_eq!(Literal::Double(1.0 / 3.0).render_wire(), "0.333333");
        assert_eq!(Literal::Double(-0.0000001).render_wire(), "0");
        assert_eq!(Literal::Double(-12.25).render_wire(), "-12.25");
    }

    #[test]
    fn test_bare_literals() {
        assert_eq!(Literal::Int(5).render_wire(), "5");
        assert_eq!(Literal::Boolean(false).render_wire(), "false");
        assert_eq!(
            Literal::expression("cast(guid'x', 'Catalog_Goods')").render_wire(),
            "cast(guid'x', 'Catalog_Goods')"
        );
    }

    #[test]
    fn test_cast_and_parameter_recognition() {
        assert!(Literal::expression("cast(guid'6f9619ff-8b86-d011-b42d-00c04fc964ff', 'StandardODATA.Catalog_Goods')").is_cast());
        assert!(Literal::expression("cast(Ref_Key, Catalog_Goods)").is_cast());
        assert!(!Literal::expression("cast(Ref_Key)").is_cast());
        assert!(!Literal::text("cast(a, b)").is_cast());

        assert!(Literal::expression("@Owner").is_parameter());
        assert!(!Literal::expression("@1abc").is_parameter());
        assert!(!Literal::expression("Owner").is_parameter());
    }
}

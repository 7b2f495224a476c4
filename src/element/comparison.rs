//! Field/operator/value comparison expression

use crate::config::{Field, FieldKind};
use crate::element::{ComparisonOperator, Literal};
use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// Single comparison like `Code eq '001'`
///
/// A comparison built through [`Comparison::new`] or [`ComparisonBuilder`]
/// always has a field and a value. [`Comparison::blank`] yields the editing
/// placeholder with both unset, which the tree validator reports as
/// incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComparisonRecord")]
pub struct Comparison {
    field: Option<Field>,
    operator: ComparisonOperator,
    value: Option<Literal>,
    comment: Option<String>,
}

/// Persisted shape of a comparison, checked on the way in
#[derive(Deserialize)]
struct ComparisonRecord {
    field: Option<Field>,
    operator: Option<ComparisonOperator>,
    value: Option<Literal>,
    #[serde(default)]
    comment: Option<String>,
}

impl TryFrom<ComparisonRecord> for Comparison {
    type Error = FilterError;

    fn try_from(record: ComparisonRecord) -> Result<Self> {
        ComparisonBuilder {
            field: record.field,
            operator: record.operator,
            value: record.value,
            comment: record.comment,
        }
        .build()
    }
}

impl Comparison {
    /// Create a complete comparison
    pub fn new(field: Field, operator: ComparisonOperator, value: impl Into<Literal>) -> Result<Self> {
        let value = value.into();
        check_variant_literal(&field, &value)?;
        Ok(Self {
            field: Some(field),
            operator,
            value: Some(value),
            comment: None,
        })
    }

    pub fn builder() -> ComparisonBuilder {
        ComparisonBuilder::default()
    }

    /// Editing placeholder with no field and no value
    pub fn blank() -> Self {
        Self {
            field: None,
            operator: ComparisonOperator::Equal,
            value: None,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the field; fails if the current value does not suit it
    pub fn set_field(&mut self, field: Field) -> Result<()> {
        if let Some(value) = &self.value {
            check_variant_literal(&field, value)?;
        }
        self.field = Some(field);
        Ok(())
    }

    pub fn set_operator(&mut self, operator: ComparisonOperator) {
        self.operator = operator;
    }

    /// Replace the value; fails if it does not suit the current field
    pub fn set_value(&mut self, value: impl Into<Literal>) -> Result<()> {
        let value = value.into();
        if let Some(field) = &self.field {
            check_variant_literal(field, &value)?;
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Whether the comparison can be compiled into a filter
    pub fn is_complete(&self) -> bool {
        match (&self.field, &self.value) {
            (Some(field), Some(value)) => !(value.is_empty_text() && field.kind != FieldKind::Text),
            _ => false,
        }
    }

    pub fn render_wire(&self) -> String {
        self.render_with(self.operator.wire_token(), Literal::render_wire)
    }

    pub fn render_display(&self) -> String {
        self.render_with(self.operator.display_token(), Literal::render_display)
    }

    fn render_with(&self, operator: &str, literal: fn(&Literal) -> String) -> String {
        let name = self.field.as_ref().map(|f| f.name.as_str()).unwrap_or_default();
        let value = self.value.as_ref().map(literal).unwrap_or_default();
        format!("{} {} {}", name, operator, value).trim().to_string()
    }
}

/// Step-by-step construction that reports every missing part
#[derive(Debug, Clone, Default)]
pub struct ComparisonBuilder {
    field: Option<Field>,
    operator: Option<ComparisonOperator>,
    value: Option<Literal>,
    comment: Option<String>,
}

impl ComparisonBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.field = Some(field);
        self
    }

    pub fn operator(mut self, operator: ComparisonOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn value(mut self, value: impl Into<Literal>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn build(self) -> Result<Comparison> {
        let field = self
            .field
            .ok_or_else(|| FilterError::InvalidArgument("comparison field is required".to_string()))?;
        let operator = self.operator.ok_or_else(|| {
            FilterError::InvalidArgument("comparison operator is required".to_string())
        })?;
        let value = self
            .value
            .ok_or_else(|| FilterError::InvalidArgument("comparison value is required".to_string()))?;

        let mut comparison = Comparison::new(field, operator, value)?;
        comparison.comment = self.comment;
        Ok(comparison)
    }
}

/// Variant-typed fields only accept cast calls and parameter placeholders
fn check_variant_literal(field: &Field, value: &Literal) -> Result<()> {
    if field.variant_typed && !(value.is_cast() || value.is_parameter()) {
        return Err(FilterError::InvalidArgument(format!(
            "variant-typed field '{}' requires a cast(expr, type) literal or a parameter, got {}",
            field.name,
            value.render_wire()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field() -> Field {
        Field::new("Field1", FieldKind::Text)
    }

    #[test]
    fn test_render_comparison() {
        let cmp = Comparison::new(text_field(), ComparisonOperator::Equal, "x").unwrap();
        assert_eq!(cmp.render_wire(), "Field1 eq 'x'");
        assert_eq!(cmp.render_display(), "Field1 = \"x\"");

        let cmp = Comparison::new(
            Field::new("Qty", FieldKind::Int32),
            ComparisonOperator::LessOrEqual,
            5,
        )
        .unwrap();
        assert_eq!(cmp.render_wire(), "Qty le 5");
        assert_eq!(cmp.render_display(), "Qty <= 5");
    }

    #[test]
    fn test_builder_reports_missing_parts() {
        let err = Comparison::builder()
            .operator(ComparisonOperator::Equal)
            .value(1)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidArgument("comparison field is required".to_string())
        );

        let err = Comparison::builder().field(text_field()).value("x").build().unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(msg) if msg.contains("operator")));

        let err = Comparison::builder()
            .field(text_field())
            .operator(ComparisonOperator::Equal)
            .build()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(msg) if msg.contains("value")));

        let cmp = Comparison::builder()
            .field(text_field())
            .operator(ComparisonOperator::NotEqual)
            .value("y")
            .comment("exclude y")
            .build()
            .unwrap();
        assert_eq!(cmp.comment(), Some("exclude y"));
    }

    #[test]
    fn test_variant_typed_field_requires_cast_or_parameter() {
        let owner = Field::new("Owner", FieldKind::Guid).variant_typed();

        let err = Comparison::new(owner.clone(), ComparisonOperator::Equal, "abc").unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));

        let cast = Literal::expression(
            "cast(guid'6f9619ff-8b86-d011-b42d-00c04fc964ff', 'StandardODATA.Catalog_Partners')",
        );
        let cmp = Comparison::new(owner.clone(), ComparisonOperator::Equal, cast).unwrap();
        assert_eq!(
            cmp.render_wire(),
            "Owner eq cast(guid'6f9619ff-8b86-d011-b42d-00c04fc964ff', 'StandardODATA.Catalog_Partners')"
        );

        assert!(Comparison::new(owner, ComparisonOperator::Equal, Literal::expression("@Owner")).is_ok());
    }

    #[test]
    fn test_setters_recheck_variant_literal() {
        let mut cmp = Comparison::blank();
        cmp.set_value("plain").unwrap();
        let err = cmp.set_field(Field::new("Owner", FieldKind::Guid).variant_typed());
        assert!(err.is_err());
        assert!(cmp.field().is_none());

        cmp.set_field(text_field()).unwrap();
        assert!(cmp.is_complete());
    }

    #[test]
    fn test_completeness() {
        assert!(!Comparison::blank().is_complete());

        let mut cmp = Comparison::blank();
        cmp.set_field(Field::new("Qty", FieldKind::Int32)).unwrap();
        assert!(!cmp.is_complete());
        cmp.set_value("").unwrap();
        assert!(!cmp.is_complete());
        cmp.set_value(3).unwrap();
        assert!(cmp.is_complete());

        let empty_text = Comparison::new(text_field(), ComparisonOperator::Equal, "").unwrap();
        assert!(empty_text.is_complete());
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let ok: Comparison = serde_json::from_str(
            r#"{"field":{"name":"Qty","kind":"Int32"},"operator":"Greater","value":{"type":"Int","value":3}}"#,
        )
        .unwrap();
        assert_eq!(ok.render_wire(), "Qty gt 3");

        let missing = serde_json::from_str::<Comparison>(
            r#"{"field":{"name":"Qty","kind":"Int32"},"operator":"Greater","value":null}"#,
        );
        assert!(missing.is_err());

        let bad_variant = serde_json::from_str::<Comparison>(
            r#"{"field":{"name":"Owner","kind":"Guid","variant_typed":true},"operator":"Equal","value":{"type":"Text","value":"x"}}"#,
        );
        assert!(bad_variant.is_err());
    }
}

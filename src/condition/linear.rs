//! Linear (flat, order-preserving) filter condition

use crate::config::Field;
use crate::element::{Comparison, LogicalConnective};
use crate::error::{FilterError, Result};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One entry of a linear condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "element")]
pub enum FilterElement {
    Comparison(Comparison),
    Connective(LogicalConnective),
    /// Parenthesized sub-expression
    Group(Condition),
}

impl FilterElement {
    #[inline]
    pub fn is_connective(&self, connective: LogicalConnective) -> bool {
        matches!(self, FilterElement::Connective(c) if *c == connective)
    }

    /// Whether this element is `and` or `or`
    #[inline]
    pub fn is_binary_connective(&self) -> bool {
        matches!(self, FilterElement::Connective(c) if c.is_binary())
    }

    fn render(&self, style: Rendering) -> String {
        match self {
            FilterElement::Comparison(c) => match style {
                Rendering::Wire => c.render_wire(),
                Rendering::Display => c.render_display(),
            },
            FilterElement::Connective(c) => match style {
                Rendering::Wire => format!(" {} ", c.wire_token()),
                Rendering::Display => format!(" {} ", c.display_token()),
            },
            FilterElement::Group(g) => format!("({})", g.render(style)),
        }
    }
}

impl From<Comparison> for FilterElement {
    fn from(value: Comparison) -> Self {
        FilterElement::Comparison(value)
    }
}

impl From<LogicalConnective> for FilterElement {
    fn from(value: LogicalConnective) -> Self {
        FilterElement::Connective(value)
    }
}

impl From<Condition> for FilterElement {
    fn from(value: Condition) -> Self {
        FilterElement::Group(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum Rendering {
    Wire,
    Display,
}

/// Ordered sequence of filter elements
///
/// Grows only through [`Condition::append`], which refuses to place `not`
/// anywhere other than the start of the sequence or right after `and`/`or`.
/// Equality and hashing are defined over [`Condition::render_wire`], so the
/// same elements in a different order are a different condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FilterElement>", into = "Vec<FilterElement>")]
pub struct Condition {
    elements: Vec<FilterElement>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a condition from a single element
    pub fn from_element(element: impl Into<FilterElement>) -> Self {
        Self {
            elements: vec![element.into()],
        }
    }

    /// Append an element at the end of the sequence
    pub fn append(&mut self, element: impl Into<FilterElement>) -> Result<&mut Self> {
        let element = element.into();
        if element.is_connective(LogicalConnective::Not) {
            if let Some(last) = self.elements.last() {
                if !last.is_binary_connective() {
                    return Err(FilterError::InvalidState(format!(
                        "'not' cannot follow '{}'",
                        last.render(Rendering::Wire).trim()
                    )));
                }
            }
        }
        self.elements.push(element);
        Ok(self)
    }

    pub fn elements(&self) -> &[FilterElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Filter string in the wire grammar
    pub fn render_wire(&self) -> String {
        self.render(Rendering::Wire)
    }

    /// Same structure with human-readable operators and connectives
    pub fn render_display(&self) -> String {
        self.render(Rendering::Display)
    }

    fn render(&self, style: Rendering) -> String {
        let mut out = String::new();
        for element in &self.elements {
            let piece = element.render(style);
            // collapse the space shared by two adjacent pieces
            if out.ends_with(' ') && piece.starts_with(' ') {
                out.push_str(&piece[1..]);
            } else {
                out.push_str(&piece);
            }
        }
        out.trim().to_string()
    }

    /// Every field referenced by a comparison, through nested conditions
    pub fn collect_filter_fields(&self) -> AHashSet<Field> {
        let mut fields = AHashSet::new();
        self.collect_into(&mut fields);
        fields
    }

    fn collect_into(&self, fields: &mut AHashSet<Field>) {
        for element in &self.elements {
            match element {
                FilterElement::Comparison(c) => {
                    if let Some(field) = c.field() {
                        fields.insert(field.clone());
                    }
                }
                FilterElement::Group(g) => g.collect_into(fields),
                FilterElement::Connective(_) => {}
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a persisted condition, re-checking every construction rule
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TryFrom<Vec<FilterElement>> for Condition {
    type Error = FilterError;

    fn try_from(elements: Vec<FilterElement>) -> Result<Self> {
        let mut condition = Condition::new();
        for element in elements {
            condition.append(element)?;
        }
        Ok(condition)
    }
}

impl From<Condition> for Vec<FilterElement> {
    fn from(condition: Condition) -> Self {
        condition.elements
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.render_wire() == other.render_wire()
    }
}

impl Eq for Condition {}

impl Hash for Condition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.render_wire().hash(state);
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_wire())
    }
}

//! Field descriptor structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Primitive type of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    DateTime,
    Int16,
    Int32,
    Int64,
    Double,
    Boolean,
    Guid,
    Binary,
    Stream,
}

impl FieldKind {
    /// Whether values of this kind are integers
    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, FieldKind::Int16 | FieldKind::Int32 | FieldKind::Int64)
    }
}

/// Queryable attribute of a remote entity
///
/// Two fields are equal when their names are equal; the remaining flags are
/// metadata carried along for the consumers of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    /// Field has a human-readable text counterpart
    #[serde(default)]
    pub display_text: bool,
    /// Field holds values of several types (composite reference)
    #[serde(default)]
    pub variant_typed: bool,
}

impl Field {
    /// Create a plain field of the given kind
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            display_text: false,
            variant_typed: false,
        }
    }

    /// Mark the field as variant-typed
    pub fn variant_typed(mut self) -> Self {
        self.variant_typed = true;
        self
    }

    /// Mark the field as having a display text counterpart
    pub fn with_display_text(mut self) -> Self {
        self.display_text = true;
        self
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_equal_by_name() {
        let a = Field::new("Code", FieldKind::Text);
        let b = Field::new("Code", FieldKind::Int32).variant_typed();
        assert_eq!(a, b);
        assert_ne!(a, Field::new("Description", FieldKind::Text));
    }

    #[test]
    fn test_deserialize_defaults_flags() {
        let field: Field = serde_json::from_str(r#"{"name":"Ref_Key","kind":"Guid"}"#).unwrap();
        assert_eq!(field.kind, FieldKind::Guid);
        assert!(!field.display_text);
        assert!(!field.variant_typed);
    }
}

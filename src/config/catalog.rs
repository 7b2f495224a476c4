//! Read-only field catalog

use crate::config::Field;
use crate::error::Result;
use ahash::AHashMap;
use serde::Deserialize;

/// Name-indexed lookup of the fields an entity exposes
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: AHashMap<String, Field>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    fields: Vec<Field>,
}

impl FieldCatalog {
    /// Build a catalog from a list of fields; later duplicates win
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut map = AHashMap::new();
        for field in fields {
            map.insert(field.name.clone(), field);
        }
        Self { fields: map }
    }

    /// Load a catalog from a JSON document
    /// Expected format: {"fields": [{"name": ..., "kind": ..., ...}, ...]}
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        log::debug!("loaded field catalog with {} fields", doc.fields.len());
        Ok(Self::from_fields(doc.fields))
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }
}

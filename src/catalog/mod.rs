mod catalog_error;

pub use catalog_error::CatalogError;

use crate::domain::{PropertyId, PropertyRecord};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The full, read-only property list for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<PropertyRecord>,
    by_id: HashMap<PropertyId, usize>,
}

impl Catalog {
    /// Validates records: every city must be non-blank and ids unique.
    pub fn from_records(records: Vec<PropertyRecord>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            if record.city.trim().is_empty() {
                return Err(CatalogError::EmptyCity(record.id));
            }
            if by_id.insert(record.id, idx).is_some() {
                return Err(CatalogError::DuplicateId(record.id));
            }
        }

        Ok(Self { records, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<PropertyRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Load the catalog file once at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        if catalog.is_empty() {
            warn!(path = %path.display(), "catalog has no records");
        }
        info!(path = %path.display(), records = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyRecord> {
        self.by_id.get(&id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

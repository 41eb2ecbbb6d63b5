use crate::domain::PropertyId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Catalog JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Property {0} has an empty city")]
    EmptyCity(PropertyId),
    #[error("Duplicate property id {0}")]
    DuplicateId(PropertyId),
}

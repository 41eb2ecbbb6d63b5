// errors.rs
use crate::catalog::CatalogError;
use astra::Response;
use thiserror::Error;

/// Errors surfaced to the browser. Geocode failures never get here; they
/// turn into unmapped records.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("No explorer session")]
    NoSession,
    #[error("Catalog Error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) | ServerError::NoSession => 400,
            ServerError::Catalog(_) | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

use thiserror::Error;

/// Why a single lookup failed. Callers treat every variant the same way as
/// "no results"; the detail only reaches the logs.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Geocoder HTTP status {0}")]
    Status(u16),
    #[error("Geocoder returned {status}: {message}")]
    Provider { status: String, message: String },
    #[error("Response parse error: {0}")]
    Parse(String),
    #[error("Geocoder config error: {0}")]
    Config(String),
}

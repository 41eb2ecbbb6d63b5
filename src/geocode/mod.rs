mod fixture;
mod geocode_error;
mod google;
mod models;

pub use fixture::FixtureGeocoder;
pub use geocode_error::GeocodeError;
pub use google::{GoogleGeocoder, DEFAULT_TIMEOUT, GOOGLE_GEOCODE_BASE};

use crate::domain::GeoPoint;

/// Turns a free-text address into candidate locations, best first.
///
/// An empty vector means the provider found nothing. Implementations are
/// shared between request threads and geocode workers.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Vec<GeoPoint>, GeocodeError>;
}

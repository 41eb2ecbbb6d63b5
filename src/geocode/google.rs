// google.rs
use crate::domain::GeoPoint;
use crate::geocode::models::parse_response;
use crate::geocode::{GeocodeError, Geocoder};
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

pub const GOOGLE_GEOCODE_BASE: &str = "https://maps.googleapis.com/maps/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("property_explorer/", env!("CARGO_PKG_VERSION"));

/// Google Geocoding API over blocking reqwest. One request per call, no retry.
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &Url,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeocodeError::Config("missing geocoding API key".into()));
        }

        let endpoint = base_url
            .join("geocode/json")
            .map_err(|e| GeocodeError::Config(format!("bad geocoder base url: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn request_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);
        url
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<Vec<GeoPoint>, GeocodeError> {
        let resp = self
            .client
            .get(self.request_url(address))
            .send()
            .map_err(|e| GeocodeError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.without_url().to_string()))?;

        parse_response(&body)
    }
}

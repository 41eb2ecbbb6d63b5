use crate::domain::GeoPoint;
use crate::geocode::GeocodeError;
use serde::Deserialize;

// response
//  ├── status            "OK" | "ZERO_RESULTS" | error code
//  ├── error_message     (only on errors)
//  └── results[]
//       └── geometry
//            └── location
//                 ├── lat
//                 └── lng

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for GeoPoint {
    fn from(l: LatLng) -> Self {
        GeoPoint::new(l.lat, l.lng)
    }
}

impl GeocodeResponse {
    /// Locations in provider order. `ZERO_RESULTS` is an empty list, any other
    /// non-OK status is an error.
    pub fn into_points(self) -> Result<Vec<GeoPoint>, GeocodeError> {
        match self.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => Ok(self
                .results
                .into_iter()
                .map(|r| r.geometry.location.into())
                .collect()),
            Some(other) => Err(GeocodeError::Provider {
                status: other.to_string(),
                message: self.error_message.unwrap_or_default(),
            }),
        }
    }
}

pub fn parse_response(body: &str) -> Result<Vec<GeoPoint>, GeocodeError> {
    let response: GeocodeResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;
    response.into_points()
}

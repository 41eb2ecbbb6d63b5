use crate::domain::GeoPoint;
use crate::geocode::{GeocodeError, Geocoder};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Offline geocoder backed by an address → point table.
///
/// The fixture file is a JSON object: `{"Villa A, Dubai": {"lat": .., "lng": ..}}`.
/// Addresses compare case-insensitively; unknown addresses have no results.
/// A `null` entry makes lookups for that address fail like a dropped
/// connection.
#[derive(Debug, Default)]
pub struct FixtureGeocoder {
    points: HashMap<String, GeoPoint>,
    failing: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureGeocoder {
    pub fn new<I, S>(points: I) -> Self
    where
        I: IntoIterator<Item = (S, GeoPoint)>,
        S: AsRef<str>,
    {
        Self {
            points: points
                .into_iter()
                .map(|(address, point)| (normalize(address.as_ref()), point))
                .collect(),
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| GeocodeError::Config(format!("read {}: {e}", path.display())))?;
        let table: HashMap<String, Option<GeoPoint>> =
            serde_json::from_str(&json).map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let failing: Vec<_> = table
            .iter()
            .filter(|(_, point)| point.is_none())
            .map(|(address, _)| address.clone())
            .collect();
        let geocoder = Self::new(
            table
                .into_iter()
                .filter_map(|(address, point)| Some((address, point?))),
        );
        Ok(failing
            .iter()
            .fold(geocoder, |geocoder, address| geocoder.with_failure(address)))
    }

    /// Make lookups for `address` fail as if the network dropped.
    pub fn with_failure(mut self, address: &str) -> Self {
        self.failing.insert(normalize(address));
        self
    }

    /// Addresses looked up so far, in call order.
    #[cfg(test)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Geocoder for FixtureGeocoder {
    fn geocode(&self, address: &str) -> Result<Vec<GeoPoint>, GeocodeError> {
        let lookups = {
            let mut requests = self.requests.lock();
            requests.push(address.to_string());
            requests.len()
        };
        debug!(address, lookups, "fixture lookup");

        let key = normalize(address);
        if self.failing.contains(&key) {
            return Err(GeocodeError::Network(format!("fixture failure for {address}")));
        }
        Ok(self.points.get(&key).copied().into_iter().collect())
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

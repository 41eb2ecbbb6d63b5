// src/config.rs
use crate::explorer::ExplorerConfig;
use crate::explorer::view_sync::DEFAULT_CLUSTER_CELL_DEGREES;
use crate::geocode::{
    FixtureGeocoder, GeocodeError, Geocoder, GoogleGeocoder, DEFAULT_TIMEOUT, GOOGLE_GEOCODE_BASE,
};
use crate::search::CityDedup;
use crate::sessions::DEFAULT_MAX_SESSIONS;
use crate::state::Dispatch;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeocoderKind {
    /// Google Geocoding API (needs an API key).
    Google,
    /// Offline lookups from a JSON address table.
    Fixture,
}

/// Browse a property catalog as a searchable list and map.
#[derive(Debug, Clone, Parser)]
#[command(name = "property_explorer", version)]
pub struct AppConfig {
    #[arg(long, env = "EXPLORER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// JSON array of property records.
    #[arg(long, env = "EXPLORER_CATALOG", default_value = "data/properties.json")]
    pub catalog: PathBuf,

    #[arg(long, value_enum, default_value_t = GeocoderKind::Fixture)]
    pub geocoder: GeocoderKind,

    #[arg(long, default_value = "data/geocode_fixture.json")]
    pub geocode_fixture: PathBuf,

    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub geocode_api_key: Option<String>,

    #[arg(long, default_value = GOOGLE_GEOCODE_BASE)]
    pub geocode_base_url: Url,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub geocode_timeout_secs: u64,

    #[arg(long, default_value_t = 25)]
    pub page_size: usize,

    #[arg(long, default_value_t = 50)]
    pub match_limit: usize,

    #[arg(long, default_value_t = DEFAULT_CLUSTER_CELL_DEGREES)]
    pub cluster_cell_degrees: f64,

    /// How duplicate city names collapse in suggestions:
    /// case-insensitive or case-sensitive.
    #[arg(long, default_value_t = CityDedup::CaseInsensitive)]
    pub city_dedup: CityDedup,

    #[arg(long, default_value_t = 1800)]
    pub session_ttl_secs: u64,

    /// Live sessions kept before the least recently seen is dropped.
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Run geocode batches on a spawned thread (background) or on the
    /// request thread (inline).
    #[arg(long, value_enum, default_value_t = Dispatch::Background)]
    pub dispatch: Dispatch,

    #[arg(long, default_value_t = 8)]
    pub max_workers: usize,
}

impl AppConfig {
    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            page_size: self.page_size,
            match_limit: self.match_limit,
            cluster_cell_degrees: self.cluster_cell_degrees,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_secs)
    }

    pub fn build_geocoder(&self) -> Result<Arc<dyn Geocoder>, GeocodeError> {
        match self.geocoder {
            GeocoderKind::Google => {
                let key = self.geocode_api_key.clone().ok_or_else(|| {
                    GeocodeError::Config(
                        "--geocoder google needs --geocode-api-key or GOOGLE_MAPS_API_KEY".into(),
                    )
                })?;
                let geocoder =
                    GoogleGeocoder::new(key, &self.geocode_base_url, self.geocode_timeout())?;
                info!(base = %self.geocode_base_url, "using google geocoder");
                Ok(Arc::new(geocoder))
            }
            GeocoderKind::Fixture => {
                let geocoder = FixtureGeocoder::load(&self.geocode_fixture)?;
                info!(path = %self.geocode_fixture.display(), "using fixture geocoder");
                Ok(Arc::new(geocoder))
            }
        }
    }
}

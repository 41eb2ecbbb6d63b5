// src/state.rs
use crate::catalog::Catalog;
use crate::errors::ServerError;
use crate::explorer::{
    run_batch, spawn_batch, Explorer, ExplorerConfig, GeocodeBatch, SharedExplorer,
};
use crate::geocode::Geocoder;
use crate::search::CityDedup;
use crate::sessions::{SessionHandle, SessionStore};
use clap::ValueEnum;
use std::sync::Arc;
use std::time::Duration;

/// Where geocode batches run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Dispatch {
    /// A spawned thread per batch; the request returns straight away.
    #[default]
    Background,
    /// On the request thread, before the response is built.
    Inline,
}

/// Everything request handlers share.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub geocoder: Arc<dyn Geocoder>,
    pub sessions: SessionStore,
    pub explorer_config: ExplorerConfig,
    pub city_dedup: CityDedup,
    pub dispatch: Dispatch,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            catalog,
            geocoder,
            sessions: SessionStore::default(),
            explorer_config: ExplorerConfig::default(),
            city_dedup: CityDedup::default(),
            dispatch: Dispatch::default(),
        }
    }

    pub fn with_explorer_config(mut self, config: ExplorerConfig) -> Self {
        self.explorer_config = config;
        self
    }

    pub fn with_city_dedup(mut self, dedup: CityDedup) -> Self {
        self.city_dedup = dedup;
        self
    }

    pub fn with_session_limits(mut self, ttl: Duration, max_sessions: usize) -> Self {
        self.sessions = SessionStore::new(ttl, max_sessions);
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// The caller's session, starting one if the token is missing or gone.
    pub fn session(&self, token: Option<&str>) -> SessionHandle {
        self.sessions.get_or_create(token, || {
            Explorer::new(self.catalog.clone(), self.explorer_config.clone())
        })
    }

    /// The caller's live session. Fragment routes use this so that only a
    /// page load can start one.
    pub fn existing_session(&self, token: Option<&str>) -> Result<SessionHandle, ServerError> {
        self.sessions.get(token).ok_or(ServerError::NoSession)
    }

    /// Start geocoding `batch` for `explorer`. The caller must not hold the
    /// explorer lock.
    pub fn dispatch(&self, explorer: &SharedExplorer, batch: Option<GeocodeBatch>) {
        let Some(batch) = batch else {
            return;
        };

        match self.dispatch {
            Dispatch::Background => {
                spawn_batch(explorer.clone(), self.geocoder.clone(), batch);
            }
            Dispatch::Inline => {
                run_batch(explorer, self.geocoder.as_ref(), batch);
            }
        }
    }
}

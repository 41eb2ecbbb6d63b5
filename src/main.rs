use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::responses::error_response;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

mod catalog;
mod config;
mod cookies;
mod domain;
mod errors;
mod explorer;
mod geocode;
mod logging;
mod responses;
mod router;
mod search;
mod sessions;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let config = AppConfig::parse();

    if let Err(e) = logging::init() {
        eprintln!("logging init failed: {e}");
    }

    // 1. Catalog, shared read-only by every session
    let catalog = match Catalog::load(&config.catalog) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!(path = %config.catalog.display(), error = %e, "failed to load catalog");
            std::process::exit(1);
        }
    };

    // 2. Geocoder
    let geocoder = match config.build_geocoder() {
        Ok(geocoder) => geocoder,
        Err(e) => {
            error!(error = %e, "failed to set up geocoder");
            std::process::exit(1);
        }
    };

    let state = AppState::new(catalog, geocoder)
        .with_explorer_config(config.explorer_config())
        .with_city_dedup(config.city_dedup)
        .with_session_limits(config.session_ttl(), config.max_sessions)
        .with_dispatch(config.dispatch);

    // 3. Serve
    info!(addr = %config.addr, workers = config.max_workers, "starting server");
    let server = Server::bind(&config.addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        std::process::exit(1);
    }

    info!("server shut down cleanly");
}

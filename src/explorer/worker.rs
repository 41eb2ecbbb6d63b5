// src/explorer/worker.rs

use crate::domain::PropertyId;
use crate::explorer::pipeline::Explorer;
use crate::explorer::resolver::{GeocodeBatch, GeocodeOutcome, Merge};
use crate::geocode::Geocoder;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

pub type SharedExplorer = Arc<Mutex<Explorer>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub located: usize,
    pub unmapped: usize,
    /// Lookups skipped or dropped because the query moved on.
    pub abandoned: usize,
}

/// One lookup. Errors and empty result lists both mean "unmapped"; the
/// first result wins.
pub fn lookup(geocoder: &dyn Geocoder, id: PropertyId, address: &str) -> GeocodeOutcome {
    match geocoder.geocode(address) {
        Ok(points) => match points.first() {
            Some(point) => GeocodeOutcome::Located(*point),
            None => {
                debug!(%id, address, "no geocode results");
                GeocodeOutcome::Unmapped
            }
        },
        Err(e) => {
            warn!(%id, address, error = %e, "geocode lookup failed");
            GeocodeOutcome::Unmapped
        }
    }
}

/// Run a batch against a shared explorer, one lookup at a time. The lock is
/// only held to check the generation and merge, never across a lookup.
/// Stops early once the explorer has moved on to a newer query.
pub fn run_batch(explorer: &Mutex<Explorer>, geocoder: &dyn Geocoder, batch: GeocodeBatch) -> BatchReport {
    let mut report = BatchReport::default();
    let total = batch.jobs.len();

    for (done, job) in batch.jobs.into_iter().enumerate() {
        if !explorer.lock().is_current(batch.generation) {
            report.abandoned += total - done;
            debug!(generation = batch.generation, skipped = total - done, "abandoning stale geocode batch");
            break;
        }

        let outcome = lookup(geocoder, job.id, &job.address);

        match explorer.lock().settle(batch.generation, job.id, outcome) {
            Merge::Applied => match outcome {
                GeocodeOutcome::Located(_) => report.located += 1,
                GeocodeOutcome::Unmapped => report.unmapped += 1,
            },
            Merge::Stale | Merge::Unknown => report.abandoned += 1,
        }
    }

    debug!(
        generation = batch.generation,
        located = report.located,
        unmapped = report.unmapped,
        abandoned = report.abandoned,
        "geocode batch finished"
    );
    report
}

/// Run `batch` on its own thread.
pub fn spawn_batch(
    explorer: SharedExplorer,
    geocoder: Arc<dyn Geocoder>,
    batch: GeocodeBatch,
) -> thread::JoinHandle<BatchReport> {
    thread::spawn(move || run_batch(&explorer, geocoder.as_ref(), batch))
}

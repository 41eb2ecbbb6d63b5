// src/explorer/resolver.rs

use crate::domain::{GeoPoint, PropertyId, PropertyRecord};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Bumped on every query change. Outcomes tagged with an older value are stale.
pub type Generation = u64;

/// Terminal state of one geocode lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    Located(GeoPoint),
    Unmapped,
}

/// A record that made it onto the map.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeEntry<'a> {
    pub property: &'a PropertyRecord,
    pub location: GeoPoint,
}

/// Split of the visible page. Each visible record is in exactly one list,
/// and each list keeps rank order.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub mapped: Vec<GeocodeEntry<'a>>,
    pub unmapped: Vec<&'a PropertyRecord>,
    pub pending: Vec<&'a PropertyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeJob {
    pub id: PropertyId,
    pub address: String,
}

/// Work for the geocode worker: lookups in rank order, all tagged with the
/// generation they were issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeBatch {
    pub generation: Generation,
    pub jobs: Vec<GeocodeJob>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    Applied,
    /// Issued under an older query; dropped.
    Stale,
    /// Not pending in the current generation (already settled or never issued).
    Unknown,
}

/// Per-query geocode bookkeeping: outcome cache, in-flight set, and the
/// generation token that guards merges.
#[derive(Debug, Default)]
pub struct Resolver {
    generation: Generation,
    outcomes: HashMap<PropertyId, GeocodeOutcome>,
    pending: HashSet<PropertyId>,
    mapped_revision: u64,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous query and start a new generation.
    pub fn reset(&mut self) -> Generation {
        self.generation += 1;
        self.outcomes.clear();
        self.pending.clear();
        self.mapped_revision += 1;
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Changes whenever the set of mapped records changes.
    pub fn mapped_revision(&self) -> u64 {
        self.mapped_revision
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Mark every unresolved record of `page` pending and hand back the
    /// lookups to run. Records already settled or in flight are skipped.
    pub fn begin<'a>(
        &mut self,
        page: impl IntoIterator<Item = &'a PropertyRecord>,
    ) -> Option<GeocodeBatch> {
        let mut jobs = Vec::new();
        for record in page {
            if self.outcomes.contains_key(&record.id) || !self.pending.insert(record.id) {
                continue;
            }
            jobs.push(GeocodeJob {
                id: record.id,
                address: record.geocode_address(),
            });
        }

        if jobs.is_empty() {
            return None;
        }

        Some(GeocodeBatch {
            generation: self.generation,
            jobs,
        })
    }

    pub fn settle(&mut self, generation: Generation, id: PropertyId, outcome: GeocodeOutcome) -> Merge {
        if generation != self.generation {
            debug!(%id, generation, current = self.generation, "discarding stale geocode result");
            return Merge::Stale;
        }
        if !self.pending.remove(&id) {
            return Merge::Unknown;
        }

        if matches!(outcome, GeocodeOutcome::Located(_)) {
            self.mapped_revision += 1;
        }
        self.outcomes.insert(id, outcome);
        Merge::Applied
    }

    pub fn outcome(&self, id: PropertyId) -> Option<GeocodeOutcome> {
        self.outcomes.get(&id).copied()
    }

    pub fn location(&self, id: PropertyId) -> Option<GeoPoint> {
        match self.outcomes.get(&id) {
            Some(GeocodeOutcome::Located(point)) => Some(*point),
            _ => None,
        }
    }

    pub fn partition<'a>(&self, page: impl IntoIterator<Item = &'a PropertyRecord>) -> Partition<'a> {
        let mut partition = Partition::default();
        for record in page {
            match self.outcomes.get(&record.id) {
                Some(GeocodeOutcome::Located(location)) => partition.mapped.push(GeocodeEntry {
                    property: record,
                    location: *location,
                }),
                Some(GeocodeOutcome::Unmapped) => partition.unmapped.push(record),
                None => partition.pending.push(record),
            }
        }
        partition
    }
}

// src/explorer/pipeline.rs

use crate::catalog::Catalog;
use crate::domain::{PropertyId, PropertyRecord, Rect, ScreenPoint};
use crate::explorer::pagination::{Pager, PAGE_SIZE};
use crate::explorer::resolver::{
    GeocodeBatch, GeocodeOutcome, Generation, Merge, Partition, Resolver,
};
use crate::explorer::selection::{SelectionCoordinator, SelectionEffects, SelectionTarget};
use crate::explorer::view_sync::{
    Clusterer, GridClusterer, MapFrame, MapSync, DEFAULT_CLUSTER_CELL_DEGREES,
};
use crate::search::{match_catalog, MATCH_LIMIT};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub page_size: usize,
    pub match_limit: usize,
    pub cluster_cell_degrees: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            match_limit: MATCH_LIMIT,
            cluster_cell_degrees: DEFAULT_CLUSTER_CELL_DEGREES,
        }
    }
}

/// What the list renderer needs. Owned, so it can be rendered after the
/// session lock is released.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub query: String,
    pub mapped: Vec<PropertyRecord>,
    pub unmapped: Vec<PropertyRecord>,
    pub pending: usize,
    pub is_loading: bool,
    pub has_more: bool,
    pub total_matches: usize,
    pub selected: Option<PropertyId>,
    pub scroll_to: Option<PropertyId>,
}

impl ListView {
    pub fn result_count(&self) -> usize {
        self.mapped.len() + self.unmapped.len()
    }

    /// Nothing to show and nothing on the way.
    pub fn is_empty(&self) -> bool {
        !self.is_loading && self.result_count() == 0
    }
}

/// Both views of one session, taken under a single lock.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub list: ListView,
    pub map: MapFrame,
}

/// One browser session's search pipeline.
///
/// Query change → matcher → pager reset → geocode batch; near-end → page
/// growth → geocode batch; settled lookups → partitions → map refit. Every
/// state change goes through a method here.
pub struct Explorer {
    catalog: Arc<Catalog>,
    config: ExplorerConfig,
    query: Option<String>,
    /// Ranked matcher output, as ids into `catalog`.
    matches: Vec<PropertyId>,
    pager: Pager,
    resolver: Resolver,
    selection: SelectionCoordinator,
    map: MapSync,
    scroll_target: Option<PropertyId>,
}

impl Explorer {
    pub fn new(catalog: Arc<Catalog>, config: ExplorerConfig) -> Self {
        let clusterer = Arc::new(GridClusterer::new(config.cluster_cell_degrees));
        Self::with_clusterer(catalog, config, clusterer)
    }

    pub fn with_clusterer(
        catalog: Arc<Catalog>,
        config: ExplorerConfig,
        clusterer: Arc<dyn Clusterer>,
    ) -> Self {
        Self {
            catalog,
            pager: Pager::new(config.page_size),
            config,
            query: None,
            matches: Vec::new(),
            resolver: Resolver::new(),
            selection: SelectionCoordinator::default(),
            map: MapSync::new(clusterer),
            scroll_target: None,
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    /// Apply a (possibly) new query. An unchanged query is a no-op; anything
    /// else resets pagination and geocoding and returns the lookups for the
    /// first page.
    pub fn set_query(&mut self, raw: &str) -> Option<GeocodeBatch> {
        let query = raw.trim();
        if self.query.as_deref() == Some(query) {
            return None;
        }

        self.matches = match_catalog(self.catalog.records(), query, self.config.match_limit)
            .into_iter()
            .map(|record| record.id)
            .collect();
        self.pager.reset(self.matches.len());
        let generation = self.resolver.reset();
        self.query = Some(query.to_string());
        self.scroll_target = None;

        if let Some(id) = self.selection.selected() {
            if !self.pager.visible(&self.matches).contains(&id) {
                self.selection.clear();
            }
        }

        info!(
            query,
            generation,
            matches = self.matches.len(),
            "query changed"
        );

        self.sync_map();
        self.begin_visible()
    }

    /// A fresh page load: selection does not survive navigation.
    pub fn navigate(&mut self, raw: &str) -> Option<GeocodeBatch> {
        self.deselect();
        self.set_query(raw)
    }

    /// The list was scrolled close to its end.
    pub fn near_end(&mut self) -> Option<GeocodeBatch> {
        let grown = self.pager.advance(self.resolver.is_loading())?;
        debug!(page = self.pager.page(), from = grown.start, to = grown.end, "page grew");
        self.begin_visible()
    }

    /// Merge one lookup result. Results from an older query are dropped.
    pub fn settle(&mut self, generation: Generation, id: PropertyId, outcome: GeocodeOutcome) -> Merge {
        let merge = self.resolver.settle(generation, id, outcome);
        if merge == Merge::Applied {
            self.sync_map();
        }
        merge
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.resolver.is_current(generation)
    }

    pub fn is_loading(&self) -> bool {
        self.resolver.is_loading()
    }

    pub fn partition(&self) -> Partition<'_> {
        self.resolver
            .partition(visible_page(&self.catalog, &self.pager, &self.matches))
    }

    /// Select a visible record, or clear with `None`. Ids that are not on
    /// the visible page are ignored.
    pub fn select(&mut self, id: Option<PropertyId>) -> Option<SelectionEffects> {
        let Some(id) = id else {
            return Some(self.deselect());
        };

        if !self.pager.visible(&self.matches).contains(&id) {
            debug!(%id, "ignoring selection of a record that is not visible");
            return None;
        }

        let effects = self.selection.select(Some(SelectionTarget {
            id,
            rendered: self.resolver.outcome(id).is_some(),
            location: self.resolver.location(id),
        }));
        self.scroll_target = effects.scroll_list_to;
        Some(effects)
    }

    pub fn deselect(&mut self) -> SelectionEffects {
        self.scroll_target = None;
        self.selection.clear()
    }

    /// Page click; clears the selection if it lands outside the open panel.
    pub fn click(&mut self, at: ScreenPoint, panel: Option<Rect>) -> Option<SelectionEffects> {
        let effects = self.selection.click(at, panel)?;
        self.scroll_target = None;
        Some(effects)
    }

    pub fn selected(&self) -> Option<&PropertyRecord> {
        self.selection.selected().and_then(|id| self.catalog.get(id))
    }

    /// Snapshot for the list. Hands out the pending scroll request once.
    pub fn list_view(&mut self) -> ListView {
        let scroll_to = self.scroll_target.take();
        let partition = self
            .resolver
            .partition(visible_page(&self.catalog, &self.pager, &self.matches));

        ListView {
            query: self.query().to_string(),
            mapped: partition.mapped.iter().map(|e| e.property.clone()).collect(),
            unmapped: partition.unmapped.into_iter().cloned().collect(),
            pending: partition.pending.len(),
            is_loading: self.resolver.is_loading(),
            has_more: self.pager.has_more(),
            total_matches: self.matches.len(),
            selected: self.selection.selected(),
            scroll_to,
        }
    }

    pub fn map_frame(&self) -> MapFrame {
        let partition = self.partition();
        self.map.frame(&partition.mapped, self.selection.selected())
    }

    pub fn snapshot(&mut self) -> Snapshot {
        let list = self.list_view();
        Snapshot {
            list,
            map: self.map_frame(),
        }
    }

    fn begin_visible(&mut self) -> Option<GeocodeBatch> {
        let visible = visible_page(&self.catalog, &self.pager, &self.matches);
        let batch = self.resolver.begin(visible)?;
        debug!(
            generation = batch.generation,
            jobs = batch.jobs.len(),
            "geocode batch queued"
        );
        Some(batch)
    }

    fn sync_map(&mut self) {
        let partition = self
            .resolver
            .partition(visible_page(&self.catalog, &self.pager, &self.matches));
        if self.map.sync(self.resolver.mapped_revision(), &partition.mapped) {
            debug!(
                refits = self.map.refits(),
                mapped = partition.mapped.len(),
                "map refit"
            );
        }
    }
}

/// The records on the visible pages, in rank order.
fn visible_page<'a>(
    catalog: &'a Catalog,
    pager: &Pager,
    matches: &'a [PropertyId],
) -> impl Iterator<Item = &'a PropertyRecord> {
    pager
        .visible(matches)
        .iter()
        .filter_map(move |&id| catalog.get(id))
}

// src/explorer/view_sync.rs

use crate::domain::{GeoBounds, GeoPoint, PropertyId, ScreenPoint};
use crate::explorer::resolver::GeocodeEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const FIT_PADDING: f64 = 50.0;
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(25.2048, 55.2708);
pub const DEFAULT_ZOOM: u8 = 10;
pub const DEFAULT_CLUSTER_CELL_DEGREES: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub scale: f32,
    pub background: &'static str,
    pub glyph: &'static str,
    pub border: &'static str,
}

impl MarkerStyle {
    pub const SELECTED: MarkerStyle = MarkerStyle {
        scale: 1.0,
        background: "#000",
        glyph: "#fff",
        border: "#fff",
    };

    pub const DEFAULT: MarkerStyle = MarkerStyle {
        scale: 0.8,
        background: "#fff",
        glyph: "#000",
        border: "#000",
    };

    pub fn for_selection(selected: bool) -> Self {
        if selected {
            Self::SELECTED
        } else {
            Self::DEFAULT
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: PropertyId,
    pub point: GeoPoint,
    pub selected: bool,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Ask the map to show `bounds` inside a viewport inset by `padding`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitRequest {
    pub bounds: GeoBounds,
    pub padding: Padding,
}

impl FitRequest {
    /// Place `point` in a `width` x `height` viewport fitted to this request.
    /// Degenerate spans put the point on the centre line of that axis.
    pub fn project(&self, point: GeoPoint, width: f64, height: f64) -> ScreenPoint {
        let inner_w = (width - self.padding.left - self.padding.right).max(0.0);
        let inner_h = (height - self.padding.top - self.padding.bottom).max(0.0);

        let lng_span = self.bounds.east - self.bounds.west;
        let lat_span = self.bounds.north - self.bounds.south;

        let fx = if lng_span > 0.0 {
            (point.longitude - self.bounds.west) / lng_span
        } else {
            0.5
        };
        // screen y grows downwards
        let fy = if lat_span > 0.0 {
            (self.bounds.north - point.latitude) / lat_span
        } else {
            0.5
        };

        ScreenPoint {
            x: self.padding.left + fx * inner_w,
            y: self.padding.top + fy * inner_h,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub center: GeoPoint,
    pub members: Vec<PropertyId>,
}

/// Groups nearby markers. Rendering is the map's job; grouping lives here so
/// it can be recomputed exactly when the mapped set changes.
pub trait Clusterer: Send + Sync {
    fn cluster(&self, points: &[(PropertyId, GeoPoint)]) -> Vec<Cluster>;
}

/// Buckets points into square lat/lng cells.
#[derive(Debug, Clone)]
pub struct GridClusterer {
    cell_degrees: f64,
}

impl GridClusterer {
    pub fn new(cell_degrees: f64) -> Self {
        let cell_degrees = if cell_degrees.is_finite() && cell_degrees > 0.0 {
            cell_degrees
        } else {
            DEFAULT_CLUSTER_CELL_DEGREES
        };
        Self { cell_degrees }
    }
}

impl Default for GridClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_CELL_DEGREES)
    }
}

impl Clusterer for GridClusterer {
    fn cluster(&self, points: &[(PropertyId, GeoPoint)]) -> Vec<Cluster> {
        // BTreeMap keeps output order stable across runs
        let mut cells: BTreeMap<(i64, i64), Vec<(PropertyId, GeoPoint)>> = BTreeMap::new();
        for &(id, point) in points {
            let key = (
                (point.latitude / self.cell_degrees).floor() as i64,
                (point.longitude / self.cell_degrees).floor() as i64,
            );
            cells.entry(key).or_default().push((id, point));
        }

        cells
            .into_values()
            .map(|members| {
                let n = members.len() as f64;
                let (lat, lng) = members.iter().fold((0.0, 0.0), |(lat, lng), (_, p)| {
                    (lat + p.latitude, lng + p.longitude)
                });
                Cluster {
                    center: GeoPoint::new(lat / n, lng / n),
                    members: members.into_iter().map(|(id, _)| id).collect(),
                }
            })
            .collect()
    }
}

/// Everything the map renderer needs for one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub markers: Vec<Marker>,
    pub clusters: Vec<Cluster>,
    pub fit: Option<FitRequest>,
    pub pan_to: Option<GeoPoint>,
    pub center: GeoPoint,
    pub zoom: u8,
}

#[cfg(test)]
impl MapFrame {
    pub fn selected_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.selected)
    }
}

/// Keeps the viewport fit and clusters in step with the mapped set.
pub struct MapSync {
    clusterer: Arc<dyn Clusterer>,
    synced_revision: Option<u64>,
    fit: Option<FitRequest>,
    clusters: Vec<Cluster>,
    refits: u64,
}

impl MapSync {
    pub fn new(clusterer: Arc<dyn Clusterer>) -> Self {
        Self {
            clusterer,
            synced_revision: None,
            fit: None,
            clusters: Vec::new(),
            refits: 0,
        }
    }

    /// Recompute fit and clusters if the mapped set changed since the last
    /// call. Returns whether anything was recomputed.
    pub fn sync(&mut self, revision: u64, mapped: &[GeocodeEntry<'_>]) -> bool {
        if self.synced_revision == Some(revision) {
            return false;
        }
        self.synced_revision = Some(revision);

        self.fit = GeoBounds::covering(mapped.iter().map(|e| e.location)).map(|bounds| FitRequest {
            bounds,
            padding: Padding::uniform(FIT_PADDING),
        });

        let points: Vec<_> = mapped.iter().map(|e| (e.property.id, e.location)).collect();
        self.clusters = self.clusterer.cluster(&points);
        self.refits += 1;
        true
    }

    pub fn fit(&self) -> Option<FitRequest> {
        self.fit
    }

    /// How many times the viewport has been recomputed.
    pub fn refits(&self) -> u64 {
        self.refits
    }

    pub fn frame(&self, mapped: &[GeocodeEntry<'_>], selected: Option<PropertyId>) -> MapFrame {
        let markers: Vec<Marker> = mapped
            .iter()
            .map(|entry| {
                let is_selected = selected == Some(entry.property.id);
                Marker {
                    id: entry.property.id,
                    point: entry.location,
                    selected: is_selected,
                    style: MarkerStyle::for_selection(is_selected),
                }
            })
            .collect();

        let pan_to = markers.iter().find(|m| m.selected).map(|m| m.point);

        MapFrame {
            markers,
            clusters: self.clusters.clone(),
            fit: self.fit,
            pan_to,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Default for MapSync {
    fn default() -> Self {
        Self::new(Arc::new(GridClusterer::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyRecord;

    fn records() -> Vec<PropertyRecord> {
        (1..=3).map(|i| PropertyRecord::new(i, "Dubai")).collect()
    }

    fn entries<'a>(records: &'a [PropertyRecord], points: &[GeoPoint]) -> Vec<GeocodeEntry<'a>> {
        records
            .iter()
            .zip(points)
            .map(|(property, &location)| GeocodeEntry { property, location })
            .collect()
    }

    #[test]
    fn fit_covers_mapped_points_with_padding() {
        let records = records();
        let mapped = entries(
            &records,
            &[GeoPoint::new(25.0, 55.0), GeoPoint::new(25.2, 55.3)],
        );

        let mut sync = MapSync::default();
        assert!(sync.sync(1, &mapped));
        let fit = sync.fit().unwrap();
        assert_eq!(fit.bounds.south, 25.0);
        assert_eq!(fit.bounds.east, 55.3);
        assert_eq!(fit.padding, Padding::uniform(50.0));
    }

    #[test]
    fn refits_only_when_revision_changes() {
        let records = records();
        let points = [
            GeoPoint::new(25.0, 55.0),
            GeoPoint::new(25.2, 55.3),
            GeoPoint::new(25.4, 55.5),
        ];
        let mut sync = MapSync::default();

        sync.sync(1, &entries(&records[..2], &points[..2]));
        assert!(!sync.sync(1, &entries(&records[..2], &points[..2])));
        assert_eq!(sync.refits(), 1);

        assert!(sync.sync(2, &entries(&records, &points)));
        assert_eq!(sync.fit().unwrap().bounds.north, 25.4);
        assert_eq!(sync.refits(), 2);
    }

    #[test]
    fn empty_mapped_set_has_no_fit() {
        let mut sync = MapSync::default();
        sync.sync(1, &[]);
        assert!(sync.fit().is_none());
        let frame = sync.frame(&[], None);
        assert_eq!(frame.center, DEFAULT_CENTER);
        assert!(frame.markers.is_empty());
    }

    #[test]
    fn only_the_selected_marker_is_enlarged() {
        let records = records();
        let points = [
            GeoPoint::new(25.0, 55.0),
            GeoPoint::new(25.2, 55.3),
            GeoPoint::new(25.4, 55.5),
        ];
        let mapped = entries(&records, &points);
        let mut sync = MapSync::default();
        sync.sync(1, &mapped);

        let frame = sync.frame(&mapped, Some(PropertyId(2)));
        let selected: Vec<_> = frame.markers.iter().filter(|m| m.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, PropertyId(2));
        assert_eq!(selected[0].style, MarkerStyle::SELECTED);
        assert_eq!(frame.pan_to, Some(points[1]));
        assert!(frame
            .markers
            .iter()
            .filter(|m| !m.selected)
            .all(|m| m.style.scale == 0.8 && m.style.background == "#fff"));

        let frame = sync.frame(&mapped, None);
        assert!(frame.selected_marker().is_none());
        assert!(frame.pan_to.is_none());
    }

    #[test]
    fn grid_clusters_nearby_points() {
        let clusterer = GridClusterer::new(0.1);
        let clusters = clusterer.cluster(&[
            (PropertyId(1), GeoPoint::new(25.01, 55.01)),
            (PropertyId(2), GeoPoint::new(25.03, 55.05)),
            (PropertyId(3), GeoPoint::new(25.51, 55.51)),
        ]);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![PropertyId(1), PropertyId(2)]);
        assert!((clusters[0].center.latitude - 25.02).abs() < 1e-9);
        assert_eq!(clusters[1].members, vec![PropertyId(3)]);
    }

    #[test]
    fn projection_respects_padding() {
        let fit = FitRequest {
            bounds: GeoBounds {
                south: 25.0,
                west: 55.0,
                north: 26.0,
                east: 56.0,
            },
            padding: Padding::uniform(50.0),
        };

        let nw = fit.project(GeoPoint::new(26.0, 55.0), 600.0, 400.0);
        assert_eq!((nw.x, nw.y), (50.0, 50.0));
        let se = fit.project(GeoPoint::new(25.0, 56.0), 600.0, 400.0);
        assert_eq!((se.x, se.y), (550.0, 350.0));

        let single = FitRequest {
            bounds: GeoBounds::around(GeoPoint::new(25.0, 55.0)),
            padding: Padding::uniform(50.0),
        };
        let p = single.project(GeoPoint::new(25.0, 55.0), 600.0, 400.0);
        assert_eq!((p.x, p.y), (300.0, 200.0));
    }
}

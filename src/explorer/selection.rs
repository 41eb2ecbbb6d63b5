// src/explorer/selection.rs

use crate::domain::{GeoPoint, PropertyId, Rect, ScreenPoint};

/// What a selection change asks the two views to do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionEffects {
    /// Row to scroll to the center of the list viewport.
    pub scroll_list_to: Option<PropertyId>,
    /// Point the map should pan to.
    pub pan_map_to: Option<GeoPoint>,
    /// The detail panel should close.
    pub close_panel: bool,
}

/// Where the record being selected currently lives in the views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionTarget {
    pub id: PropertyId,
    /// The row is part of the rendered list.
    pub rendered: bool,
    /// Set when the record is in the mapped partition.
    pub location: Option<GeoPoint>,
}

/// Single owner of "which property is selected".
#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selected: Option<PropertyId>,
}

impl SelectionCoordinator {
    pub fn selected(&self) -> Option<PropertyId> {
        self.selected
    }

    pub fn select(&mut self, target: Option<SelectionTarget>) -> SelectionEffects {
        match target {
            Some(target) => {
                self.selected = Some(target.id);
                SelectionEffects {
                    scroll_list_to: target.rendered.then_some(target.id),
                    pan_map_to: target.location,
                    close_panel: false,
                }
            }
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) -> SelectionEffects {
        self.selected = None;
        SelectionEffects {
            close_panel: true,
            ..SelectionEffects::default()
        }
    }

    /// A click anywhere on the page. Clears the selection when the click
    /// lands outside the open detail panel; `panel` is `None` when no panel
    /// is rendered, in which case nothing happens.
    pub fn click(&mut self, at: ScreenPoint, panel: Option<Rect>) -> Option<SelectionEffects> {
        let panel = panel?;
        if self.selected.is_none() || panel.contains(at) {
            return None;
        }
        Some(self.clear())
    }
}

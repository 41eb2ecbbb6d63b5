use crate::domain::{GeoBounds, PropertyRecord};
use crate::explorer::view_sync::{FitRequest, Padding, FIT_PADDING};
use crate::explorer::MapFrame;
use crate::templates::components::detail_panel;
use maud::{html, Markup};

pub const MAP_WIDTH: f64 = 640.0;
pub const MAP_HEIGHT: f64 = 520.0;

/// SVG rendering of a map frame, with the detail panel on top when a
/// property is selected.
pub fn map_panel(frame: &MapFrame, selected: Option<&PropertyRecord>, is_loading: bool) -> Markup {
    // Refetched when the selection moves or the page grows, and polled while
    // lookups are still landing.
    let trigger = if is_loading {
        "load delay:500ms, selection-changed from:body, mapped-changed from:body"
    } else {
        "selection-changed from:body, mapped-changed from:body"
    };

    // Nothing mapped yet: frame the default center.
    let fit = frame.fit.unwrap_or(FitRequest {
        bounds: GeoBounds::around(frame.center),
        padding: Padding::uniform(FIT_PADDING),
    });

    // Selected marker last so it draws on top.
    let mut markers: Vec<_> = frame.markers.iter().collect();
    markers.sort_by_key(|m| m.selected);

    html! {
        div
            id="map-panel"
            class="map-panel"
            hx-get="/explorer/panel"
            hx-trigger=(trigger)
            hx-swap="outerHTML"
            data-pan-lat=[frame.pan_to.map(|p| p.latitude)]
            data-pan-lng=[frame.pan_to.map(|p| p.longitude)]
        {
            svg
                xmlns="http://www.w3.org/2000/svg"
                class="map"
                viewBox={ "0 0 " (MAP_WIDTH) " " (MAP_HEIGHT) }
                role="img"
                aria-label="Property map"
            {
                rect class="map-bg" x="0" y="0" width=(MAP_WIDTH) height=(MAP_HEIGHT) {}

                @for cluster in frame.clusters.iter().filter(|c| c.members.len() > 1) {
                    @let at = fit.project(cluster.center, MAP_WIDTH, MAP_HEIGHT);
                    g class="cluster" {
                        circle cx=(at.x) cy=(at.y) r="18" {}
                        text x=(at.x) y=(at.y - 22.0) text-anchor="middle" { (cluster.members.len()) }
                    }
                }

                @for marker in markers {
                    @let at = fit.project(marker.point, MAP_WIDTH, MAP_HEIGHT);
                    circle
                        class=(if marker.selected { "marker selected" } else { "marker" })
                        cx=(at.x)
                        cy=(at.y)
                        r=(10.0 * marker.style.scale)
                        fill=(marker.style.background)
                        stroke=(marker.style.border)
                        stroke-width="2"
                        hx-post={ "/explorer/select?id=" (marker.id) }
                        hx-swap="none"
                    {}
                }
            }

            @if frame.markers.is_empty() {
                p class="map-empty" { "No properties on the map yet" }
            }

            @if let Some(record) = selected {
                (detail_panel(record))
            }
        }
    }
}

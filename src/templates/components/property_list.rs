use crate::domain::{PropertyId, PropertyRecord};
use crate::explorer::ListView;
use maud::{html, Markup};

/// How often a list that is still geocoding re-fetches itself.
const POLL_DELAY: &str = "load delay:500ms";

/// The list column. Swapped as a whole by htmx: polled while geocoding,
/// replaced on selection changes and grown by the end-of-list sentinel.
pub fn property_list(view: &ListView) -> Markup {
    let trigger = if view.is_loading {
        format!("{POLL_DELAY}, selection-changed from:body")
    } else {
        "selection-changed from:body".to_string()
    };

    html! {
        div
            id="property-list"
            class="property-list"
            hx-get="/explorer/list"
            hx-trigger=(trigger)
            hx-swap="outerHTML"
            data-scroll-into-view=[view.scroll_to.map(row_id)]
        {
            p class="result-count" {
                @if view.query.is_empty() {
                    (view.total_matches) " properties"
                } @else {
                    (view.total_matches) " results for “" (view.query) "”"
                }
            }

            @if view.is_empty() {
                div class="no-results" {
                    h3 { "No properties found" }
                    p { "Try a city, a community or a property name." }
                }
            }

            @if !view.mapped.is_empty() {
                ul class="rows mapped" {
                    @for record in &view.mapped {
                        (row(record, view.selected, false))
                    }
                }
            }

            @if !view.unmapped.is_empty() {
                h4 class="section-title" { "Not on the map" }
                ul class="rows unmapped" {
                    @for record in &view.unmapped {
                        (row(record, view.selected, true))
                    }
                }
            }

            @if view.pending > 0 {
                ul class="rows pending" aria-busy="true" {
                    @for _ in 0..view.pending {
                        li class="row loading" {
                            div class="skeleton title" {}
                            div class="skeleton line" {}
                        }
                    }
                }
            }

            @if view.has_more && !view.is_loading {
                div
                    class="load-more"
                    hx-post="/explorer/more"
                    hx-trigger="revealed"
                    hx-target="#property-list"
                    hx-swap="outerHTML"
                { "Loading more…" }
            }
        }
    }
}

fn row(record: &PropertyRecord, selected: Option<PropertyId>, unmapped: bool) -> Markup {
    let is_selected = selected == Some(record.id);
    let class = match (is_selected, unmapped) {
        (true, _) => "row selected",
        (false, true) => "row compact",
        (false, false) => "row",
    };

    html! {
        li
            id=(row_id(record.id))
            class=(class)
            hx-post={ "/explorer/select?id=" (record.id) }
            hx-swap="none"
        {
            p class="name" { (record.display_name()) }
            p class="muted" { (record.locality()) @if !record.locality().is_empty() { ", " } (record.city) }
            @if let Some(price) = record.formatted_price() {
                p class="price" { (price) }
            }
        }
    }
}

pub fn row_id(id: PropertyId) -> String {
    format!("property-{id}")
}

// templates/pages/explorer.rs

use crate::domain::PropertyRecord;
use crate::explorer::Snapshot;
use crate::templates::components::{map_panel, property_list, search_bar};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn explorer_page(snapshot: &Snapshot, selected: Option<&PropertyRecord>) -> Markup {
    let title = if snapshot.list.query.is_empty() {
        "Property Explorer".to_string()
    } else {
        format!("{} · Property Explorer", snapshot.list.query)
    };

    desktop_layout(
        &title,
        html! {
            (search_bar(&snapshot.list.query))
            main class="explorer" {
                section class="list-column" {
                    (property_list(&snapshot.list))
                }
                section class="map-column" {
                    (map_panel(&snapshot.map, selected, snapshot.list.is_loading))
                }
            }
        },
    )
}

use crate::domain::PropertyRecord;
use maud::{html, Markup};

/// Floating card for the selected property. Clicks outside it clear the
/// selection (see `static/explorer.js`).
pub fn detail_panel(record: &PropertyRecord) -> Markup {
    html! {
        div id="detail-panel" class="detail-panel" data-panel {
            div class="detail-header" {
                span class="badge" { (record.city) }
                button
                    type="button"
                    class="close"
                    aria-label="Close"
                    hx-post="/explorer/deselect"
                    hx-swap="none"
                { "×" }
            }
            h3 { (record.display_name()) }
            @let locality = record.locality();
            @if !locality.is_empty() {
                p class="muted" { (locality) }
            }
            @if let Some(price) = record.formatted_price() {
                p class="price" { (price) }
            }
        }
    }
}

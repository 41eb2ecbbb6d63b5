use crate::domain::PropertyRecord;
use crate::search::{RecentSearches, SearchKind, Suggestions};
use crate::templates::query_href;
use maud::{html, Markup};

/// Dropdown for an empty search box. Nothing at all when there is no history.
pub fn recent_searches_dropdown(recent: &RecentSearches) -> Markup {
    html! {
        @if !recent.is_empty() {
            div class="dropdown-section" {
                h4 { "Recent searches" }
                ul {
                    @for search in recent.entries() {
                        li class="dropdown-item" {
                            a href=(query_href("/", &search.query)) {
                                span class="badge" {
                                    @match search.kind {
                                        SearchKind::Location => { "Location" }
                                        SearchKind::Property => { "Property" }
                                    }
                                }
                                span { (search.query) }
                            }
                            button
                                type="button"
                                class="remove"
                                aria-label="Remove"
                                hx-post=(query_href("/searches/remove", &search.query))
                                hx-target="#search-dropdown"
                                hx-swap="innerHTML"
                            { "×" }
                        }
                    }
                }
            }
        }
    }
}

/// Unnamed properties search by their city instead.
fn suggestion_query(property: &PropertyRecord) -> &str {
    let name = property.name.trim();
    if name.is_empty() {
        property.city.trim()
    } else {
        name
    }
}

pub fn suggestions_dropdown(suggestions: &Suggestions<'_>) -> Markup {
    html! {
        @if suggestions.is_empty() {
            p class="dropdown-empty" { "No results found" }
        } @else {
            @if !suggestions.locations.is_empty() {
                div class="dropdown-section" {
                    h4 { "Locations" }
                    ul {
                        @for city in &suggestions.locations {
                            li class="dropdown-item" {
                                a href=(query_href("/", city)) { (city) }
                            }
                        }
                    }
                }
            }
            @if !suggestions.properties.is_empty() {
                div class="dropdown-section" {
                    h4 { "Properties" }
                    ul {
                        @for property in &suggestions.properties {
                            li class="dropdown-item" {
                                a href=(query_href("/", suggestion_query(property))) {
                                    span { (property.display_name()) }
                                    span class="muted" { (property.locality()) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

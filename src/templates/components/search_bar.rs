use maud::{html, Markup};

/// Search input with a suggestions dropdown. Searching reloads the explorer
/// with the query; only the Save button adds it to the recent searches.
pub fn search_bar(query: &str) -> Markup {
    html! {
        div class="search-bar" {
            form method="get" action="/" autocomplete="off" {
                label class="sr-only" for="query" { "Search by city, community or property" }
                input
                    type="search"
                    id="query"
                    name="query"
                    value=(query)
                    placeholder="City, community or property"
                    hx-get="/search/suggest"
                    hx-trigger="input changed delay:200ms, focus"
                    hx-target="#search-dropdown"
                    hx-swap="innerHTML";
                button type="submit" class="primary" { "Search" }
                button type="submit" formmethod="post" formaction="/searches/save" class="secondary" {
                    "Save search"
                }
            }
            div id="search-dropdown" class="dropdown" {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_a_plain_get_and_save_is_separate() {
        let html = search_bar("Dubai, UAE").into_string();
        assert!(html.contains(r#"<form method="get" action="/""#));
        assert!(html.contains(r#"formaction="/searches/save""#));
        assert!(html.contains(r#"value="Dubai, UAE""#));
    }
}

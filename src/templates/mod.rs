pub mod components;
pub mod layouts;
pub mod pages;

pub use layouts::desktop::desktop_layout;

use url::form_urlencoded;

/// `path?query=<urlencoded query>`
pub fn query_href(path: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{path}?query={encoded}")
}

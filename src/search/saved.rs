// src/search/saved.rs

use base64::Engine;
use serde::{Deserialize, Serialize};

pub const SAVED_SEARCHES_COOKIE: &str = "saved_searches";
pub const MAX_SAVED_SEARCHES: usize = 5;
pub const SAVED_SEARCHES_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Location,
    Property,
}

impl SearchKind {
    /// "City, Country" style queries are location searches.
    pub fn for_query(query: &str) -> Self {
        if query.contains(',') {
            SearchKind::Location
        } else {
            SearchKind::Property
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub query: String,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: SearchKind,
}

/// Recent searches kept in a browser cookie, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentSearches {
    entries: Vec<SavedSearch>,
}

impl RecentSearches {
    /// Decode a cookie value. Anything unreadable is an empty list.
    pub fn from_cookie_value(value: &str) -> Self {
        let entries = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(value.trim())
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Vec<SavedSearch>>(&bytes).ok())
            .unwrap_or_default();

        Self { entries }
    }

    pub fn to_cookie_value(&self) -> String {
        // Vec<SavedSearch> has no failing Serialize impl
        let json = serde_json::to_vec(&self.entries).unwrap_or_default();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
    }

    pub fn set_cookie_header(&self) -> String {
        format!(
            "{SAVED_SEARCHES_COOKIE}={}; Max-Age={SAVED_SEARCHES_MAX_AGE_SECS}; Path=/; SameSite=Lax",
            self.to_cookie_value()
        )
    }

    pub fn entries(&self) -> &[SavedSearch] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend `query` unless it is blank or already saved (ignoring case).
    /// Returns whether the list changed.
    pub fn save(&mut self, query: &str, kind: SearchKind, now_ms: i64) -> bool {
        let query = query.trim();
        if query.is_empty() || self.contains(query) {
            return false;
        }

        self.entries.insert(
            0,
            SavedSearch {
                query: query.to_string(),
                timestamp: now_ms,
                kind,
            },
        );
        self.entries.truncate(MAX_SAVED_SEARCHES);
        true
    }

    pub fn remove(&mut self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        let before = self.entries.len();
        self.entries.retain(|s| s.query.to_lowercase() != query);
        self.entries.len() != before
    }

    pub fn contains(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.entries.iter().any(|s| s.query.to_lowercase() == query)
    }
}

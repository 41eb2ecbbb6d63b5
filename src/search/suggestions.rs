// src/search/suggestions.rs

use crate::domain::PropertyRecord;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const PROPERTY_SUGGESTION_LIMIT: usize = 10;

/// How duplicate city names are collapsed in the location list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CityDedup {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl FromStr for CityDedup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "case-insensitive" | "insensitive" => Ok(CityDedup::CaseInsensitive),
            "case-sensitive" | "sensitive" => Ok(CityDedup::CaseSensitive),
            other => Err(format!(
                "unknown city dedup mode '{other}' (expected case-insensitive or case-sensitive)"
            )),
        }
    }
}

impl fmt::Display for CityDedup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityDedup::CaseInsensitive => write!(f, "case-insensitive"),
            CityDedup::CaseSensitive => write!(f, "case-sensitive"),
        }
    }
}

/// Dropdown content for a non-empty query.
#[derive(Debug, Default)]
pub struct Suggestions<'a> {
    pub locations: Vec<String>,
    pub properties: Vec<&'a PropertyRecord>,
}

impl Suggestions<'_> {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.properties.is_empty()
    }
}

pub fn suggest<'a>(
    catalog: &'a [PropertyRecord],
    query: &str,
    dedup: CityDedup,
    property_limit: usize,
) -> Suggestions<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Suggestions::default();
    }

    let mut seen = HashSet::new();
    let mut locations = Vec::new();
    for record in catalog {
        let city = record.city.trim();
        if !city.to_lowercase().contains(&needle) {
            continue;
        }
        let key = match dedup {
            CityDedup::CaseInsensitive => city.to_lowercase(),
            CityDedup::CaseSensitive => city.to_string(),
        };
        if seen.insert(key) {
            locations.push(city.to_string());
        }
    }

    let properties = catalog
        .iter()
        .filter(|r| {
            [&r.name, &r.city, &r.community, &r.subcommunity]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .take(property_limit)
        .collect();

    Suggestions {
        locations,
        properties,
    }
}

// src/domain/property.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const UNNAMED_PROPERTY: &str = "Unnamed Property";

/// Stable identifier of a catalog record. Lookups and equality go through this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PropertyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PropertyId)
    }
}

/// One entry of the static catalog.
///
/// The serialized field names follow the catalog file (`City`, `Community`,
/// `Subcommunity`, `Property`). `name` may be empty, meaning the property has
/// no display name yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: PropertyId,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Community", default, deserialize_with = "null_as_empty")]
    pub community: String,
    #[serde(rename = "Subcommunity", default, deserialize_with = "null_as_empty")]
    pub subcommunity: String,
    #[serde(rename = "Property", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

impl PartialEq for PropertyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyRecord {}

impl PropertyRecord {
    #[cfg(test)]
    pub fn new(id: u64, city: impl Into<String>) -> Self {
        Self {
            id: PropertyId(id),
            city: city.into(),
            community: String::new(),
            subcommunity: String::new(),
            name: String::new(),
            price: None,
        }
    }

    #[cfg(test)]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[cfg(test)]
    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    #[cfg(test)]
    pub fn with_subcommunity(mut self, subcommunity: impl Into<String>) -> Self {
        self.subcommunity = subcommunity.into();
        self
    }

    #[cfg(test)]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            UNNAMED_PROPERTY
        } else {
            name
        }
    }

    /// Free-text address sent to the geocoder: name, subcommunity, community
    /// and city, skipping blank parts.
    pub fn geocode_address(&self) -> String {
        join_non_empty(&[&self.name, &self.subcommunity, &self.community, &self.city])
    }

    /// "Subcommunity, Community" line shown under the name.
    pub fn locality(&self) -> String {
        join_non_empty(&[&self.subcommunity, &self.community])
    }

    /// Price rendered as `$1,250,000`, whole units only.
    pub fn formatted_price(&self) -> Option<String> {
        let price = self.price?;
        if !price.is_finite() || price < 0.0 {
            return None;
        }
        Some(format!("${}", group_thousands(price.round() as u64)))
    }
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Older catalog files carry explicit nulls for the optional text columns.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

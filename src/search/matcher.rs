// src/search/matcher.rs

use crate::domain::PropertyRecord;

/// Queries shorter than this (after trimming) pass the whole catalog through.
pub const MIN_QUERY_CHARS: usize = 2;

/// Upper bound on ranked results, keeps the geocoding load bounded.
pub const MATCH_LIMIT: usize = 50;

pub const SCORE_EXACT: u32 = 100;
pub const SCORE_PREFIX: u32 = 80;
pub const SCORE_WORD: u32 = 60;
pub const SCORE_SUBSTRING: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedField {
    Name,
    City,
    Community,
    Subcommunity,
}

/// A catalog record with the relevance it earned for one query.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    pub record: &'a PropertyRecord,
    pub score: u32,
    pub matched_field: MatchedField,
}

/// How a raw query string is interpreted.
#[derive(Debug, PartialEq, Eq)]
pub enum QueryKind {
    /// Empty or too short: everything, catalog order.
    PassThrough,
    /// `"City, anything"`: exact case-insensitive city filter.
    City(String),
    /// Free text, lowercased needle.
    Scored(String),
}

impl QueryKind {
    pub fn classify(query: &str) -> Self {
        let trimmed = query.trim();

        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return QueryKind::PassThrough;
        }

        if let Some((city, _)) = trimmed.split_once(',') {
            return QueryKind::City(city.trim().to_lowercase());
        }

        QueryKind::Scored(trimmed.to_lowercase())
    }
}

/// Filter and rank the catalog for `query`.
///
/// Ordering is by descending score; equal scores keep catalog order. The
/// pass-through case returns every record and is not capped.
pub fn match_catalog<'a>(
    catalog: &'a [PropertyRecord],
    query: &str,
    limit: usize,
) -> Vec<&'a PropertyRecord> {
    match QueryKind::classify(query) {
        QueryKind::PassThrough => catalog.iter().collect(),
        QueryKind::City(city) => catalog
            .iter()
            .filter(|r| r.city.trim().to_lowercase() == city)
            .take(limit)
            .collect(),
        QueryKind::Scored(needle) => rank(catalog, &needle, limit)
            .into_iter()
            .map(|m| m.record)
            .collect(),
    }
}

/// Score every record against an already-lowercased needle.
pub fn rank<'a>(catalog: &'a [PropertyRecord], needle: &str, limit: usize) -> Vec<MatchResult<'a>> {
    let mut results: Vec<MatchResult<'a>> = catalog
        .iter()
        .filter_map(|record| score_record(record, needle))
        .collect();

    // sort_by is stable, so ties stay in catalog order
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(limit);
    results
}

/// Best field score for one record, `None` when nothing matches.
pub fn score_record<'a>(record: &'a PropertyRecord, needle: &str) -> Option<MatchResult<'a>> {
    let fields = [
        (MatchedField::Name, record.name.as_str()),
        (MatchedField::City, record.city.as_str()),
        (MatchedField::Community, record.community.as_str()),
        (MatchedField::Subcommunity, record.subcommunity.as_str()),
    ];

    let mut best: Option<(MatchedField, u32)> = None;
    for (field, value) in fields {
        let score = field_score(value, needle);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((field, score));
        }
    }

    best.map(|(matched_field, score)| MatchResult {
        record,
        score,
        matched_field,
    })
}

pub fn field_score(value: &str, needle: &str) -> u32 {
    let value = value.trim().to_lowercase();
    if value.is_empty() || needle.is_empty() {
        return 0;
    }

    if value == needle {
        SCORE_EXACT
    } else if value.starts_with(needle) {
        SCORE_PREFIX
    } else if value.contains(&format!(" {needle}")) {
        SCORE_WORD
    } else if value.contains(needle) {
        SCORE_SUBSTRING
    } else {
        0
    }
}

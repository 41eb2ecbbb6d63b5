pub mod matcher;
pub mod saved;
pub mod suggestions;

pub use matcher::{match_catalog, MATCH_LIMIT};
pub use saved::{RecentSearches, SearchKind};
pub use suggestions::{suggest, CityDedup, Suggestions};

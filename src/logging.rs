//! Logging setup: stderr output filtered by environment.
//!
//! 1. **`EXPLORER_LOG`** (highest priority). A bare level such as `debug`
//!    applies to this crate only; anything with `=`, `:` or `,` is used as-is.
//! 2. **`RUST_LOG`**, used directly.
//! 3. **Default**: `warn` globally, `info` for this crate.

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,property_explorer=info";

pub type LogResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Install the global subscriber. Fails if one is already installed.
pub fn init() -> LogResult<()> {
    fmt()
        .with_env_filter(create_filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()?;
    Ok(())
}

/// Initialize logging for tests. Safe to call from every test.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn create_filter() -> EnvFilter {
    if let Ok(explorer_log) = env::var("EXPLORER_LOG") {
        return expand_explorer_log(&explorer_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(DEFAULT_FILTER)
}

fn expand_explorer_log(value: &str) -> EnvFilter {
    EnvFilter::new(filter_directives(value))
}

fn filter_directives(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }
    format!("warn,property_explorer={value}")
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Thin wrapper over `tracing-subscriber`: console output with an env-filter
//! directive string. Library crates only emit through the `tracing` facade;
//! binaries and tests decide here whether anything is rendered.

use tracing_subscriber::EnvFilter;

/// Initialize console logging.
///
/// `level` is an env-filter directive (e.g. `"info"`, `"corticed_cells=debug"`).
/// When `None`, the `RUST_LOG` environment variable is consulted, defaulting
/// to `warn`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        init_logging(Some("debug"));
        init_logging(Some("info"));
        init_logging(None);
    }
}

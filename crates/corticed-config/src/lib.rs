// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Corticed Configuration System
//!
//! Type-safe configuration loader for simulation runs:
//! - TOML file parsing
//! - Environment variable overrides
//! - Validation of hyperparameter ranges
//!
//! ## Usage
//!
//! ```rust,no_run
//! use corticed_config::{load_config, CorticedConfig};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("dt = {}", config.simulation.dt);
//! println!("tau_m = {}", config.cell.tau_m);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::validate_config;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_types_compile() {
        // Smoke test to ensure types are properly defined
        let _config = CorticedConfig::default();
    }
}

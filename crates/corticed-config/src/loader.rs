// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two-tier loading: the TOML file supplies base values, environment
//! variables override them at runtime.

use crate::{ConfigError, ConfigResult, CorticedConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "corticed_configuration.toml";

/// Find the corticed configuration file
///
/// Search order:
/// 1. `CORTICED_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Parent directories (up to 5 levels, for workspace roots)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("CORTICED_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by CORTICED_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search cwd and ancestors
    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet CORTICED_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<CorticedConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CorticedConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CORTICED_DT` -> `simulation.dt`
/// - `CORTICED_STEPS` -> `simulation.steps`
/// - `CORTICED_SEED` -> `simulation.seed`
/// - `CORTICED_N_UNITS` -> `cell.n_units`
/// - `CORTICED_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut CorticedConfig) {
    if let Ok(value) = env::var("CORTICED_DT") {
        if let Ok(dt) = value.parse::<f32>() {
            config.simulation.dt = dt;
        }
    }
    if let Ok(value) = env::var("CORTICED_STEPS") {
        if let Ok(steps) = value.parse::<usize>() {
            config.simulation.steps = steps;
        }
    }
    if let Ok(value) = env::var("CORTICED_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.simulation.seed = Some(seed);
        }
    }
    if let Ok(value) = env::var("CORTICED_N_UNITS") {
        if let Ok(n_units) = value.parse::<usize>() {
            config.cell.n_units = n_units;
        }
    }
    if let Ok(value) = env::var("CORTICED_LOG_LEVEL") {
        config.logging.level = value;
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Range checks on hyperparameters before a simulation is built; a bad value
//! should fail here, not as a NaN ten thousand steps into a run.

use crate::{ConfigError, ConfigResult, CorticedConfig};

/// Validate the complete configuration
///
/// Checks for:
/// - Positive membrane time constant and step size
/// - Non-negative resistances, gains, leaks, and periods
/// - Non-empty population
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &CorticedConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if config.simulation.dt <= 0.0 {
        errors.push(format!(
            "simulation.dt must be positive, got {}",
            config.simulation.dt
        ));
    }
    if config.cell.tau_m <= 0.0 {
        errors.push(format!(
            "cell.tau_m must be positive, got {}",
            config.cell.tau_m
        ));
    }
    if config.cell.n_units == 0 {
        errors.push("cell.n_units must be at least 1".to_string());
    }
    if config.cell.r_m < 0.0 {
        errors.push(format!(
            "cell.r_m must be non-negative, got {}",
            config.cell.r_m
        ));
    }
    if config.cell.inhibit_r < 0.0 {
        errors.push(format!(
            "cell.inhibit_r must be non-negative, got {}",
            config.cell.inhibit_r
        ));
    }
    if config.cell.thr_gain < 0.0 {
        errors.push(format!(
            "cell.thr_gain must be non-negative, got {}",
            config.cell.thr_gain
        ));
    }
    if config.cell.thr_leak < 0.0 {
        errors.push(format!(
            "cell.thr_leak must be non-negative, got {}",
            config.cell.thr_leak
        ));
    }
    if config.cell.rho_b < 0.0 {
        errors.push(format!(
            "cell.rho_b must be non-negative, got {}",
            config.cell.rho_b
        ));
    }
    if config.cell.refract_t < 0.0 {
        errors.push(format!(
            "cell.refract_t must be non-negative, got {}",
            config.cell.refract_t
        ));
    }
    if config.cell.thr_jitter < 0.0 {
        errors.push(format!(
            "cell.thr_jitter must be non-negative, got {}",
            config.cell.thr_jitter
        ));
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = CorticedConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_tau_m_rejected() {
        let mut config = CorticedConfig::default();
        config.cell.tau_m = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_population_rejected() {
        let mut config = CorticedConfig::default();
        config.cell.n_units = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_multiple_errors_reported_together() {
        let mut config = CorticedConfig::default();
        config.simulation.dt = -1.0;
        config.cell.inhibit_r = -6.0;
        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("simulation.dt"));
        assert!(message.contains("cell.inhibit_r"));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the configuration structs that map to sections in
//! `corticed_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorticedConfig {
    pub simulation: SimulationConfig,
    pub cell: CellConfig,
    pub logging: LoggingConfig,
}

/// Simulation-run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration step size (ms).
    pub dt: f32,
    /// Number of steps to simulate.
    pub steps: usize,
    /// PRNG seed; absent means entropy-seeded.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            steps: 100,
            seed: None,
        }
    }
}

/// Spiking cell hyperparameters, one field per recognized option.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CellConfig {
    /// Neural population size.
    pub n_units: usize,
    /// Membrane time constant.
    pub tau_m: f32,
    /// Membrane resistance.
    pub r_m: f32,
    /// Base adaptive threshold value.
    pub thr: f32,
    /// Lateral inhibitory magnitude (0 disables inhibition).
    pub inhibit_r: f32,
    /// Keep adapted thresholds across resets.
    pub thr_persist: bool,
    /// Threshold increment per spike.
    pub thr_gain: f32,
    /// Multiplicative threshold decay per step.
    pub thr_leak: f32,
    /// Sparsity factor for the sparsity-enforcing threshold branch.
    pub rho_b: f32,
    /// Relative refractory period (ms).
    pub refract_t: f32,
    /// Pin spikes at 1 during the refractory window.
    pub sticky_spikes: bool,
    /// Scale of uniform jitter on initial thresholds.
    pub thr_jitter: f32,
    /// Optional lower bound on membrane voltage.
    pub v_min: Option<f32>,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            n_units: 1,
            tau_m: 10.0,
            r_m: 1.0,
            thr: 0.5,
            inhibit_r: 0.0,
            thr_persist: false,
            thr_gain: 0.0,
            thr_leak: 0.0,
            rho_b: 0.0,
            refract_t: 0.0,
            sticky_spikes: false,
            thr_jitter: 0.05,
            v_min: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Corticed - Bio-Inspired Spiking Neural Simulation
//!
//! Corticed is a computational-neuroscience simulation library for building
//! and running biologically-inspired predictive-coding and spiking neural
//! networks. This umbrella crate re-exports all components.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! corticed = "0.1"
//! ```
//!
//! ```rust
//! use corticed::prelude::*;
//! use ndarray::Array2;
//!
//! // A one-unit cell driven by constant current
//! let config = SLifConfig {
//!     refract_t: 1.0,
//!     seed: Some(7),
//!     ..SLifConfig::new(5.0, 1.0, 0.5)
//! };
//! let mut cell = SLifCell::new("z0", 1, &config);
//!
//! for step in 0..20 {
//!     let t = step as f32;
//!     cell.set_current(Array2::from_elem((1, 1), 1.0)).unwrap();
//!     cell.advance_state(t, 1.0);
//! }
//! ```
//!
//! ## Components
//!
//! - [`corticed_neural`]: pure per-step computation (membrane dynamics,
//!   surrogate gradients, current modulation, metrics)
//! - [`corticed_cells`]: stateful spiking cells, wiring verification,
//!   threshold snapshots
//! - [`corticed_config`]: TOML configuration with environment overrides

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod observability;

pub use corticed_cells as cells;
pub use corticed_config as config;
pub use corticed_neural as neural;

/// Commonly used items, importable in one line.
pub mod prelude {
    pub use corticed_cells::{CellError, CellState, Compartment, SLifCell, SLifConfig, WiringRegistry};
    pub use corticed_config::{load_config, validate_config, CorticedConfig};
    pub use corticed_neural::{
        integrate_membrane, modulate_current, surrogate_dfx, update_spike_times,
        IntegrationParams, MembraneStep,
    };

    pub use crate::observability::init_logging;
}

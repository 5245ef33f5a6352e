// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Corticed Neural Computation (Pure Functions)
//!
//! ALL per-step neural computation in one place:
//! - **Surrogate**: smooth approximate derivative through the spike nonlinearity
//! - **Modulation**: membrane resistance scaling and lateral inhibition
//! - **Dynamics**: one Euler step of leaky integrate-and-fire membrane dynamics
//! - **Timing**: time-of-last-spike bookkeeping
//! - **Metrics**: general measurement utilities (NLL, MSE, BCE, accuracy)
//!
//! Every function here is pure: no hidden state, no I/O, no randomness.
//! Persistent state and random initialization live in `corticed-cells`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dynamics;
pub mod metrics;
pub mod modulation;
pub mod surrogate;
pub mod timing;

// Re-export everything for convenience
pub use dynamics::{integrate_membrane, IntegrationParams, MembraneStep};
pub use modulation::modulate_current;
pub use surrogate::{surrogate_dfx, SURROGATE_C1, SURROGATE_C2};
pub use timing::update_spike_times;

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Corticed Cells (Stateful Layer)
//!
//! Stateful spiking-cell components on top of the pure computation in
//! `corticed-neural`:
//! - **SLifCell**: simplified leaky integrate-and-fire cell owning per-unit
//!   voltage, spikes, adaptive thresholds, refractory counters, and
//!   time-of-last-spike records
//! - **Wiring**: compartment identifiers and the incoming-connection registry
//!   used for pre-simulation verification
//! - **Snapshots**: threshold persistence, one archive file per cell
//!
//! Cells advance strictly in lockstep with the caller, one synchronous step
//! at a time. Each cell owns its state exclusively.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod slif;
pub mod snapshot;
pub mod wiring;

pub use error::{CellError, Result};
pub use slif::{CellState, SLifCell, SLifConfig};
pub use wiring::{Compartment, WiringRegistry};

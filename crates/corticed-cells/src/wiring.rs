// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Compartment identifiers and the incoming-connection registry
//!
//! Compartments name the per-unit state slots a cell exposes to the rest of
//! a network graph. The identifiers exist for wiring validation only; state
//! access inside a cell goes through plain struct fields.

use ahash::AHashMap;
use std::fmt;

/// Named state slots of a spiking cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    /// Electrical current input (`j`).
    Current,
    /// Spike/action potential output (`s`).
    Spikes,
    /// Membrane potential (`v`).
    Voltage,
    /// Adaptive firing threshold (`thr`).
    Threshold,
    /// Refractory counters (`rfr`).
    Refract,
    /// Time-of-last-spike record (`tols`).
    TimeOfLastSpike,
    /// Surrogate derivative diagnostic output.
    Surrogate,
}

impl Compartment {
    /// Short wire-format key for this compartment.
    pub fn key(&self) -> &'static str {
        match self {
            Compartment::Current => "j",
            Compartment::Spikes => "s",
            Compartment::Voltage => "v",
            Compartment::Threshold => "thr",
            Compartment::Refract => "rfr",
            Compartment::TimeOfLastSpike => "tols",
            Compartment::Surrogate => "surrogate",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Registry of incoming connections per (cell, compartment) pair.
///
/// The orchestration layer records every wired connection here; cells query
/// it at verification time to assert their required inputs are present.
#[derive(Debug, Default)]
pub struct WiringRegistry {
    incoming: AHashMap<(String, Compartment), usize>,
}

impl WiringRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one connection from `source` into `target`'s `compartment`.
    pub fn connect(&mut self, source: &str, target: &str, compartment: Compartment) {
        tracing::trace!(source, target, %compartment, "wiring connection");
        *self
            .incoming
            .entry((target.to_string(), compartment))
            .or_insert(0) += 1;
    }

    /// Number of sources wired into `cell`'s `compartment`.
    pub fn incoming_count(&self, cell: &str, compartment: Compartment) -> usize {
        self.incoming
            .get(&(cell.to_string(), compartment))
            .copied()
            .unwrap_or(0)
    }
}

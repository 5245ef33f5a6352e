// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Simplified LIF Spiking Cell
//!
//! A spiking cell based on a simplified leaky integrate-and-fire (sLIF)
//! model with a surrogate derivative function, optional "sticky spikes", and
//! a per-unit adaptive threshold scheme (Samadi, Lillicrap, and Tweed, 2017,
//! "Deep learning with dynamic spiking neurons and fixed feedback weights").
//!
//! The cell owns all persistent per-unit state and sequences one simulation
//! step per [`SLifCell::advance_state`] call by composing the pure functions
//! from `corticed-neural`.

use crate::error::{CellError, Result};
use crate::snapshot;
use crate::wiring::{Compartment, WiringRegistry};
use corticed_neural::{
    integrate_membrane, modulate_current, surrogate_dfx, update_spike_times, IntegrationParams,
    SURROGATE_C1, SURROGATE_C2,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::{debug, trace};

/// Inhibitory synapse weights are sampled uniformly from this half-open range.
const INH_WEIGHT_MIN: f32 = 0.025;
const INH_WEIGHT_MAX: f32 = 1.0;

/// Fixed, explicitly enumerated configuration for an [`SLifCell`].
///
/// Every recognized option appears here with its default; there is no
/// free-form option passing.
#[derive(Debug, Clone, PartialEq)]
pub struct SLifConfig {
    /// Membrane time constant.
    pub tau_m: f32,
    /// Membrane resistance.
    pub r_m: f32,
    /// Base value for the adaptive thresholds (initial condition).
    pub thr: f32,
    /// Lateral inhibitory magnitude; `<= 0` disables lateral inhibition.
    pub inhibit_r: f32,
    /// Keep adapted thresholds across resets instead of restoring the
    /// sampled baseline.
    pub thr_persist: bool,
    /// Threshold increment per spike.
    pub thr_gain: f32,
    /// Multiplicative threshold decay per step.
    pub thr_leak: f32,
    /// Sparsity factor; `> 0` enables the sparsity-enforcing threshold branch.
    pub rho_b: f32,
    /// Relative refractory period (ms).
    pub refract_t: f32,
    /// Pin reported spikes at 1 for the refractory window duration.
    pub sticky_spikes: bool,
    /// Scale of the uniform jitter added to initial thresholds.
    pub thr_jitter: f32,
    /// Optional lower bound on membrane voltage.
    pub v_min: Option<f32>,
    /// PRNG seed; `None` draws one from system entropy.
    pub seed: Option<u64>,
}

impl SLifConfig {
    /// Configuration with the given membrane constants and every optional
    /// setting at its default.
    pub fn new(tau_m: f32, r_m: f32, thr: f32) -> Self {
        Self {
            tau_m,
            r_m,
            thr,
            inhibit_r: 0.0,
            thr_persist: false,
            thr_gain: 0.0,
            thr_leak: 0.0,
            rho_b: 0.0,
            refract_t: 0.0,
            sticky_spikes: false,
            thr_jitter: 0.05,
            v_min: None,
            seed: None,
        }
    }
}

/// Per-unit state of a spiking cell. All arrays share the shape
/// `(batch_size, n_units)`.
///
/// `current` and `surrogate` are diagnostics recomputed every step; between
/// a reset and the first step they are explicitly unset.
#[derive(Debug, Clone)]
pub struct CellState {
    /// Membrane potential (`v`).
    pub voltage: Array2<f32>,
    /// Binary spike output (`s`).
    pub spikes: Array2<f32>,
    /// Per-unit adaptive firing threshold (`thr`).
    pub threshold: Array2<f32>,
    /// Refractory counters (`rfr`).
    pub refract: Array2<f32>,
    /// Time-of-last-spike record (`tols`).
    pub tols: Array2<f32>,
    /// Modulated input current from the most recent step (`j`).
    pub current: Option<Array2<f32>>,
    /// Surrogate derivative evaluated on the most recent step's current.
    pub surrogate: Option<Array2<f32>>,
}

/// A population of simplified leaky integrate-and-fire units.
#[derive(Debug, Clone)]
pub struct SLifCell {
    name: String,
    n_units: usize,
    batch_size: usize,

    tau_m: f32,
    r_m: f32,
    inh_r: f32,
    thr_persist: bool,
    params: IntegrationParams,

    /// Fixed hollow lateral inhibition matrix, `(n_units, n_units)`. Sampled
    /// once at construction, never learned.
    inh_weights: Array2<f32>,

    /// Initial jittered threshold, frozen as the reset baseline. Shape
    /// `(1, n_units)`.
    baseline_threshold: Array2<f32>,

    state: CellState,
}

impl SLifCell {
    /// Construct a cell, sampling its inhibitory matrix and jittered initial
    /// thresholds from a seeded generator.
    pub fn new(name: impl Into<String>, n_units: usize, config: &SLifConfig) -> Self {
        let name = name.into();
        let mut rng = root_rng(config.seed);

        // Independent substreams: matrix sampling must not perturb the
        // threshold jitter stream.
        let mut matrix_rng = split_rng(&mut rng);
        let inh_weights = sample_inhibitory_matrix(n_units, &mut matrix_rng);

        let mut jitter_rng = split_rng(&mut rng);
        let baseline_threshold =
            sample_thresholds(config.thr, config.thr_jitter, n_units, &mut jitter_rng);

        debug!(cell = %name, n_units, seed = ?config.seed, "constructed sLIF cell");
        Self::assemble(name, n_units, config, inh_weights, baseline_threshold)
    }

    /// Construct a cell whose threshold state is restored from a snapshot
    /// directory instead of sampled.
    ///
    /// The inhibitory matrix is always freshly sampled; only thresholds are
    /// persisted.
    pub fn from_snapshot(
        name: impl Into<String>,
        n_units: usize,
        config: &SLifConfig,
        directory: &Path,
    ) -> Result<Self> {
        let name = name.into();
        let mut rng = root_rng(config.seed);
        let mut matrix_rng = split_rng(&mut rng);
        let inh_weights = sample_inhibitory_matrix(n_units, &mut matrix_rng);

        let baseline_threshold = snapshot::load_threshold(directory, &name)?;
        if baseline_threshold.ncols() != n_units {
            return Err(CellError::SnapshotSizeMismatch {
                expected: n_units,
                actual: baseline_threshold.ncols(),
            });
        }

        debug!(cell = %name, n_units, dir = %directory.display(), "restored sLIF cell from snapshot");
        Ok(Self::assemble(
            name,
            n_units,
            config,
            inh_weights,
            baseline_threshold,
        ))
    }

    fn assemble(
        name: String,
        n_units: usize,
        config: &SLifConfig,
        inh_weights: Array2<f32>,
        baseline_threshold: Array2<f32>,
    ) -> Self {
        let batch_size = 1;
        let params = IntegrationParams {
            refract_t: config.refract_t,
            thr_gain: config.thr_gain,
            thr_leak: config.thr_leak,
            rho_b: config.rho_b,
            sticky_spikes: config.sticky_spikes,
            v_min: config.v_min,
        };
        let shape = (batch_size, n_units);
        let mut cell = Self {
            name,
            n_units,
            batch_size,
            tau_m: config.tau_m,
            r_m: config.r_m,
            inh_r: config.inhibit_r,
            thr_persist: config.thr_persist,
            params,
            inh_weights,
            state: CellState {
                voltage: Array2::zeros(shape),
                spikes: Array2::zeros(shape),
                threshold: tile_rows(&baseline_threshold, batch_size),
                refract: Array2::from_elem(shape, config.refract_t),
                tols: Array2::zeros(shape),
                current: None,
                surrogate: None,
            },
            baseline_threshold,
        };
        cell.reset();
        cell
    }

    /// Supply the raw input current for the next step.
    ///
    /// # Errors
    /// [`CellError::ShapeMismatch`] when `j` is not `(batch_size, n_units)`;
    /// surfaced here rather than mid-integration.
    pub fn set_current(&mut self, j: Array2<f32>) -> Result<()> {
        let expected = (self.batch_size, self.n_units);
        if j.dim() != expected {
            return Err(CellError::ShapeMismatch {
                expected,
                actual: j.dim(),
            });
        }
        self.state.current = Some(j);
        Ok(())
    }

    /// Advance the cell by one simulation step.
    ///
    /// Sequences current modulation, the surrogate derivative diagnostic,
    /// membrane integration, and the time-of-last-spike update, writing all
    /// outputs back into the cell's state. Time-of-last-spike semantics
    /// assume monotonically increasing `t`.
    pub fn advance_state(&mut self, t: f32, dt: f32) {
        let raw = match self.state.current.take() {
            Some(j) => j,
            None => {
                // No drive wired this step. Verification guards against a
                // permanently unwired cell; a transiently silent input is
                // zero current.
                trace!(cell = %self.name, t, "advancing without input current");
                Array2::zeros((self.batch_size, self.n_units))
            }
        };

        let j = modulate_current(&raw, &self.state.spikes, &self.inh_weights, self.r_m, self.inh_r);
        self.state.surrogate = Some(surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2));

        let step = integrate_membrane(
            dt,
            &j,
            &self.state.voltage,
            &self.state.threshold,
            self.tau_m,
            &self.state.refract,
            &self.params,
        );
        self.state.current = Some(j);
        self.state.voltage = step.voltage;
        self.state.spikes = step.spikes;
        self.state.threshold = step.threshold;
        self.state.refract = step.refractory;
        self.state.tols = update_spike_times(t, &self.state.spikes, &self.state.tols);
    }

    /// Clear state back to initial conditions.
    ///
    /// Adapted thresholds are restored to the frozen baseline unless the
    /// cell was configured with `thr_persist`.
    pub fn reset(&mut self) {
        let shape = (self.batch_size, self.n_units);
        self.state.voltage = Array2::zeros(shape);
        self.state.spikes = Array2::zeros(shape);
        self.state.tols = Array2::zeros(shape);
        self.state.refract = Array2::from_elem(shape, self.params.refract_t);
        self.state.current = None;
        self.state.surrogate = None;
        if !self.thr_persist {
            self.state.threshold = tile_rows(&self.baseline_threshold, self.batch_size);
        }
        trace!(cell = %self.name, "reset");
    }

    /// Persist threshold state under `directory`, keyed by the cell's name.
    ///
    /// Writes the frozen baseline when thresholds are non-persistent,
    /// otherwise the live adapted values.
    pub fn save(&self, directory: &Path) -> Result<()> {
        if self.thr_persist {
            snapshot::save_threshold(directory, &self.name, self.state.threshold.view())
        } else {
            snapshot::save_threshold(directory, &self.name, self.baseline_threshold.view())
        }
    }

    /// Restore threshold state from `directory` and re-freeze it as the
    /// reset baseline.
    pub fn load(&mut self, directory: &Path) -> Result<()> {
        let threshold = snapshot::load_threshold(directory, &self.name)?;
        if threshold.ncols() != self.n_units {
            return Err(CellError::SnapshotSizeMismatch {
                expected: self.n_units,
                actual: threshold.ncols(),
            });
        }
        self.state.threshold = tile_rows(&threshold, self.batch_size);
        self.baseline_threshold = threshold;
        Ok(())
    }

    /// Assert that at least one source is wired into the current-input
    /// compartment. Must pass before simulation begins; an unwired cell is a
    /// configuration error, not a runtime surprise.
    pub fn verify_wiring(&self, registry: &WiringRegistry) -> Result<()> {
        if registry.incoming_count(&self.name, Compartment::Current) < 1 {
            return Err(CellError::MissingInput {
                cell: self.name.clone(),
                compartment: Compartment::Current,
            });
        }
        Ok(())
    }

    /// Re-allocate all per-unit state for a new batch size and reset.
    pub fn resize_batch(&mut self, batch_size: usize) {
        self.batch_size = batch_size.max(1);
        if self.thr_persist {
            // Carry the adapted first-row thresholds into the new batch.
            let row = self
                .state
                .threshold
                .row(0)
                .to_owned()
                .insert_axis(ndarray::Axis(0));
            self.state.threshold = tile_rows(&row, self.batch_size);
        }
        self.reset();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_units(&self) -> usize {
        self.n_units
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The fixed lateral inhibition matrix.
    pub fn inhibitory_weights(&self) -> &Array2<f32> {
        &self.inh_weights
    }

    pub fn voltage(&self) -> &Array2<f32> {
        &self.state.voltage
    }

    pub fn spikes(&self) -> &Array2<f32> {
        &self.state.spikes
    }

    pub fn threshold(&self) -> &Array2<f32> {
        &self.state.threshold
    }

    pub fn refract(&self) -> &Array2<f32> {
        &self.state.refract
    }

    pub fn time_of_last_spike(&self) -> &Array2<f32> {
        &self.state.tols
    }

    /// Modulated current from the most recent step, if any step ran since
    /// the last reset.
    pub fn current(&self) -> Option<&Array2<f32>> {
        self.state.current.as_ref()
    }

    /// Surrogate derivative from the most recent step, if any step ran since
    /// the last reset.
    pub fn surrogate(&self) -> Option<&Array2<f32>> {
        self.state.surrogate.as_ref()
    }

    /// Full state record.
    pub fn state(&self) -> &CellState {
        &self.state
    }
}

/// Seeded generator, or one drawn from system entropy when no seed is given.
fn root_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Split an independent substream off `rng`.
fn split_rng(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.gen())
}

/// Sample the hollow lateral-inhibition matrix: off-diagonal entries uniform
/// in `[0.025, 1.0)`, diagonal exactly zero (no self-inhibition).
fn sample_inhibitory_matrix(n_units: usize, rng: &mut StdRng) -> Array2<f32> {
    let mut weights = Array2::from_shape_fn((n_units, n_units), |_| {
        rng.gen_range(INH_WEIGHT_MIN..INH_WEIGHT_MAX)
    });
    for i in 0..n_units {
        weights[[i, i]] = 0.0;
    }
    weights
}

/// Sample jittered initial thresholds: `thr + U(-jitter, +jitter)` per unit.
fn sample_thresholds(thr: f32, jitter: f32, n_units: usize, rng: &mut StdRng) -> Array2<f32> {
    if jitter > 0.0 {
        Array2::from_shape_fn((1, n_units), |_| thr + rng.gen_range(-jitter..jitter))
    } else {
        Array2::from_elem((1, n_units), thr)
    }
}

/// Repeat a `(1, n)` row array into `(batch, n)`.
fn tile_rows(row: &Array2<f32>, batch: usize) -> Array2<f32> {
    Array2::from_shape_fn((batch, row.ncols()), |(_, c)| row[[0, c]])
}

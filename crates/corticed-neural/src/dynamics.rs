// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Membrane Dynamics (LIF)
//!
//! One discrete Euler step over leaky integrate-and-fire membrane dynamics
//! with adaptive per-unit thresholds and refractory bookkeeping.
//!
//! This is the hottest code path in a simulation run. The function is pure:
//! all persistent state and randomness live in the owning cell, so the step
//! stays free to vectorize.

use ndarray::{Array2, Zip};

/// Constants governing one integration step.
///
/// Defaults match the standalone integrator contract; a cell construction
/// overrides them from its own configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationParams {
    /// Relative refractory period (ms).
    pub refract_t: f32,
    /// Threshold increment applied per spike (simple adaptive mode).
    pub thr_gain: f32,
    /// Multiplicative threshold decay applied every step (simple adaptive mode).
    pub thr_leak: f32,
    /// Sparsity factor; `> 0` switches the threshold update to the
    /// sparsity-enforcing branch (about one spike per batch row).
    pub rho_b: f32,
    /// Pin reported spikes at 1 for the whole refractory window.
    pub sticky_spikes: bool,
    /// Optional lower bound on membrane voltage.
    pub v_min: Option<f32>,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            refract_t: 1.0,
            thr_gain: 0.002,
            thr_leak: 0.0005,
            rho_b: 0.0,
            sticky_spikes: false,
            v_min: None,
        }
    }
}

/// Output of one integration step.
#[derive(Debug, Clone)]
pub struct MembraneStep {
    /// Membrane voltage at `t + dt`, hyperpolarized to 0 where spikes fired.
    pub voltage: Array2<f32>,
    /// Binary spike emissions (possibly pinned, see
    /// [`IntegrationParams::sticky_spikes`]).
    pub spikes: Array2<f32>,
    /// Adaptive threshold at `t + dt`.
    pub threshold: Array2<f32>,
    /// Refractory counters at `t + dt`; 0 immediately after a spike.
    pub refractory: Array2<f32>,
}

/// Run one Euler step of leaky integrator neuronal dynamics.
///
/// # Arguments
/// * `dt` - integration step size (ms)
/// * `j` - modulated electrical current, shape `(batch, n_units)`
/// * `v` - membrane voltage at `t`
/// * `v_thr` - adaptive threshold at `t`
/// * `tau_m` - membrane time constant
/// * `rfr` - refractory counters at `t`
/// * `params` - integration constants
///
/// # Algorithm
/// 1. Integration mask: 1 where `rfr >= refract_t` (inclusive), else 0
/// 2. `v' = (v + (-v + j) * (dt / tau_m)) * mask`
/// 3. Floor `v'` at `v_min` if configured
/// 4. Spikes where `v' > v_thr` (strict)
/// 5. Hyperpolarize: `v' = (1 - s) * v'`
/// 6. Threshold update, sparsity-enforced or simple adaptive (never blended)
/// 7. `rfr' = (rfr + dt) * (1 - s)`
/// 8. Sticky override: `s = s * mask + (1 - mask)` when enabled
pub fn integrate_membrane(
    dt: f32,
    j: &Array2<f32>,
    v: &Array2<f32>,
    v_thr: &Array2<f32>,
    tau_m: f32,
    rfr: &Array2<f32>,
    params: &IntegrationParams,
) -> MembraneStep {
    // Units still inside their refractory window do not integrate.
    let mask = rfr.mapv(|r| if r >= params.refract_t { 1.0 } else { 0.0 });

    let step = dt / tau_m;
    let mut voltage = Zip::from(v)
        .and(j)
        .and(&mask)
        .map_collect(|&vi, &ji, &mi| (vi + (-vi + ji) * step) * mi);
    if let Some(v_min) = params.v_min {
        voltage.mapv_inplace(|vi| vi.max(v_min));
    }

    let mut spikes = Zip::from(&voltage)
        .and(v_thr)
        .map_collect(|&vi, &ti| if vi > ti { 1.0 } else { 0.0 });

    // Hyperpolarize: spiking units reset to 0, the rest keep their value.
    voltage = Zip::from(&voltage)
        .and(&spikes)
        .map_collect(|&vi, &si| (1.0 - si) * vi);

    let threshold = if params.rho_b > 0.0 {
        sparsity_threshold(v_thr, &spikes, params.rho_b)
    } else {
        Zip::from(v_thr)
            .and(&spikes)
            .map_collect(|&ti, &si| ti + si * params.thr_gain - ti * params.thr_leak)
    };

    // Counters that just spiked restart from 0 and re-accumulate.
    let refractory = Zip::from(rfr)
        .and(&spikes)
        .map_collect(|&ri, &si| (ri + dt) * (1.0 - si));

    if params.sticky_spikes {
        // Units inside the refractory window report a pinned spike.
        spikes = Zip::from(&spikes)
            .and(&mask)
            .map_collect(|&si, &mi| si * mi + (1.0 - mi));
    }

    MembraneStep {
        voltage,
        spikes,
        threshold,
        refractory,
    }
}

/// Sparsity-enforcing threshold update.
///
/// Per batch row, the threshold moves by `(spike_count - 1) * rho_b`: up when
/// more than one unit fired in the row, down when none did. Floored at 0.025.
fn sparsity_threshold(v_thr: &Array2<f32>, spikes: &Array2<f32>, rho_b: f32) -> Array2<f32> {
    let mut threshold = v_thr.to_owned();
    for (mut thr_row, spk_row) in threshold.rows_mut().into_iter().zip(spikes.rows()) {
        let dthr = spk_row.sum() - 1.0;
        thr_row.mapv_inplace(|t| (t + dthr * rho_b).max(0.025));
    }
    threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params() -> IntegrationParams {
        IntegrationParams {
            refract_t: 1.0,
            thr_gain: 0.002,
            thr_leak: 0.0005,
            rho_b: 0.0,
            sticky_spikes: false,
            v_min: None,
        }
    }

    #[test]
    fn test_subthreshold_integration_accumulates_voltage() {
        let j = array![[1.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &params());
        // v' = (0 + (0 + 1) * 1/5) * 1 = 0.2, below threshold
        assert!((out.voltage[[0, 0]] - 0.2).abs() < 1e-6);
        assert_eq!(out.spikes[[0, 0]], 0.0);
        assert_eq!(out.refractory[[0, 0]], 2.0);
    }

    #[test]
    fn test_spike_resets_voltage_and_refractory() {
        let j = array![[10.0]];
        let v = array![[0.4]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &params());
        assert_eq!(out.spikes[[0, 0]], 1.0);
        assert_eq!(out.voltage[[0, 0]], 0.0);
        assert_eq!(out.refractory[[0, 0]], 0.0);
    }

    #[test]
    fn test_spike_comparison_is_strict() {
        // voltage lands exactly on the threshold: no spike
        let j = array![[0.5]];
        let v = array![[0.5]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let p = IntegrationParams {
            thr_leak: 0.0,
            ..params()
        };
        // v' = (0.5 + (-0.5 + 0.5) * dt/tau) = 0.5 exactly
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert_eq!(out.spikes[[0, 0]], 0.0);
    }

    #[test]
    fn test_refractory_mask_is_inclusive() {
        // rfr == refract_t may integrate; rfr just below may not
        let j = array![[10.0, 10.0]];
        let v = array![[0.0, 0.0]];
        let thr = array![[0.5, 0.5]];
        let rfr = array![[1.0, 0.999]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &params());
        assert_eq!(out.spikes[[0, 0]], 1.0);
        assert_eq!(out.spikes[[0, 1]], 0.0);
        assert_eq!(out.voltage[[0, 1]], 0.0); // gated off, not integrated
    }

    #[test]
    fn test_voltage_floor_applies() {
        let j = array![[-100.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let p = IntegrationParams {
            v_min: Some(-3.0),
            ..params()
        };
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert_eq!(out.voltage[[0, 0]], -3.0);
    }

    #[test]
    fn test_unbounded_hyperpolarization_without_floor() {
        let j = array![[-100.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &params());
        assert!(out.voltage[[0, 0]] < -3.0);
    }

    #[test]
    fn test_simple_adaptive_threshold_gain_and_leak() {
        let j = array![[10.0, 0.0]];
        let v = array![[0.0, 0.0]];
        let thr = array![[0.5, 0.5]];
        let rfr = array![[1.0, 1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &params());
        // spiking unit: thr + gain - thr*leak; silent unit: thr - thr*leak
        let leak = 0.5 * 0.0005;
        assert!((out.threshold[[0, 0]] - (0.5 + 0.002 - leak)).abs() < 1e-7);
        assert!((out.threshold[[0, 1]] - (0.5 - leak)).abs() < 1e-7);
    }

    #[test]
    fn test_sparsity_threshold_moves_with_row_spike_count() {
        let p = IntegrationParams {
            rho_b: 0.1,
            ..params()
        };
        // row 0: two spikes (dthr = +1), row 1: none (dthr = -1)
        let j = array![[10.0, 10.0], [0.0, 0.0]];
        let v = array![[0.0, 0.0], [0.0, 0.0]];
        let thr = array![[0.5, 0.5], [0.5, 0.5]];
        let rfr = array![[1.0, 1.0], [1.0, 1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert!((out.threshold[[0, 0]] - 0.6).abs() < 1e-6);
        assert!((out.threshold[[1, 0]] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_sparsity_threshold_floor() {
        let p = IntegrationParams {
            rho_b: 10.0,
            ..params()
        };
        let j = array![[0.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        // no spikes: dthr = -1, update would be 0.5 - 10.0
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert_eq!(out.threshold[[0, 0]], 0.025);
    }

    #[test]
    fn test_sticky_spikes_pin_refractory_units() {
        let p = IntegrationParams {
            sticky_spikes: true,
            ..params()
        };
        let j = array![[0.0, 10.0]];
        let v = array![[0.0, 0.4]];
        let thr = array![[0.5, 0.5]];
        // unit 0 is mid-refractory, unit 1 fires naturally
        let rfr = array![[0.5, 1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert_eq!(out.spikes[[0, 0]], 1.0); // pinned
        assert_eq!(out.spikes[[0, 1]], 1.0); // natural
        // the pinned spike is cosmetic: voltage stays gated, not reset by it
        assert_eq!(out.voltage[[0, 0]], 0.0);
    }

    #[test]
    fn test_sticky_override_respects_natural_decision_when_out_of_refractory() {
        let p = IntegrationParams {
            sticky_spikes: true,
            ..params()
        };
        let j = array![[0.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[2.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        assert_eq!(out.spikes[[0, 0]], 0.0);
    }

    #[test]
    fn test_threshold_branches_are_mutually_exclusive() {
        // with rho_b > 0 the gain/leak settings must have no effect
        let p = IntegrationParams {
            rho_b: 0.1,
            thr_gain: 100.0,
            thr_leak: 100.0,
            ..params()
        };
        let j = array![[10.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[1.0]];
        let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &rfr, &p);
        // one spike in the row: dthr = 0, threshold unchanged
        assert!((out.threshold[[0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_refractory_counters_accumulate_during_window() {
        let j = array![[0.0]];
        let v = array![[0.0]];
        let thr = array![[0.5]];
        let rfr = array![[0.0]];
        let p = IntegrationParams {
            refract_t: 3.0,
            ..params()
        };
        let mut r = rfr;
        for expected in [1.0f32, 2.0, 3.0] {
            let out = integrate_membrane(1.0, &j, &v, &thr, 5.0, &r, &p);
            r = out.refractory;
            assert_eq!(r[[0, 0]], expected);
        }
    }
}

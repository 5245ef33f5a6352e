// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Input current modulation
//!
//! Scales raw input current by membrane resistance and, when an inhibitory
//! resistance is configured, subtracts lateral inhibition driven by the
//! previous step's population spike pattern.

use ndarray::Array2;

/// Modulate electrical current via membrane resistance and lateral inhibition.
///
/// Carries out the piecewise equation:
///
/// ```text
/// j * R_m - (s(t-dt) . W_inh) * inh_R,  if inh_R > 0
/// j * R_m,                              otherwise
/// ```
///
/// # Arguments
/// * `j` - raw electrical current, shape `(batch, n_units)`
/// * `spikes` - previous-step binary spike vector, shape `(batch, n_units)`
/// * `inh_weights` - fixed lateral inhibitory matrix, shape
///   `(n_units, n_units)`, hollow (zero diagonal)
/// * `r_m` - membrane resistance
/// * `inh_r` - inhibitory resistance; `<= 0` disables lateral inhibition
#[inline]
pub fn modulate_current(
    j: &Array2<f32>,
    spikes: &Array2<f32>,
    inh_weights: &Array2<f32>,
    r_m: f32,
    inh_r: f32,
) -> Array2<f32> {
    let scaled = j * r_m;
    if inh_r > 0.0 {
        scaled - spikes.dot(inh_weights) * inh_r
    } else {
        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_resistance_scaling_only_when_inhibition_disabled() {
        let j = array![[1.0, 2.0]];
        let spikes = array![[1.0, 1.0]];
        let w = array![[0.0, 0.9], [0.9, 0.0]];
        let out = modulate_current(&j, &spikes, &w, 3.0, 0.0);
        assert_eq!(out, array![[3.0, 6.0]]);
    }

    #[test]
    fn test_inhibition_subtracts_weighted_spikes() {
        let j = array![[1.0, 1.0]];
        let spikes = array![[1.0, 0.0]];
        let w = array![[0.0, 0.5], [0.25, 0.0]];
        let out = modulate_current(&j, &spikes, &w, 1.0, 2.0);
        // unit 0 receives no inhibition (hollow diagonal), unit 1 loses 0.5 * 2
        assert_eq!(out, array![[1.0, 0.0]]);
    }

    #[test]
    fn test_no_inhibition_without_prior_spikes() {
        let j = array![[0.5, 0.5]];
        let spikes = array![[0.0, 0.0]];
        let w = array![[0.0, 0.9], [0.9, 0.0]];
        let with_inh = modulate_current(&j, &spikes, &w, 1.0, 6.0);
        let without_inh = modulate_current(&j, &spikes, &w, 1.0, 0.0);
        assert_eq!(with_inh, without_inh);
    }
}

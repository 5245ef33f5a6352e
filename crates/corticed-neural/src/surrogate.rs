// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Surrogate derivative of the spike nonlinearity
//!
//! A spike is a step function of the input current, so its true derivative is
//! zero almost everywhere. Gradient-based learning rules instead use a smooth
//! surrogate evaluated at the current value.

use ndarray::Array2;

/// Default scale coefficient applied to the surrogate output.
pub const SURROGATE_C1: f32 = 0.82;

/// Default sharpness coefficient applied to the current before `sech`.
pub const SURROGATE_C2: f32 = 0.08;

/// Compute the surrogate derivative of the spike output w.r.t. input current.
///
/// Elementwise: `c1 * c2 * sech(c2 * j)^2` where `j > 0`, and `0` where
/// `j <= 0`.
///
/// # Arguments
/// * `j` - electrical current, shape `(batch, n_units)`
/// * `c1` - output scale coefficient (see [`SURROGATE_C1`])
/// * `c2` - sharpness coefficient (see [`SURROGATE_C2`])
///
/// # Numerical stability
/// `sech(x) = 1/cosh(x)` overflows for large `|x|` when computed naively
/// (`cosh` exceeds f32 range near `|x| = 89`). The algebraically equivalent
/// form `sech(x) = 2*e^(-|x|) / (1 + e^(-2|x|))` only ever exponentiates
/// non-positive values and stays finite for every finite input.
#[inline]
pub fn surrogate_dfx(j: &Array2<f32>, c1: f32, c2: f32) -> Array2<f32> {
    j.mapv(|ji| {
        if ji > 0.0 {
            let s = stable_sech(c2 * ji);
            c1 * c2 * s * s
        } else {
            0.0
        }
    })
}

/// Overflow-free hyperbolic secant.
#[inline]
fn stable_sech(x: f32) -> f32 {
    let e = (-x.abs()).exp();
    2.0 * e / (1.0 + e * e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_zero_for_nonpositive_current() {
        let j = array![[-5.0, -0.001, 0.0]];
        let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_positive_for_positive_current() {
        let j = array![[0.001, 1.0, 10.0]];
        let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
        assert!(out.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_peak_value_near_zero_current() {
        // sech(x) -> 1 as x -> 0, so the surrogate approaches c1 * c2
        let j = array![[1e-6]];
        let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
        assert!((out[[0, 0]] - SURROGATE_C1 * SURROGATE_C2).abs() < 1e-6);
    }

    #[test]
    fn test_matches_naive_sech_in_safe_range() {
        let j = array![[0.5, 2.0, 30.0]];
        let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
        for (&ji, &oi) in j.iter().zip(out.iter()) {
            let x = SURROGATE_C2 * ji;
            let sech = 1.0 / ((x.exp() + (-x).exp()) / 2.0);
            let expected = SURROGATE_C1 * SURROGATE_C2 * sech * sech;
            assert!((oi - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn test_no_overflow_for_extreme_current() {
        let j = array![[1e30, f32::MAX]];
        let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
        assert!(out.iter().all(|&v| v.is_finite()));
        // far past the peak the surrogate decays to (subnormal) zero
        assert!(out.iter().all(|&v| v >= 0.0));
    }

    proptest! {
        #[test]
        fn prop_output_sign_follows_current_sign(ji in -1e6f32..1e6f32) {
            let j = Array2::from_elem((1, 1), ji);
            let out = surrogate_dfx(&j, SURROGATE_C1, SURROGATE_C2);
            if ji > 0.0 {
                prop_assert!(out[[0, 0]] >= 0.0);
                prop_assert!(out[[0, 0]].is_finite());
            } else {
                prop_assert_eq!(out[[0, 0]], 0.0);
            }
        }
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Time-of-last-spike bookkeeping

use ndarray::{Array2, Zip};

/// Update the time-of-last-spike record.
///
/// For every unit that spiked this step, record the current time `t`; every
/// other unit keeps its previous value: `tols' = (1 - s) * tols + s * t`.
#[inline]
pub fn update_spike_times(t: f32, s: &Array2<f32>, tols: &Array2<f32>) -> Array2<f32> {
    Zip::from(s)
        .and(tols)
        .map_collect(|&si, &ti| (1.0 - si) * ti + si * t)
}

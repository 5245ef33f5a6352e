// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! General measurement/metric utilities
//!
//! Batch-oriented losses and evaluation metrics used around simulation runs.
//! All inputs are `(batch, k)` arrays; rows are samples.

use ndarray::{Array1, Array2, Zip};

/// Categorical negative log likelihood.
///
/// Predicted probabilities are clipped to `[epsilon, 1 - epsilon]` before the
/// log; the per-row sums are averaged over the batch.
pub fn cat_nll(p: &Array2<f32>, x: &Array2<f32>, epsilon: f32) -> f32 {
    let mut total = 0.0;
    for (p_row, x_row) in p.rows().into_iter().zip(x.rows()) {
        let mut row_nll = 0.0;
        for (&pi, &xi) in p_row.iter().zip(x_row.iter()) {
            let clipped = pi.clamp(epsilon, 1.0 - epsilon);
            row_nll -= xi * clipped.ln();
        }
        total += row_nll;
    }
    total / p.nrows() as f32
}

/// Mean squared error between predictions and targets.
pub fn mse(mu: &Array2<f32>, x: &Array2<f32>) -> f32 {
    let mut total = 0.0;
    Zip::from(mu).and(x).for_each(|&mi, &xi| {
        let diff = mi - xi;
        total += diff * diff;
    });
    total / mu.len() as f32
}

/// Binary cross entropy, returned per sample row.
pub fn bce(p: &Array2<f32>, x: &Array2<f32>, offset: f32) -> Array1<f32> {
    let mut out = Array1::zeros(p.nrows());
    for (i, (p_row, x_row)) in p.rows().into_iter().zip(x.rows()).enumerate() {
        let mut row_loss = 0.0;
        for (&pi, &xi) in p_row.iter().zip(x_row.iter()) {
            let clipped = pi.clamp(offset, 1.0 - offset);
            row_loss -= xi * clipped.ln() + (1.0 - xi) * (1.0 - clipped).ln();
        }
        out[i] = row_loss;
    }
    out
}

/// Fraction of rows whose score argmax agrees with the label argmax.
pub fn accuracy(scores: &Array2<f32>, labels: &Array2<f32>) -> f32 {
    if scores.nrows() == 0 {
        return 0.0;
    }
    let mut hits = 0usize;
    for (s_row, l_row) in scores.rows().into_iter().zip(labels.rows()) {
        if argmax(s_row.iter().copied()) == argmax(l_row.iter().copied()) {
            hits += 1;
        }
    }
    hits as f32 / scores.nrows() as f32
}

/// Average accuracy over a task matrix: the mean of its final row.
pub fn task_accuracy(t: &Array2<f32>) -> f32 {
    let last = t.nrows() - 1;
    let mut acc = 0.0;
    for col in 0..t.ncols() {
        acc += t[[last, col]];
    }
    acc / t.nrows() as f32
}

/// Backward transfer over a task matrix.
///
/// For each task except the last, how much its final-row accuracy differs
/// from the accuracy measured right after training it (the diagonal entry).
pub fn backward_transfer(t: &Array2<f32>) -> f32 {
    let last = t.nrows() - 1;
    let mut bwt = 0.0;
    for col in 0..t.ncols() - 1 {
        bwt += t[[last, col]] - t[[col, col]];
    }
    bwt / (t.ncols() - 1) as f32
}

fn argmax(values: impl Iterator<Item = f32>) -> usize {
    let mut best = 0usize;
    let mut best_value = f32::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_value {
            best_value = v;
            best = i;
        }
    }
    best
}

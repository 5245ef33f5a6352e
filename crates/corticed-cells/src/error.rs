// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for cell operations

use crate::wiring::Compartment;
use std::path::PathBuf;

/// Error types for cell construction, wiring, and persistence.
///
/// Every failure surfaces synchronously to the caller of the triggering
/// operation; nothing is retried or swallowed inside this crate.
#[derive(Debug, thiserror::Error)]
pub enum CellError {
    /// A required input compartment has no incoming connections. Raised at
    /// verification time, before simulation begins.
    #[error("cell '{cell}' has no incoming connections on its '{compartment}' compartment")]
    MissingInput {
        cell: String,
        compartment: Compartment,
    },

    /// Externally supplied array does not match the cell's state shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Snapshot file could not be read or written.
    #[error("snapshot I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file exists but does not parse as a threshold archive.
    #[error("malformed snapshot at {path}: {reason}")]
    MalformedSnapshot { path: PathBuf, reason: String },

    /// Snapshot threshold width disagrees with the cell's unit count.
    #[error("snapshot holds {actual} threshold entries, cell expects {expected}")]
    SnapshotSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CellError>;

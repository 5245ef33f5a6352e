// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Threshold snapshot persistence
//!
//! One archive file per cell, named by the cell's identifier, holding a
//! single named array entry: the threshold vector (shape `1 x n_units`).
//! There is no versioning field. A missing or corrupt file is a hard error
//! for the caller; no fallback re-sampling happens here.

use crate::error::{CellError, Result};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Flat named-array archive for a cell's threshold state.
#[derive(Debug, Serialize, Deserialize)]
struct ThresholdArchive {
    threshold: Vec<Vec<f32>>,
}

/// Path of the snapshot file for `cell_name` under `directory`.
pub fn snapshot_path(directory: &Path, cell_name: &str) -> PathBuf {
    directory.join(format!("{cell_name}.json"))
}

/// Persist a threshold array under `directory`, keyed by the cell's name.
pub fn save_threshold(
    directory: &Path,
    cell_name: &str,
    threshold: ArrayView2<'_, f32>,
) -> Result<()> {
    fs::create_dir_all(directory)?;
    let path = snapshot_path(directory, cell_name);
    let archive = ThresholdArchive {
        threshold: threshold
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect(),
    };
    let payload = serde_json::to_string(&archive).map_err(|e| CellError::MalformedSnapshot {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(&path, payload)?;
    tracing::debug!(cell = cell_name, path = %path.display(), "threshold snapshot saved");
    Ok(())
}

/// Restore a threshold array previously written by [`save_threshold`].
///
/// # Errors
/// * [`CellError::Io`] when the file is missing or unreadable
/// * [`CellError::MalformedSnapshot`] when the contents do not parse, or the
///   rows are ragged
pub fn load_threshold(directory: &Path, cell_name: &str) -> Result<Array2<f32>> {
    let path = snapshot_path(directory, cell_name);
    let content = fs::read_to_string(&path)?;
    let archive: ThresholdArchive =
        serde_json::from_str(&content).map_err(|e| CellError::MalformedSnapshot {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    let rows = archive.threshold.len();
    if rows == 0 {
        return Err(CellError::MalformedSnapshot {
            path,
            reason: "empty threshold entry".to_string(),
        });
    }
    let cols = archive.threshold[0].len();
    if archive.threshold.iter().any(|row| row.len() != cols) {
        return Err(CellError::MalformedSnapshot {
            path,
            reason: "ragged threshold rows".to_string(),
        });
    }

    let flat: Vec<f32> = archive.threshold.into_iter().flatten().collect();
    let threshold =
        Array2::from_shape_vec((rows, cols), flat).map_err(|e| CellError::MalformedSnapshot {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    tracing::debug!(cell = cell_name, path = %path.display(), "threshold snapshot loaded");
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let thr = array![[0.5, 0.52, 0.48]];
        save_threshold(dir.path(), "z0", thr.view()).unwrap();
        let restored = load_threshold(dir.path(), "z0").unwrap();
        assert_eq!(restored, thr);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_threshold(dir.path(), "absent").unwrap_err();
        assert!(matches!(err, CellError::Io(_)));
    }

    #[test]
    fn test_corrupt_file_is_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(snapshot_path(dir.path(), "z0"), "not json").unwrap();
        let err = load_threshold(dir.path(), "z0").unwrap_err();
        assert!(matches!(err, CellError::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            snapshot_path(dir.path(), "z0"),
            r#"{"threshold": [[0.5, 0.5], [0.5]]}"#,
        )
        .unwrap();
        let err = load_threshold(dir.path(), "z0").unwrap_err();
        assert!(matches!(err, CellError::MalformedSnapshot { .. }));
    }
}

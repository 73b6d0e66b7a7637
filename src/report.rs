// 📊 Run report - what was generated, from which source, with which drift

use crate::drift::PerturbationOutcome;
use crate::error::{DriftError, DriftResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub index: usize,
    pub rows: usize,
    pub file: PathBuf,
    pub perturbations: Vec<PerturbationOutcome>,
}

impl BatchSummary {
    pub fn numeric_scale(&self) -> Option<f64> {
        self.perturbations.iter().find_map(|p| match p {
            PerturbationOutcome::Scaled { factor, .. } => Some(*factor),
            _ => None,
        })
    }

    pub fn relabeled(&self) -> usize {
        self.perturbations
            .iter()
            .map(|p| match p {
                PerturbationOutcome::Relabeled { relabeled, .. } => *relabeled,
                _ => 0,
            })
            .sum()
    }

    pub fn is_drifted(&self) -> bool {
        !self.perturbations.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub source_path: PathBuf,
    /// Hex SHA-256 of the input file bytes
    pub source_sha256: String,
    pub source_rows: usize,
    pub cleaned_rows: usize,
    pub seed: Option<u64>,
    pub batches: Vec<BatchSummary>,
}

impl DriftReport {
    pub fn new(source_path: &Path, source_sha256: String, seed: Option<u64>) -> Self {
        DriftReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            source_path: source_path.to_path_buf(),
            source_sha256,
            source_rows: 0,
            cleaned_rows: 0,
            seed,
            batches: Vec::new(),
        }
    }

    pub fn drifted_batches(&self) -> Vec<usize> {
        self.batches
            .iter()
            .filter(|b| b.is_drifted())
            .map(|b| b.index)
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "Batches: {}, Rows/batch: {}, Source rows: {} ({} after cleaning), Drifted: {:?}",
            self.batches.len(),
            self.batches.first().map(|b| b.rows).unwrap_or(0),
            self.source_rows,
            self.cleaned_rows,
            self.drifted_batches()
        )
    }

    pub fn write_json(&self, path: &Path) -> DriftResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DriftError::io(path, std::io::Error::other(e)))?;
        std::fs::write(path, json).map_err(|e| DriftError::io(path, e))
    }
}

/// Fingerprint of the source file, recorded for provenance
pub fn file_sha256(path: &Path) -> DriftResult<String> {
    let bytes = std::fs::read(path).map_err(|e| DriftError::io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

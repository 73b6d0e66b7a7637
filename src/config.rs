// ⚙️ Run configuration
// Replaces hard-coded paths with an explicit value passed into the generator

use crate::error::{DriftError, DriftResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "data/telco_churn.csv";
pub const DEFAULT_OUTPUT: &str = "scripts/data_streams";
pub const DEFAULT_NUM_BATCHES: usize = 10;
pub const DEFAULT_BATCH_SIZE: usize = 700;

/// Progressive scaling of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericDrift {
    pub column: String,
    /// Batches with an index above this are scaled
    pub start_after: usize,
    /// Added to the scale factor for each batch past `start_after`
    pub step: f64,
}

impl Default for NumericDrift {
    fn default() -> Self {
        NumericDrift {
            column: "MonthlyCharges".to_string(),
            start_after: 5,
            step: 0.1,
        }
    }
}

impl NumericDrift {
    /// Scale factor for a batch, None while drift has not started
    pub fn factor(&self, batch_index: usize) -> Option<f64> {
        (batch_index > self.start_after)
            .then(|| 1.0 + (batch_index - self.start_after) as f64 * self.step)
    }
}

/// Relabeling of a fraction of one category into another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoricalDrift {
    pub column: String,
    pub start_after: usize,
    pub from: String,
    pub to: String,
    pub fraction: f64,
}

impl Default for CategoricalDrift {
    fn default() -> Self {
        CategoricalDrift {
            column: "Contract".to_string(),
            start_after: 7,
            from: "One year".to_string(),
            to: "Month-to-month".to_string(),
            fraction: 0.2,
        }
    }
}

impl CategoricalDrift {
    pub fn is_active(&self, batch_index: usize) -> bool {
        batch_index > self.start_after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub input_path: PathBuf,
    /// Wiped and recreated on every run when `overwrite` is set
    pub output_dir: PathBuf,
    pub num_batches: usize,
    pub batch_size: usize,
    pub numeric_drift: NumericDrift,
    pub categorical_drift: CategoricalDrift,
    pub seed: Option<u64>,
    pub overwrite: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        DriftConfig {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT),
            num_batches: DEFAULT_NUM_BATCHES,
            batch_size: DEFAULT_BATCH_SIZE,
            numeric_drift: NumericDrift::default(),
            categorical_drift: CategoricalDrift::default(),
            seed: None,
            overwrite: true,
        }
    }
}

impl DriftConfig {
    /// Defaults with both paths resolved against a project root
    pub fn with_root(root: &Path) -> Self {
        DriftConfig {
            input_path: root.join(DEFAULT_INPUT),
            output_dir: root.join(DEFAULT_OUTPUT),
            ..Default::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DriftConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Relative paths are joined onto `root`
    pub fn resolve_paths(&mut self, root: &Path) {
        if self.input_path.is_relative() {
            self.input_path = root.join(&self.input_path);
        }
        if self.output_dir.is_relative() {
            self.output_dir = root.join(&self.output_dir);
        }
    }

    pub fn validate(&self) -> DriftResult<()> {
        if self.num_batches == 0 {
            return Err(DriftError::InvalidConfig("num_batches must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(DriftError::InvalidConfig("batch_size must be at least 1".into()));
        }
        let step = self.numeric_drift.step;
        if !step.is_finite() || step < 0.0 {
            return Err(DriftError::InvalidConfig(format!(
                "numeric_drift.step must be finite and non-negative, got {}",
                step
            )));
        }
        // Fractions above 1 are allowed here and fail when sampled
        let fraction = self.categorical_drift.fraction;
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(DriftError::InvalidConfig(format!(
                "categorical_drift.fraction must be finite and non-negative, got {}",
                fraction
            )));
        }
        Ok(())
    }
}

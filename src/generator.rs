// 🏭 Batch Generator - load → clean → sample → perturb → write
//
// One call produces `num_batches` files `batch_<i>.csv` in the output
// directory. The directory is owned by the run: with `overwrite` set it is
// removed and recreated before anything else happens.

use crate::cleaner::{clean, drop_unlabeled};
use crate::config::DriftConfig;
use crate::drift::DriftPlan;
use crate::error::{DriftError, DriftResult};
use crate::report::{file_sha256, BatchSummary, DriftReport};
use crate::sampler::sample_with_replacement;
use crate::table::{load_csv, write_csv};
use log::{debug, info, warn};
use rand::RngCore;
use std::fs;
use std::path::Path;

pub fn batch_file_name(batch_index: usize) -> String {
    format!("batch_{}.csv", batch_index)
}

/// Remove `dir` if present, then create it empty.
///
/// With `overwrite == false` an existing directory is left alone and
/// reported as `OutputExists`.
pub fn prepare_output_dir(dir: &Path, overwrite: bool) -> DriftResult<()> {
    if dir.exists() {
        if !overwrite {
            return Err(DriftError::OutputExists(dir.to_path_buf()));
        }
        fs::remove_dir_all(dir).map_err(|e| DriftError::io(dir, e))?;
        debug!("Removed previous output at {}", dir.display());
    }
    fs::create_dir_all(dir).map_err(|e| DriftError::io(dir, e))
}

pub struct BatchGenerator {
    config: DriftConfig,
    plan: DriftPlan,
}

impl BatchGenerator {
    pub fn new(config: DriftConfig) -> DriftResult<Self> {
        let plan = DriftPlan::from_config(&config);
        BatchGenerator::with_plan(config, plan)
    }

    pub fn with_plan(config: DriftConfig, plan: DriftPlan) -> DriftResult<Self> {
        config.validate()?;
        Ok(BatchGenerator { config, plan })
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Run the whole pipeline.
    ///
    /// Destructive: the output directory is wiped first (see
    /// `prepare_output_dir`). Any failure aborts the run and leaves whatever
    /// batches were already written.
    pub fn generate<R: RngCore>(&self, rng: &mut R) -> DriftResult<DriftReport> {
        let config = &self.config;
        info!("Starting drift injection...");

        prepare_output_dir(&config.output_dir, config.overwrite)?;

        let raw = load_csv(&config.input_path)?;
        let mut report = DriftReport::new(
            &config.input_path,
            file_sha256(&config.input_path)?,
            config.seed,
        );
        report.source_rows = raw.len();

        let mut cleaned = clean(raw)?;
        let unlabeled = drop_unlabeled(&mut cleaned)?;
        report.cleaned_rows = cleaned.len();
        info!(
            "Loaded {} rows from {} ({} kept after cleaning, {} unlabeled dropped)",
            report.source_rows,
            config.input_path.display(),
            report.cleaned_rows,
            unlabeled
        );

        if cleaned.len() < config.batch_size {
            warn!(
                "Only {} cleaned rows for batches of {}; batches will repeat rows heavily",
                cleaned.len(),
                config.batch_size
            );
        }

        for batch_index in 1..=config.num_batches {
            let picks = sample_with_replacement(cleaned.len(), config.batch_size, rng)?;
            let mut batch = cleaned.take_rows(&picks);

            let perturbations = self.plan.apply(&mut batch, batch_index, &mut *rng)?;

            let file = config.output_dir.join(batch_file_name(batch_index));
            write_csv(&batch, &file)?;
            debug!("Wrote {} rows to {}", batch.len(), file.display());

            report.batches.push(BatchSummary {
                index: batch_index,
                rows: batch.len(),
                file,
                perturbations,
            });
        }

        info!("✅ Drift batches ready in {}", config.output_dir.display());
        Ok(report)
    }
}

/// Convenience wrapper: validate `config`, build the default plan, run it
pub fn generate<R: RngCore>(config: DriftConfig, rng: &mut R) -> DriftResult<DriftReport> {
    BatchGenerator::new(config)?.generate(rng)
}

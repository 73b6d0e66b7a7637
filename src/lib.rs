// Churn Drift - Core Library
// Synthetic drift batches from a static customer-churn table

pub mod table;
pub mod cleaner;
pub mod sampler;
pub mod drift;
pub mod config;
pub mod report;
pub mod generator;
pub mod error;

// Re-export commonly used types
pub use table::{Table, Value, load_csv, write_csv};
pub use cleaner::{clean, drop_unlabeled, binary_flag, BINARY_COLUMNS};
pub use sampler::{sample_with_replacement, sample_without_replacement, fraction_count};
pub use drift::{
    Perturbation, PerturbationOutcome, DriftPlan,
    NumericScale, CategoryShift,
};
pub use config::{DriftConfig, NumericDrift, CategoricalDrift};
pub use report::{DriftReport, BatchSummary};
pub use generator::{BatchGenerator, generate, prepare_output_dir, batch_file_name};
pub use error::{DriftError, DriftResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

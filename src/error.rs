// ⚠️ Error taxonomy for the drift generator
// Every fatal condition of a run maps to exactly one variant

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No columns to parse from {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Sampling error: requested {requested} rows from a population of {available}")]
    Sampling { requested: usize, available: usize },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Non-numeric value {value:?} in column {column} (row {row})")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Output directory already exists: {} (overwrite disabled)", .0.display())]
    OutputExists(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriftError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DriftError::Io {
            path: path.into(),
            source,
        }
    }

    /// csv::Error wraps both I/O and format failures; keep the taxonomy honest
    pub fn from_csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if let csv::ErrorKind::Io(io) = source.kind() {
            return DriftError::Io {
                path,
                source: std::io::Error::new(io.kind(), io.to_string()),
            };
        }
        DriftError::Parse { path, source }
    }
}

pub type DriftResult<T> = std::result::Result<T, DriftError>;

//! Error types for dataset ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the salary dataset.
///
/// All of these are fatal at startup: there is no partial dataset.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("cannot read dataset at {path}: {source}")]
    Io {
        /// Path of the dataset file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The delimited data is malformed.
    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    /// A required column header is absent.
    #[error("required column missing: {column}")]
    MissingColumn {
        /// Canonical name of the missing column.
        column: &'static str,
    },

    /// No usable rows remained after normalization.
    #[error("dataset at {path} contains no usable rows")]
    EmptyDataset {
        /// Path of the dataset file.
        path: PathBuf,
    },
}

impl IngestError {
    /// Creates an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for ingestion operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

//! Error types for the explorer pipeline.

use salary_dataset::IngestError;
use thiserror::Error;

/// Errors surfaced by the explorer.
///
/// Only startup can fail; event handling always produces a response.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The dataset could not be loaded.
    #[error("dataset ingestion failed: {0}")]
    Ingest(#[from] IngestError),
}

/// An experience range that violates the selection domain.
///
/// Returned only by the strict [`ExperienceRange::new`](crate::ExperienceRange::new)
/// constructor; event handling recovers by clamping instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Lower bound exceeds upper bound.
    #[error("experience range inverted: {min} > {max}")]
    Inverted {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
    },

    /// A bound lies outside the experience domain.
    #[error("experience range [{min}, {max}] outside [{domain_min}, {domain_max}]")]
    OutOfBounds {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
        /// Domain lower bound.
        domain_min: u32,
        /// Domain upper bound.
        domain_max: u32,
    },
}

/// Result type for explorer operations.
pub type ExplorerResult<T> = std::result::Result<T, ExplorerError>;

//! # salary-dataset
//!
//! The immutable salary record store behind the salary explorer.
//!
//! This crate provides:
//! - **Records**: normalized salary entries with sentinel values for missing categories
//! - **Ingestion**: delimited-file loading with header mapping and fail-fast validation
//! - **Indexes**: sorted distinct values and per-value record bitmaps for every
//!   categorical column, plus an experience-years index
//!
//! ## Usage
//!
//! ```no_run
//! use salary_dataset::{CategoryColumn, Dataset};
//!
//! let dataset = Dataset::load("salary_data.csv")?;
//! println!("{} records", dataset.len());
//!
//! for title in dataset.distinct_values(CategoryColumn::JobTitle) {
//!     println!("{title}");
//! }
//! # Ok::<(), salary_dataset::IngestError>(())
//! ```
//!
//! ## Columns
//!
//! | Field | Source headers | Missing value |
//! |-------|----------------|---------------|
//! | Job title | `Job Title`, `Befattning` | `Not Specified` |
//! | Department | `Department`, `Arbetsplats` | `Not Specified` |
//! | Specialist type | `SpecialistType`, `Specialist eller ST-fysiker` | `Nej` |
//! | Experience | `ExperienceYears`, `Antal hela år med arbete i klinisk verksamhet` | row skipped |
//! | Salary | `MonthlySalary`, `Månadslön totalt` | row skipped |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod dataset;
mod error;
mod fingerprint;
pub mod loader;
mod record;
mod registry;

pub use dataset::{Dataset, EXPERIENCE_MAX, EXPERIENCE_MIN};
pub use error::{IngestError, IngestResult};
pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use loader::{load_from_reader, load_with_options, LoadOptions, LoadReport};
pub use record::{specialist, CategoryColumn, Record, NOT_SPECIFIED};
pub use registry::CategoryRegistry;

/// Re-exported so downstream crates share one bitmap type.
pub use roaring::RoaringBitmap;

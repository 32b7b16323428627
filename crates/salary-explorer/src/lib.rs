//! # salary-explorer
//!
//! Memoized filter-and-aggregate pipeline behind the salary explorer dashboard.
//!
//! Every UI event runs one pass through the pipeline: resolve the filter
//! selection, filter the dataset, derive the filter widget options with
//! counts, and render the active tab. The options and the chart of one
//! response always come from the same filtered subset.
//!
//! ## Key Features
//!
//! - **Canonical selections** - value sets are ordered, so selection order never misses the cache
//! - **Bitmap filtering** - per-value record bitmaps intersected with `roaring`
//! - **Two memoized stages** - filter results keyed by selection, options keyed by subset content
//! - **Never-failing views** - an empty subset renders an explicit empty payload
//!
//! ## Quick Start
//!
//! ```no_run
//! use salary_dataset::LoadOptions;
//! use salary_explorer::{Explorer, ExplorerConfig, UiEvent, ViewPayload};
//!
//! let explorer = Explorer::load("salary_data.csv", &LoadOptions::default(), ExplorerConfig::default())?;
//!
//! let response = explorer.on_event(&UiEvent::initial());
//! if let ViewPayload::Scatter(view) = &response.view {
//!     println!("{} trend lines", view.trends.len());
//! }
//! for option in &response.options.job_titles {
//!     println!("{}", option.display_label());
//! }
//! # Ok::<(), salary_explorer::ExplorerError>(())
//! ```
//!
//! ## Tabs
//!
//! | Tab | Payload | Empty subset |
//! |-----|---------|--------------|
//! | Histogram | 20 salary bins + box plot | `ViewPayload::Empty` |
//! | Scatter | points, per-group OLS lines, overall line | `ViewPayload::Empty` |
//! | Statistics | full vs filtered table | filtered count 0, other cells undefined |
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for events, responses and payloads
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       salary-explorer                        │
//! │                                                              │
//! │  Explorer::on_event(UiEvent)                                 │
//! │  ├── resolve FilterSelection (reset / clamp)                 │
//! │  ├── FilterEngine   selection → FilteredSubset   (memoized)  │
//! │  ├── OptionDeriver  subset → FilterOptions       (memoized)  │
//! │  ├── ViewAggregator subset + dataset → ViewPayload           │
//! │  └── EventResponse { view, options, selection, stats }       │
//! │                                                              │
//! │  Dependencies:                                               │
//! │  └── salary-dataset - Dataset, Record, indexes, fingerprints │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod controller;
mod error;
mod filter;
mod options;
mod selection;
mod subset;
pub mod views;

// Public re-exports
pub use cache::{CacheStats, MemoCache, StageStats};
pub use config::{CacheConfig, ExplorerConfig, ExplorerConfigBuilder, DEFAULT_HISTOGRAM_BINS};
pub use controller::{EventResponse, EventSource, Explorer, PipelineStats, SelectionInput, UiEvent};
pub use error::{ExplorerError, ExplorerResult, SelectionError};
pub use filter::{filter_records, filter_within, FilterEngine};
pub use options::{derive_options, FilterOption, FilterOptions, OptionDeriver};
pub use selection::{experience_marks, ExperienceRange, FilterSelection, EXPERIENCE_MARK_STEP};
pub use subset::FilteredSubset;
pub use views::{EmptyView, Palette, ViewAggregator, ViewPayload, ViewTab};

// Re-export commonly used types from dependencies for convenience
pub use salary_dataset::{CategoryColumn, Dataset, Record};

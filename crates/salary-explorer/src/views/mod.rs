//! View aggregation: tab-specific payloads built from a filtered subset.
//!
//! Every view compares or contrasts the filtered subset with the full
//! dataset. Payloads are recomputed on every event and never cached.
//!
//! An empty subset is not an error. The histogram and scatter tabs produce
//! [`ViewPayload::Empty`]; the statistics tab still reports the full-dataset
//! column with an undefined filtered column.

pub mod histogram;
pub mod palette;
pub mod regression;
pub mod scatter;
pub mod statistics;

use std::fmt;

use salary_dataset::{CategoryColumn, Dataset};

use crate::config::ExplorerConfig;
use crate::subset::FilteredSubset;

pub use histogram::{bin_values, HistogramBin, HistogramView};
pub use palette::{ColorVariants, Palette, Rgba};
pub use regression::{fit_ols, Point, TrendLine};
pub use scatter::{GroupTrend, ScatterPoint, ScatterView};
pub use statistics::{percentile, BoxSummary, StatisticsRow, StatisticsTable, SummaryStats};

/// Message of the empty-result payload.
pub const NO_DATA_MESSAGE: &str = "No data matches the current filters.";

/// Visualization tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ViewTab {
    /// Salary histogram with box plot.
    Histogram,
    /// Salary vs experience, coloured by category.
    #[default]
    Scatter,
    /// Full vs filtered comparison table.
    Statistics,
}

impl ViewTab {
    /// All tabs in display order.
    pub const ALL: [ViewTab; 3] = [ViewTab::Histogram, ViewTab::Scatter, ViewTab::Statistics];

    /// Tab identifier used on the UI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewTab::Histogram => "histogram",
            ViewTab::Scatter => "scatter",
            ViewTab::Statistics => "statistics",
        }
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit "no data" payload for chart tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmptyView {
    /// Tab that had nothing to draw.
    pub tab: ViewTab,
    /// Message for the user.
    pub message: String,
}

/// Rendered output of one tab.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ViewPayload {
    /// Histogram tab.
    Histogram(HistogramView),
    /// Scatter tab.
    Scatter(ScatterView),
    /// Statistics tab.
    Statistics(StatisticsTable),
    /// Chart tab over an empty subset.
    Empty(EmptyView),
}

impl ViewPayload {
    /// Returns true for the empty-result variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewPayload::Empty(_))
    }

    /// The tab this payload renders.
    pub fn tab(&self) -> ViewTab {
        match self {
            ViewPayload::Histogram(_) => ViewTab::Histogram,
            ViewPayload::Scatter(_) => ViewTab::Scatter,
            ViewPayload::Statistics(_) => ViewTab::Statistics,
            ViewPayload::Empty(empty) => empty.tab,
        }
    }
}

/// Builds view payloads.
#[derive(Debug, Clone)]
pub struct ViewAggregator {
    bins: usize,
    palette: Palette,
}

impl ViewAggregator {
    /// Creates an aggregator.
    pub fn new(bins: usize, palette: Palette) -> Self {
        Self {
            bins: bins.max(1),
            palette,
        }
    }

    /// Creates an aggregator from explorer configuration.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(config.histogram_bins, config.palette.clone())
    }

    /// Renders `tab` for `subset`.
    ///
    /// `grouping` only affects the scatter tab.
    pub fn render(
        &self,
        tab: ViewTab,
        grouping: CategoryColumn,
        subset: &FilteredSubset,
        dataset: &Dataset,
    ) -> ViewPayload {
        let payload = match tab {
            ViewTab::Histogram => {
                let salaries = subset.records(dataset).map(|r| r.monthly_salary).collect();
                HistogramView::build(salaries, self.bins).map(ViewPayload::Histogram)
            }
            ViewTab::Scatter => ScatterView::build(dataset, subset, grouping, &self.palette)
                .map(ViewPayload::Scatter),
            ViewTab::Statistics => {
                let full = SummaryStats::compute(dataset.records());
                let filtered = SummaryStats::compute(subset.records(dataset));
                Some(ViewPayload::Statistics(StatisticsTable::compare(
                    full.as_ref(),
                    filtered.as_ref(),
                )))
            }
        };

        payload.unwrap_or_else(|| {
            ViewPayload::Empty(EmptyView {
                tab,
                message: NO_DATA_MESSAGE.to_string(),
            })
        })
    }

    /// Histogram bin count.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Category palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Default for ViewAggregator {
    fn default() -> Self {
        Self::from_config(&ExplorerConfig::default())
    }
}

//! Salary histogram with a marginal box plot.

use super::statistics::BoxSummary;

/// Chart title.
pub const HISTOGRAM_TITLE: &str = "Salary Distribution";
/// Salary axis label, shared with the scatter view.
pub const SALARY_LABEL: &str = "Total Monthly Salary";
/// Gap between bars, as a fraction of the bin width.
pub const BAR_GAP: f64 = 0.1;
/// Bar opacity.
pub const BAR_OPACITY: f64 = 0.7;

/// One equal-width bin.
///
/// Bins are half-open `[start, end)` except the last, which also holds `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// Values in the bin.
    pub count: usize,
}

/// Histogram payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramView {
    /// Chart title.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Bins in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Box plot over the same values.
    pub box_summary: BoxSummary,
    /// Number of values binned.
    pub total: usize,
    /// Gap between bars.
    pub bar_gap: f64,
    /// Bar opacity.
    pub opacity: f64,
}

impl HistogramView {
    /// Builds the view; `None` when there are no values.
    pub fn build(values: Vec<f64>, bins: usize) -> Option<Self> {
        let histogram = bin_values(&values, bins);
        let total = values.len();
        let box_summary = BoxSummary::compute(values)?;
        Some(Self {
            title: HISTOGRAM_TITLE.to_string(),
            x_label: SALARY_LABEL.to_string(),
            bins: histogram,
            box_summary,
            total,
            bar_gap: BAR_GAP,
            opacity: BAR_OPACITY,
        })
    }
}

/// Splits the observed range of `values` into `bins` equal-width bins.
///
/// When every value is equal the range is widened to `[v - 0.5, v + 0.5]`.
/// Returns no bins for empty input; a bin count of zero is treated as one.
pub fn bin_values(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }
    let bins = bins.max(1);

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

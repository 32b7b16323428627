//! Configuration types for the explorer pipeline.

use std::time::Duration;

use crate::views::Palette;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Configuration for the explorer pipeline.
///
/// # Example
///
/// ```rust
/// use salary_explorer::{CacheConfig, ExplorerConfig};
/// use std::time::Duration;
///
/// let config = ExplorerConfig::builder()
///     .with_cache(CacheConfig {
///         max_entries: 64,
///         ttl: Duration::from_secs(60),
///     })
///     .with_histogram_bins(30)
///     .build();
///
/// assert_eq!(config.histogram_bins, 30);
/// ```
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Memoization settings (None = every event recomputes).
    pub cache: Option<CacheConfig>,
    /// Number of equal-width salary bins in the histogram view.
    pub histogram_bins: usize,
    /// Colours assigned to categories in the scatter view.
    pub palette: Palette,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            cache: Some(CacheConfig::default()),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            palette: Palette::default(),
        }
    }
}

impl ExplorerConfig {
    /// Creates a new builder for ExplorerConfig.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }
}

/// Builder for ExplorerConfig.
#[derive(Debug, Clone)]
pub struct ExplorerConfigBuilder {
    cache: Option<CacheConfig>,
    histogram_bins: usize,
    palette: Palette,
}

impl Default for ExplorerConfigBuilder {
    fn default() -> Self {
        let defaults = ExplorerConfig::default();
        Self {
            cache: defaults.cache,
            histogram_bins: defaults.histogram_bins,
            palette: defaults.palette,
        }
    }
}

impl ExplorerConfigBuilder {
    /// Enables memoization with the given configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Disables memoization.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Sets the histogram bin count (at least one).
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.max(1);
        self
    }

    /// Sets the category palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Builds the ExplorerConfig.
    pub fn build(self) -> ExplorerConfig {
        ExplorerConfig {
            cache: self.cache,
            histogram_bins: self.histogram_bins,
            palette: self.palette,
        }
    }
}

/// Configuration for stage memoization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of memoized results per stage.
    pub max_entries: usize,
    /// Time-to-live for memoized results.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(300),
        }
    }
}

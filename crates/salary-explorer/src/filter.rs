//! The filter engine: selection -> filtered subset.

use std::sync::Arc;

use parking_lot::RwLock;
use salary_dataset::{CategoryColumn, Dataset, RoaringBitmap};

use crate::cache::{MemoCache, StageStats};
use crate::config::CacheConfig;
use crate::selection::FilterSelection;
use crate::subset::FilteredSubset;

/// Computes the records of `dataset` matching every predicate of `selection`.
///
/// A record is kept iff its job title, department and specialist type are all
/// in the corresponding selected sets and its experience lies in the selected
/// range. An empty value set therefore yields an empty subset.
pub fn filter_records(dataset: &Dataset, selection: &FilterSelection) -> FilteredSubset {
    FilteredSubset::new(matching_positions(dataset, selection))
}

/// Filters an existing subset further by `selection`.
///
/// Filtering is idempotent: `filter_within(d, &filter_records(d, s), s)`
/// equals `filter_records(d, s)`.
pub fn filter_within(
    dataset: &Dataset,
    base: &FilteredSubset,
    selection: &FilterSelection,
) -> FilteredSubset {
    let mut positions = matching_positions(dataset, selection);
    positions &= base.positions();
    FilteredSubset::new(positions)
}

fn matching_positions(dataset: &Dataset, selection: &FilterSelection) -> RoaringBitmap {
    let range = selection.experience;
    let mut positions = dataset.experience_postings(range.min(), range.max());

    for column in CategoryColumn::ALL {
        if positions.is_empty() {
            break;
        }
        positions &= column_positions(dataset, column, selection);
    }

    positions
}

/// Union of the postings of every selected value in one column.
///
/// Values unknown to the dataset contribute nothing.
fn column_positions(
    dataset: &Dataset,
    column: CategoryColumn,
    selection: &FilterSelection,
) -> RoaringBitmap {
    selection
        .values(column)
        .iter()
        .filter_map(|value| dataset.postings(column, value))
        .fold(RoaringBitmap::new(), |mut acc, postings| {
            acc |= postings;
            acc
        })
}

/// Memoized filter stage over one immutable dataset.
///
/// Results are keyed by the canonical [`FilterSelection`]; a hit returns the
/// same `Arc` that was stored, without recomputation. No invalidation beyond
/// the TTL is needed because the dataset never changes.
///
/// # Example
///
/// ```
/// use salary_dataset::{Dataset, Record};
/// use salary_explorer::{CacheConfig, ExperienceRange, FilterEngine, FilterSelection};
/// use std::sync::Arc;
///
/// let dataset = Arc::new(Dataset::from_records(vec![
///     Record::new("A", "X", "Nej", 2, 30_000.0),
///     Record::new("A", "X", "Nej", 30, 50_000.0),
/// ]));
/// let engine = FilterEngine::new(dataset.clone(), Some(&CacheConfig::default()));
///
/// let selection = FilterSelection::all(&dataset).with_experience(ExperienceRange::clamped(0, 10));
/// assert_eq!(engine.filter(&selection).len(), 1);
/// ```
pub struct FilterEngine {
    dataset: Arc<Dataset>,
    cache: Option<MemoCache<FilterSelection, Arc<FilteredSubset>>>,
    stats: RwLock<StageStats>,
}

impl FilterEngine {
    /// Creates an engine; `None` disables memoization.
    pub fn new(dataset: Arc<Dataset>, cache: Option<&CacheConfig>) -> Self {
        Self {
            dataset,
            cache: cache.map(MemoCache::new),
            stats: RwLock::new(StageStats::default()),
        }
    }

    /// Returns the subset matching `selection`, from cache when possible.
    pub fn filter(&self, selection: &FilterSelection) -> Arc<FilteredSubset> {
        self.lookup(selection).0
    }

    /// Like [`filter`](Self::filter), also reporting whether the cache answered.
    pub fn lookup(&self, selection: &FilterSelection) -> (Arc<FilteredSubset>, bool) {
        let compute = || Arc::new(filter_records(&self.dataset, selection));

        let (subset, hit) = match &self.cache {
            Some(cache) => cache.get_or_insert_with(selection.clone(), compute),
            None => (compute(), false),
        };

        self.stats.write().record(hit);
        tracing::debug!(
            hit,
            matched = subset.len(),
            total = self.dataset.len(),
            "filter stage"
        );

        (subset, hit)
    }

    /// Pre-computes subsets so later lookups hit the cache.
    pub fn warm<'s, I>(&self, selections: I)
    where
        I: IntoIterator<Item = &'s FilterSelection>,
    {
        for selection in selections {
            let _ = self.lookup(selection);
        }
    }

    /// The dataset this engine filters.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// The memo cache, if enabled.
    pub fn cache(&self) -> Option<&MemoCache<FilterSelection, Arc<FilteredSubset>>> {
        self.cache.as_ref()
    }

    /// Clears memoized subsets.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> StageStats {
        self.stats.read().clone()
    }

    /// Resets hit/miss counters.
    pub fn reset_stats(&self) {
        *self.stats.write() = StageStats::default();
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("records", &self.dataset.len())
            .field("cache", &self.cache)
            .field("stats", &self.stats())
            .finish()
    }
}

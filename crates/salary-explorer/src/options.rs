//! The option deriver: filter widget contents from a filtered subset.

use std::sync::Arc;

use parking_lot::RwLock;
use salary_dataset::{CategoryColumn, Dataset, Fingerprint};

use crate::cache::{MemoCache, StageStats};
use crate::config::CacheConfig;
use crate::subset::FilteredSubset;

/// One entry of a filter widget.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterOption {
    /// Value carried by the widget when checked.
    pub value: String,
    /// Display name of the value.
    pub label: String,
    /// Occurrences of the value in the filtered subset.
    pub count: usize,
}

impl FilterOption {
    /// Label with the count appended, e.g. `"Läkare (12)"`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.label, self.count)
    }
}

/// Option lists for the three categorical filters.
///
/// Each list holds one entry per distinct value of the **full** dataset, in
/// lexicographic order, so membership never changes between events; only
/// the counts do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterOptions {
    /// Job title options.
    pub job_titles: Vec<FilterOption>,
    /// Department options.
    pub departments: Vec<FilterOption>,
    /// Specialist type options.
    pub specialist_types: Vec<FilterOption>,
}

impl FilterOptions {
    /// Options of one column.
    pub fn column(&self, column: CategoryColumn) -> &[FilterOption] {
        match column {
            CategoryColumn::JobTitle => &self.job_titles,
            CategoryColumn::Department => &self.departments,
            CategoryColumn::SpecialistType => &self.specialist_types,
        }
    }
}

/// Derives option lists with occurrence counts within `subset`.
pub fn derive_options(subset: &FilteredSubset, dataset: &Dataset) -> FilterOptions {
    FilterOptions {
        job_titles: column_options(subset, dataset, CategoryColumn::JobTitle),
        departments: column_options(subset, dataset, CategoryColumn::Department),
        specialist_types: column_options(subset, dataset, CategoryColumn::SpecialistType),
    }
}

fn column_options(
    subset: &FilteredSubset,
    dataset: &Dataset,
    column: CategoryColumn,
) -> Vec<FilterOption> {
    dataset
        .distinct_values(column)
        .iter()
        .map(|value| {
            let count = dataset
                .postings(column, value)
                .map_or(0, |postings| postings.intersection_len(subset.positions()));
            FilterOption {
                value: value.clone(),
                label: value.clone(),
                count: count as usize,
            }
        })
        .collect()
}

/// Memo key: dataset identity plus subset content.
type OptionsKey = (Fingerprint, Fingerprint);

/// Memoized option stage over one immutable dataset.
pub struct OptionDeriver {
    dataset: Arc<Dataset>,
    cache: Option<MemoCache<OptionsKey, Arc<FilterOptions>>>,
    stats: RwLock<StageStats>,
}

impl OptionDeriver {
    /// Creates a deriver; `None` disables memoization.
    pub fn new(dataset: Arc<Dataset>, cache: Option<&CacheConfig>) -> Self {
        Self {
            dataset,
            cache: cache.map(MemoCache::new),
            stats: RwLock::new(StageStats::default()),
        }
    }

    /// Returns the options for `subset`, from cache when possible.
    pub fn derive(&self, subset: &FilteredSubset) -> Arc<FilterOptions> {
        self.lookup(subset).0
    }

    /// Like [`derive`](Self::derive), also reporting whether the cache answered.
    pub fn lookup(&self, subset: &FilteredSubset) -> (Arc<FilterOptions>, bool) {
        let compute = || Arc::new(derive_options(subset, &self.dataset));

        let (options, hit) = match &self.cache {
            Some(cache) => {
                let key = (self.dataset.fingerprint(), subset.fingerprint());
                cache.get_or_insert_with(key, compute)
            }
            None => (compute(), false),
        };

        self.stats.write().record(hit);
        tracing::debug!(
            hit,
            subset = %subset.fingerprint().short(),
            "option stage"
        );

        (options, hit)
    }

    /// The memo cache, if enabled.
    pub fn cache(&self) -> Option<&MemoCache<OptionsKey, Arc<FilterOptions>>> {
        self.cache.as_ref()
    }

    /// Clears memoized options.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> StageStats {
        self.stats.read().clone()
    }
}

impl std::fmt::Debug for OptionDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDeriver")
            .field("cache", &self.cache)
            .field("stats", &self.stats())
            .finish()
    }
}

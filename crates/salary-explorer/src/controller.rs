//! The reactive controller: one UI event in, one consistent response out.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use salary_dataset::{
    load_with_options, CategoryColumn, Dataset, LoadOptions, EXPERIENCE_MAX, EXPERIENCE_MIN,
};

use crate::config::ExplorerConfig;
use crate::error::ExplorerResult;
use crate::filter::FilterEngine;
use crate::options::{FilterOptions, OptionDeriver};
use crate::selection::{ExperienceRange, FilterSelection};
use crate::views::{ViewAggregator, ViewPayload, ViewTab};

/// The widget that triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventSource {
    /// The reset button.
    Reset,
    /// Job title checklist.
    JobTitles,
    /// Department checklist.
    Departments,
    /// Specialist type checklist.
    SpecialistTypes,
    /// Experience slider.
    ExperienceRange,
    /// Tab switch.
    Tab,
    /// Grouping dropdown.
    Grouping,
}

/// Raw widget state as sent by the UI.
///
/// Nothing here is validated; [`Explorer::resolve_selection`] turns it into
/// a [`FilterSelection`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SelectionInput {
    /// Checked job titles.
    pub job_titles: Vec<String>,
    /// Checked departments.
    pub departments: Vec<String>,
    /// Checked specialist types.
    pub specialist_types: Vec<String>,
    /// Slider lower bound.
    pub experience_min: i64,
    /// Slider upper bound.
    pub experience_max: i64,
}

impl Default for SelectionInput {
    fn default() -> Self {
        Self {
            job_titles: Vec::new(),
            departments: Vec::new(),
            specialist_types: Vec::new(),
            experience_min: i64::from(EXPERIENCE_MIN),
            experience_max: i64::from(EXPERIENCE_MAX),
        }
    }
}

impl From<&FilterSelection> for SelectionInput {
    fn from(selection: &FilterSelection) -> Self {
        Self {
            job_titles: selection.job_titles.iter().cloned().collect(),
            departments: selection.departments.iter().cloned().collect(),
            specialist_types: selection.specialist_types.iter().cloned().collect(),
            experience_min: i64::from(selection.experience.min()),
            experience_max: i64::from(selection.experience.max()),
        }
    }
}

/// One UI event.
///
/// `trigger` is `None` on the first invocation, before any widget fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiEvent {
    /// Widget that fired.
    pub trigger: Option<EventSource>,
    /// Current widget values.
    pub selection: SelectionInput,
    /// Active tab.
    pub tab: ViewTab,
    /// Scatter grouping column.
    pub grouping: CategoryColumn,
}

impl UiEvent {
    /// The first event of a session.
    pub fn initial() -> Self {
        Self::default()
    }

    /// An event fired by `trigger` with the given widget state.
    pub fn new(
        trigger: EventSource,
        selection: SelectionInput,
        tab: ViewTab,
        grouping: CategoryColumn,
    ) -> Self {
        Self {
            trigger: Some(trigger),
            selection,
            tab,
            grouping,
        }
    }

    /// True if the selection must be reset to defaults.
    pub fn is_reset(&self) -> bool {
        matches!(self.trigger, None | Some(EventSource::Reset))
    }
}

/// Timing and cache behaviour of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineStats {
    /// Wall time spent handling the event.
    pub duration: Duration,
    /// Number of records in the filtered subset.
    pub filtered_count: usize,
    /// The filter stage was answered from cache.
    pub filter_cache_hit: bool,
    /// The option stage was answered from cache.
    pub options_cache_hit: bool,
}

/// Everything the UI needs after one event.
///
/// The view and the options are computed from the same filtered subset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventResponse {
    /// Rendered active tab.
    pub view: ViewPayload,
    /// Option lists with counts.
    pub options: FilterOptions,
    /// The selection that was applied, echoed back to the widgets.
    pub selection: FilterSelection,
    /// Pipeline statistics.
    pub stats: PipelineStats,
}

/// The explorer pipeline over one immutable dataset.
///
/// # Example
///
/// ```
/// use salary_dataset::{Dataset, Record};
/// use salary_explorer::{Explorer, UiEvent};
/// use std::sync::Arc;
///
/// let dataset = Arc::new(Dataset::from_records(vec![
///     Record::new("A", "X", "Nej", 2, 30_000.0),
///     Record::new("B", "Y", "Nej", 8, 45_000.0),
/// ]));
/// let explorer = Explorer::new(dataset);
///
/// let response = explorer.on_event(&UiEvent::initial());
/// assert_eq!(response.stats.filtered_count, 2);
/// assert!(!response.view.is_empty());
/// ```
pub struct Explorer {
    dataset: Arc<Dataset>,
    filters: FilterEngine,
    options: OptionDeriver,
    views: ViewAggregator,
    config: ExplorerConfig,
}

impl Explorer {
    /// Creates an explorer with default configuration.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_config(dataset, ExplorerConfig::default())
    }

    /// Creates an explorer with custom configuration.
    pub fn with_config(dataset: Arc<Dataset>, config: ExplorerConfig) -> Self {
        let filters = FilterEngine::new(Arc::clone(&dataset), config.cache.as_ref());
        let options = OptionDeriver::new(Arc::clone(&dataset), config.cache.as_ref());
        let views = ViewAggregator::from_config(&config);
        Self {
            dataset,
            filters,
            options,
            views,
            config,
        }
    }

    /// Loads the dataset and creates an explorer over it.
    ///
    /// # Errors
    ///
    /// Fails if the dataset cannot be ingested.
    pub fn load(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        config: ExplorerConfig,
    ) -> ExplorerResult<Self> {
        let (dataset, _report) = load_with_options(path, options)?;
        Ok(Self::with_config(Arc::new(dataset), config))
    }

    /// Handles one event.
    ///
    /// Never fails: invalid experience bounds are clamped and an empty
    /// subset yields the empty-result payloads.
    pub fn on_event(&self, event: &UiEvent) -> EventResponse {
        let started = Instant::now();

        let selection = self.resolve_selection(event);
        let (subset, filter_cache_hit) = self.filters.lookup(&selection);
        let (options, options_cache_hit) = self.options.lookup(&subset);
        let view = self
            .views
            .render(event.tab, event.grouping, &subset, &self.dataset);

        let stats = PipelineStats {
            duration: started.elapsed(),
            filtered_count: subset.len(),
            filter_cache_hit,
            options_cache_hit,
        };

        tracing::debug!(
            trigger = ?event.trigger,
            tab = %event.tab,
            grouping = %event.grouping,
            filtered = stats.filtered_count,
            filter_hit = filter_cache_hit,
            options_hit = options_cache_hit,
            elapsed_us = stats.duration.as_micros() as u64,
            "event handled"
        );

        EventResponse {
            view,
            options: options.as_ref().clone(),
            selection,
            stats,
        }
    }

    /// The selection an event applies.
    ///
    /// The first event and reset events select every known value and the
    /// full experience range, ignoring the event's widget state. Any other
    /// event uses its widget state as-is.
    pub fn resolve_selection(&self, event: &UiEvent) -> FilterSelection {
        if event.is_reset() {
            return self.default_selection();
        }

        let input = &event.selection;
        let experience = ExperienceRange::new(input.experience_min, input.experience_max)
            .unwrap_or_else(|error| {
                let clamped = ExperienceRange::clamped(input.experience_min, input.experience_max);
                tracing::warn!(
                    %error,
                    min = clamped.min(),
                    max = clamped.max(),
                    "experience range clamped"
                );
                clamped
            });

        FilterSelection::new(
            input.job_titles.iter().cloned(),
            input.departments.iter().cloned(),
            input.specialist_types.iter().cloned(),
            experience,
        )
    }

    /// All values selected, full experience range.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::all(&self.dataset)
    }

    /// The dataset.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// The active configuration.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// The filter stage.
    pub fn filter_engine(&self) -> &FilterEngine {
        &self.filters
    }

    /// The option stage.
    pub fn option_deriver(&self) -> &OptionDeriver {
        &self.options
    }

    /// Drops memoized results of both stages.
    pub fn clear_caches(&self) {
        self.filters.clear_cache();
        self.options.clear_cache();
    }

    /// Evicts expired entries from both stages, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let filters = self.filters.cache().map_or(0, |c| c.cleanup_expired());
        let options = self.options.cache().map_or(0, |c| c.cleanup_expired());
        filters + options
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("records", &self.dataset.len())
            .field("filters", &self.filters)
            .field("options", &self.options)
            .field("views", &self.views)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salary_dataset::Record;

    fn create_test_explorer() -> Explorer {
        Explorer::new(Arc::new(Dataset::from_records(vec![
            Record::new("Läkare", "Akuten", "Specialist", 12, 72_000.0),
            Record::new("Sjuksköterska", "Akuten", "Nej", 3, 38_500.0),
            Record::new("Läkare", "Kirurgen", "ST-fysiker", 5, 55_000.0),
            Record::new("Undersköterska", "Kirurgen", "Nej", 30, 31_000.0),
        ])))
    }

    fn narrowed() -> SelectionInput {
        SelectionInput {
            job_titles: vec!["Läkare".to_string()],
            departments: vec!["Akuten".to_string(), "Kirurgen".to_string()],
            specialist_types: vec![
                "Nej".to_string(),
                "ST-fysiker".to_string(),
                "Specialist".to_string(),
            ],
            experience_min: 0,
            experience_max: 50,
        }
    }

    #[test]
    fn test_initial_event_selects_everything() {
        let explorer = create_test_explorer();
        let response = explorer.on_event(&UiEvent::initial());

        assert_eq!(response.selection, explorer.default_selection());
        assert_eq!(response.stats.filtered_count, 4);
        assert_eq!(response.view.tab(), ViewTab::Scatter);
    }

    #[test]
    fn test_initial_event_ignores_widget_state() {
        let explorer = create_test_explorer();
        let event = UiEvent {
            trigger: None,
            selection: narrowed(),
            ..UiEvent::default()
        };
        assert_eq!(explorer.resolve_selection(&event), explorer.default_selection());
    }

    #[test]
    fn test_reset_overrides_selection() {
        let explorer = create_test_explorer();
        let event = UiEvent::new(
            EventSource::Reset,
            SelectionInput::default(),
            ViewTab::Histogram,
            CategoryColumn::JobTitle,
        );
        let response = explorer.on_event(&event);

        assert_eq!(response.selection.job_titles.len(), 3);
        assert_eq!(response.selection.experience, ExperienceRange::FULL);
        assert_eq!(response.stats.filtered_count, 4);
    }

    #[test]
    fn test_widget_event_uses_selection_as_is() {
        let explorer = create_test_explorer();
        let event = UiEvent::new(
            EventSource::JobTitles,
            narrowed(),
            ViewTab::Scatter,
            CategoryColumn::JobTitle,
        );
        let response = explorer.on_event(&event);

        assert_eq!(response.stats.filtered_count, 2);
        assert_eq!(response.selection.job_titles.len(), 1);
        // Options still cover every job title.
        assert_eq!(response.options.job_titles.len(), 3);
        let counts: usize = response.options.job_titles.iter().map(|o| o.count).sum();
        assert_eq!(counts, 2);
    }

    #[test]
    fn test_inverted_range_is_clamped() {
        let explorer = create_test_explorer();
        let mut input = narrowed();
        input.experience_min = 60;
        input.experience_max = 4;
        let event = UiEvent::new(
            EventSource::ExperienceRange,
            input,
            ViewTab::Scatter,
            CategoryColumn::JobTitle,
        );

        let selection = explorer.resolve_selection(&event);
        assert_eq!(
            (selection.experience.min(), selection.experience.max()),
            (4, 50)
        );
    }

    #[test]
    fn test_repeated_event_hits_caches() {
        let explorer = create_test_explorer();
        let event = UiEvent::new(
            EventSource::Tab,
            narrowed(),
            ViewTab::Statistics,
            CategoryColumn::Department,
        );

        let first = explorer.on_event(&event);
        assert!(!first.stats.filter_cache_hit);
        assert!(!first.stats.options_cache_hit);

        let second = explorer.on_event(&event);
        assert!(second.stats.filter_cache_hit);
        assert!(second.stats.options_cache_hit);
        assert_eq!(first.options, second.options);
        assert_eq!(first.view, second.view);
    }

    #[test]
    fn test_without_cache_never_hits() {
        let dataset = Arc::clone(create_test_explorer().dataset());
        let config = ExplorerConfig::builder().without_cache().build();
        let explorer = Explorer::with_config(dataset, config);

        explorer.on_event(&UiEvent::initial());
        let response = explorer.on_event(&UiEvent::initial());
        assert!(!response.stats.filter_cache_hit);
        assert!(!response.stats.options_cache_hit);
        assert_eq!(explorer.cleanup_expired(), 0);
    }

    #[test]
    fn test_selection_input_round_trip() {
        let explorer = create_test_explorer();
        let selection = explorer.default_selection();
        let input = SelectionInput::from(&selection);
        let event = UiEvent::new(
            EventSource::Departments,
            input,
            ViewTab::Scatter,
            CategoryColumn::JobTitle,
        );
        assert_eq!(explorer.resolve_selection(&event), selection);
    }
}

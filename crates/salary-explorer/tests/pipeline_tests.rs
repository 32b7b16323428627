//! End-to-end tests for the explorer pipeline.
//!
//! Each test drives `Explorer::on_event` the way the dashboard does and
//! checks the bundled response.

use std::io::Write;
use std::sync::Arc;

use salary_dataset::{Dataset, LoadOptions, Record};
use salary_explorer::views::fit_ols;
use salary_explorer::views::Point;
use salary_explorer::{
    CategoryColumn, EventSource, Explorer, ExplorerConfig, ExplorerError, SelectionInput,
    UiEvent, ViewPayload, ViewTab,
};
use tempfile::NamedTempFile;

fn explorer(records: Vec<Record>) -> Explorer {
    Explorer::new(Arc::new(Dataset::from_records(records)))
}

fn event(trigger: EventSource, selection: SelectionInput, tab: ViewTab) -> UiEvent {
    UiEvent::new(trigger, selection, tab, CategoryColumn::JobTitle)
}

/// Widget state with every value of `explorer` checked.
fn everything(explorer: &Explorer) -> SelectionInput {
    SelectionInput::from(&explorer.default_selection())
}

#[test]
fn test_experience_range_narrows_subset() {
    let explorer = explorer(
        [2, 5, 5, 30]
            .into_iter()
            .map(|years| Record::new("A", "X", "Nej", years, 40_000.0))
            .collect(),
    );

    let mut selection = everything(&explorer);
    selection.experience_max = 10;
    let response = explorer.on_event(&event(
        EventSource::ExperienceRange,
        selection.clone(),
        ViewTab::Histogram,
    ));
    assert_eq!(response.stats.filtered_count, 3);

    selection.experience_max = 50;
    let response = explorer.on_event(&event(
        EventSource::ExperienceRange,
        selection,
        ViewTab::Histogram,
    ));
    assert_eq!(response.stats.filtered_count, 4);
}

#[test]
fn test_empty_department_set_yields_empty_views() {
    let explorer = explorer(vec![
        Record::new("A", "X", "Nej", 2, 30_000.0),
        Record::new("B", "Y", "Specialist", 12, 60_000.0),
    ]);
    let mut selection = everything(&explorer);
    selection.departments.clear();

    for tab in [ViewTab::Histogram, ViewTab::Scatter] {
        let response = explorer.on_event(&event(EventSource::Departments, selection.clone(), tab));
        assert_eq!(response.stats.filtered_count, 0);
        assert!(response.view.is_empty());
        assert!(response.options.departments.iter().all(|o| o.count == 0));
        assert_eq!(response.options.departments.len(), 2);
    }

    let response = explorer.on_event(&event(
        EventSource::Departments,
        selection,
        ViewTab::Statistics,
    ));
    let ViewPayload::Statistics(table) = response.view else {
        panic!("statistics tab must always render a table");
    };
    let count = table.row("Count").unwrap();
    assert_eq!(count.filtered, Some(0.0));
    assert_eq!(count.full, Some(2.0));
    assert!(table.rows.iter().skip(1).all(|row| row.filtered.is_none()));
}

#[test]
fn test_reset_selects_all_known_values() {
    let explorer = explorer(vec![
        Record::new("Läkare", "Akuten", "Specialist", 12, 72_000.0),
        Record::new("Sjuksköterska", "Kirurgen", "Nej", 3, 38_500.0),
        Record::new("Undersköterska", "", "ST-fysiker", 40, 31_000.0),
    ]);

    let prior = SelectionInput {
        job_titles: vec!["Läkare".to_string()],
        departments: Vec::new(),
        specialist_types: vec!["Nej".to_string()],
        experience_min: 5,
        experience_max: 10,
    };
    let response = explorer.on_event(&event(EventSource::Reset, prior, ViewTab::Scatter));

    let selection = &response.selection;
    assert_eq!(selection.job_titles.len(), 3);
    assert_eq!(selection.departments.len(), 3);
    assert_eq!(selection.specialist_types.len(), 3);
    assert_eq!(
        (selection.experience.min(), selection.experience.max()),
        (0, 50)
    );
    assert_eq!(response.stats.filtered_count, 3);
}

#[test]
fn test_department_trend_lines() {
    let records = vec![
        Record::new("A", "X", "Nej", 1, 30_000.0),
        Record::new("A", "X", "Nej", 5, 38_000.0),
        Record::new("B", "X", "Nej", 9, 47_000.0),
        Record::new("A", "Y", "Nej", 2, 50_000.0),
        Record::new("B", "Y", "Nej", 12, 52_000.0),
    ];
    let explorer = explorer(records.clone());

    let response = explorer.on_event(&UiEvent::new(
        EventSource::Grouping,
        everything(&explorer),
        ViewTab::Scatter,
        CategoryColumn::Department,
    ));
    let ViewPayload::Scatter(view) = response.view else {
        panic!("expected scatter payload");
    };

    assert_eq!(view.trends.len(), 2);
    for trend in &view.trends {
        let points: Vec<Point> = records
            .iter()
            .filter(|r| r.department == trend.group)
            .map(|r| Point::new(f64::from(r.experience_years), r.monthly_salary))
            .collect();
        let expected = fit_ols(&points).unwrap();
        assert!((trend.line.slope - expected.slope).abs() < 1e-9);
        assert!((trend.line.intercept - expected.intercept).abs() < 1e-6);
    }

    let overall = view.overall_trend.expect("overall trend over five points");
    let trend_x = view.trend("X").unwrap().line.slope;
    assert!((overall.slope - trend_x).abs() > 1e-9);
}

#[test]
fn test_options_and_view_share_subset() {
    let explorer = explorer(vec![
        Record::new("A", "X", "Nej", 2, 30_000.0),
        Record::new("A", "Y", "Nej", 4, 32_000.0),
        Record::new("B", "Y", "Specialist", 20, 65_000.0),
    ]);
    let mut selection = everything(&explorer);
    selection.job_titles = vec!["A".to_string()];

    let response = explorer.on_event(&event(EventSource::JobTitles, selection, ViewTab::Histogram));

    let ViewPayload::Histogram(view) = &response.view else {
        panic!("expected histogram payload");
    };
    let option_total: usize = response.options.job_titles.iter().map(|o| o.count).sum();
    assert_eq!(view.total, response.stats.filtered_count);
    assert_eq!(option_total, response.stats.filtered_count);
}

#[test]
fn test_memoized_and_uncached_agree() {
    let records = vec![
        Record::new("A", "X", "Nej", 2, 30_000.0),
        Record::new("B", "Y", "Specialist", 20, 65_000.0),
        Record::new("B", "X", "ST-fysiker", 7, 48_000.0),
    ];
    let dataset = Arc::new(Dataset::from_records(records));
    let cached = Explorer::new(Arc::clone(&dataset));
    let uncached =
        Explorer::with_config(dataset, ExplorerConfig::builder().without_cache().build());

    let initial = UiEvent::initial();
    for _ in 0..2 {
        let a = cached.on_event(&initial);
        let b = uncached.on_event(&initial);
        assert_eq!(a.view, b.view);
        assert_eq!(a.options, b.options);
        assert_eq!(a.selection, b.selection);
    }
    assert_eq!(cached.filter_engine().stats().cache_hits, 1);
    assert_eq!(uncached.filter_engine().stats().cache_hits, 0);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Job Title,Department,SpecialistType,ExperienceYears,MonthlySalary"
    )
    .unwrap();
    writeln!(file, "Läkare,Akuten,Specialist,12,72000").unwrap();
    writeln!(file, "Sjuksköterska,Akuten,Nej,3,38500").unwrap();
    file.flush().unwrap();

    let explorer =
        Explorer::load(file.path(), &LoadOptions::default(), ExplorerConfig::default()).unwrap();
    let response = explorer.on_event(&UiEvent::initial());
    assert_eq!(response.stats.filtered_count, 2);
}

#[test]
fn test_load_missing_file_fails() {
    let result = Explorer::load(
        "/nonexistent/salary.csv",
        &LoadOptions::default(),
        ExplorerConfig::default(),
    );
    assert!(matches!(result, Err(ExplorerError::Ingest(_))));
}

//! Salary explorer command-line driver
//!
//! Loads the salary dataset once, then answers dashboard events:
//! - `render`: one event built from flags, one JSON response on stdout
//! - `session`: newline-delimited JSON events on stdin, one response line each

mod logging;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use salary_dataset::{CategoryColumn, LoadOptions};
use salary_explorer::{
    CacheConfig, EventSource, Explorer, ExplorerConfig, SelectionInput, UiEvent, ViewTab,
};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "salary-explorer")]
#[command(about = "Filter and aggregate salary records the way the dashboard does")]
#[command(version)]
struct Cli {
    /// Path to the salary CSV file
    #[arg(short, long, global = true, default_value = "salary_data.csv")]
    data: PathBuf,

    /// Field delimiter of the CSV file
    #[arg(long, global = true, default_value_t = ',')]
    delimiter: char,

    /// Maximum memoized results per pipeline stage
    #[arg(long, global = true, default_value_t = 256)]
    cache_size: usize,

    /// Seconds a memoized result stays valid
    #[arg(long, global = true, default_value_t = 300)]
    cache_ttl: u64,

    /// Recompute every stage on every event
    #[arg(long, global = true)]
    no_cache: bool,

    /// Number of histogram bins
    #[arg(long, global = true, default_value_t = 20)]
    bins: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Handle a single event described by flags
    Render(RenderArgs),
    /// Handle JSON events from stdin until EOF
    Session,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Tab to render
    #[arg(long, value_enum, default_value_t = TabArg::Scatter)]
    tab: TabArg,

    /// Scatter grouping column
    #[arg(long, value_enum, default_value_t = GroupingArg::JobTitle)]
    grouping: GroupingArg,

    /// Job titles to keep (repeatable; default all)
    #[arg(long = "job-title")]
    job_titles: Vec<String>,

    /// Departments to keep (repeatable; default all)
    #[arg(long = "department")]
    departments: Vec<String>,

    /// Specialist types to keep (repeatable; default all)
    #[arg(long = "specialist-type")]
    specialist_types: Vec<String>,

    /// Lower experience bound in years
    #[arg(long)]
    min_years: Option<i64>,

    /// Upper experience bound in years
    #[arg(long)]
    max_years: Option<i64>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TabArg {
    Histogram,
    Scatter,
    Statistics,
}

impl From<TabArg> for ViewTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Histogram => ViewTab::Histogram,
            TabArg::Scatter => ViewTab::Scatter,
            TabArg::Statistics => ViewTab::Statistics,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupingArg {
    JobTitle,
    Department,
    SpecialistType,
}

impl From<GroupingArg> for CategoryColumn {
    fn from(grouping: GroupingArg) -> Self {
        match grouping {
            GroupingArg::JobTitle => CategoryColumn::JobTitle,
            GroupingArg::Department => CategoryColumn::Department,
            GroupingArg::SpecialistType => CategoryColumn::SpecialistType,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let explorer = build_explorer(&cli)?;

    match &cli.command {
        Command::Render(args) => render(&explorer, args),
        Command::Session => session(&explorer),
    }
}

fn build_explorer(cli: &Cli) -> Result<Explorer> {
    let delimiter = u8::try_from(cli.delimiter)
        .context("Delimiter must be a single-byte character")?;
    let load_options = LoadOptions { delimiter };

    let mut config = ExplorerConfig::builder().with_histogram_bins(cli.bins);
    config = if cli.no_cache {
        config.without_cache()
    } else {
        config.with_cache(CacheConfig {
            max_entries: cli.cache_size,
            ttl: Duration::from_secs(cli.cache_ttl),
        })
    };

    Explorer::load(&cli.data, &load_options, config.build())
        .with_context(|| format!("Failed to load {}", cli.data.display()))
}

fn render(explorer: &Explorer, args: &RenderArgs) -> Result<()> {
    let event = render_event(explorer, args);
    let response = explorer.on_event(&event);

    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}

/// Builds the event for `render`.
///
/// Without any filter flag this is the first event of a session. Otherwise
/// columns left unspecified keep every value.
fn render_event(explorer: &Explorer, args: &RenderArgs) -> UiEvent {
    let narrowed = !args.job_titles.is_empty()
        || !args.departments.is_empty()
        || !args.specialist_types.is_empty()
        || args.min_years.is_some()
        || args.max_years.is_some();

    let mut event = UiEvent {
        tab: args.tab.into(),
        grouping: args.grouping.into(),
        ..UiEvent::initial()
    };
    if !narrowed {
        return event;
    }

    let mut selection = SelectionInput::from(&explorer.default_selection());
    if !args.job_titles.is_empty() {
        selection.job_titles = args.job_titles.clone();
    }
    if !args.departments.is_empty() {
        selection.departments = args.departments.clone();
    }
    if !args.specialist_types.is_empty() {
        selection.specialist_types = args.specialist_types.clone();
    }
    if let Some(min) = args.min_years {
        selection.experience_min = min;
    }
    if let Some(max) = args.max_years {
        selection.experience_max = max;
    }

    event.trigger = Some(EventSource::JobTitles);
    event.selection = selection;
    event
}

fn session(explorer: &Explorer) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut handled = 0usize;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let output = match serde_json::from_str::<UiEvent>(&line) {
            Ok(event) => {
                handled += 1;
                serde_json::to_string(&explorer.on_event(&event))?
            }
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "malformed event skipped");
                serde_json::json!({ "error": e.to_string(), "line": index + 1 }).to_string()
            }
        };

        writeln!(out, "{output}")?;
        out.flush()?;
    }

    tracing::info!(
        events = handled,
        filter = %explorer.filter_engine().stats(),
        options = %explorer.option_deriver().stats(),
        "session finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use salary_dataset::{Dataset, Record};
    use std::sync::Arc;

    fn create_test_explorer() -> Explorer {
        Explorer::new(Arc::new(Dataset::from_records(vec![
            Record::new("A", "X", "Nej", 2, 30_000.0),
            Record::new("B", "Y", "Specialist", 12, 60_000.0),
        ])))
    }

    fn render_args(argv: &[&str]) -> RenderArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Render(args) => args,
            Command::Session => panic!("expected render"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_without_filters_is_initial() {
        let explorer = create_test_explorer();
        let args = render_args(&["salary-explorer", "render", "--tab", "histogram"]);
        let event = render_event(&explorer, &args);
        assert!(event.is_reset());
        assert_eq!(event.tab, ViewTab::Histogram);
    }

    #[test]
    fn test_render_with_filters_keeps_other_columns() {
        let explorer = create_test_explorer();
        let args = render_args(&[
            "salary-explorer",
            "render",
            "--department",
            "X",
            "--max-years",
            "10",
        ]);
        let event = render_event(&explorer, &args);
        assert!(!event.is_reset());
        assert_eq!(event.selection.departments, vec!["X".to_string()]);
        assert_eq!(event.selection.job_titles.len(), 2);

        let response = explorer.on_event(&event);
        assert_eq!(response.stats.filtered_count, 1);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "salary-explorer",
            "session",
            "--data",
            "data.csv",
            "--no-cache",
            "--bins",
            "10",
        ])
        .unwrap();
        assert!(cli.no_cache);
        assert_eq!(cli.bins, 10);
        assert_eq!(cli.data, PathBuf::from("data.csv"));
    }
}

//! Descriptive statistics and the full-vs-filtered comparison table.

use salary_dataset::Record;

/// Linear-interpolated percentile of ascending `sorted` values.
///
/// Uses rank `(n - 1) * p`, interpolating between the neighbouring values.
/// `p` is clamped to `[0, 1]`. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = last as f64 * p.clamp(0.0, 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Arithmetic mean, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxSummary {
    /// Smallest value.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest value.
    pub max: f64,
}

impl BoxSummary {
    /// Summarizes `values` in any order; `None` when empty.
    pub fn compute(values: Vec<f64>) -> Option<Self> {
        let values = sorted(values);
        Some(Self {
            min: *values.first()?,
            q1: percentile(&values, 0.25)?,
            median: percentile(&values, 0.5)?,
            q3: percentile(&values, 0.75)?,
            max: *values.last()?,
        })
    }
}

/// Salary and experience figures over a set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryStats {
    /// Number of records.
    pub count: usize,
    /// 25th percentile salary.
    pub salary_p25: f64,
    /// Median salary.
    pub salary_median: f64,
    /// 75th percentile salary.
    pub salary_p75: f64,
    /// Mean salary.
    pub salary_mean: f64,
    /// Mean experience years.
    pub experience_mean: f64,
}

impl SummaryStats {
    /// Computes the figures; `None` when there are no records.
    pub fn compute<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let (salaries, experience): (Vec<f64>, Vec<f64>) = records
            .into_iter()
            .map(|r| (r.monthly_salary, f64::from(r.experience_years)))
            .unzip();

        let salary_mean = mean(&salaries)?;
        let experience_mean = mean(&experience)?;
        let salaries = sorted(salaries);

        Some(Self {
            count: salaries.len(),
            salary_p25: percentile(&salaries, 0.25)?,
            salary_median: percentile(&salaries, 0.5)?,
            salary_p75: percentile(&salaries, 0.75)?,
            salary_mean,
            experience_mean,
        })
    }
}

/// One metric compared between the full dataset and the filtered subset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticsRow {
    /// Metric name.
    pub metric: String,
    /// Value over the full dataset.
    pub full: Option<f64>,
    /// Value over the filtered subset; `None` when undefined.
    pub filtered: Option<f64>,
}

/// Two-column comparison table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatisticsTable {
    /// Column header of the full-dataset figures.
    pub full_label: String,
    /// Column header of the filtered figures.
    pub filtered_label: String,
    /// Metric rows, count first.
    pub rows: Vec<StatisticsRow>,
}

impl StatisticsTable {
    /// Builds the table.
    ///
    /// An empty side still reports a count of zero; every other cell on that
    /// side is `None`.
    pub fn compare(full: Option<&SummaryStats>, filtered: Option<&SummaryStats>) -> Self {
        type Metric = (&'static str, fn(&SummaryStats) -> f64);
        const METRICS: [Metric; 5] = [
            ("25th Percentile Salary", |s: &SummaryStats| s.salary_p25),
            ("Median Salary", |s: &SummaryStats| s.salary_median),
            ("75th Percentile Salary", |s: &SummaryStats| s.salary_p75),
            ("Mean Salary", |s: &SummaryStats| s.salary_mean),
            ("Mean Experience (years)", |s: &SummaryStats| s.experience_mean),
        ];

        let count = |s: Option<&SummaryStats>| Some(s.map_or(0.0, |s| s.count as f64));
        let mut rows = vec![StatisticsRow {
            metric: "Count".to_string(),
            full: count(full),
            filtered: count(filtered),
        }];
        rows.extend(METRICS.iter().map(|(metric, value)| StatisticsRow {
            metric: (*metric).to_string(),
            full: full.map(value),
            filtered: filtered.map(value),
        }));

        Self {
            full_label: "Full Dataset".to_string(),
            filtered_label: "Filtered".to_string(),
            rows,
        }
    }

    /// Looks up a row by metric name.
    pub fn row(&self, metric: &str) -> Option<&StatisticsRow> {
        self.rows.iter().find(|row| row.metric == metric)
    }
}

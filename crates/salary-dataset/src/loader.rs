//! Delimited-file ingestion for the salary dataset.
//!
//! The loader maps the source headers (Swedish originals or their English
//! renames) onto [`Record`] fields and normalizes missing categorical values
//! to sentinels. Normalization happens here, once, never at query time.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::dataset::Dataset;
use crate::error::{IngestError, IngestResult};
use crate::record::Record;

/// A required source column and the header names accepted for it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Canonical (English) column name.
    pub canonical: &'static str,
    /// Accepted header names, compared case-insensitively.
    pub aliases: &'static [&'static str],
}

/// Job title column.
pub const JOB_TITLE: ColumnSpec = ColumnSpec {
    canonical: "Job Title",
    aliases: &["Job Title", "JobTitle", "Befattning"],
};

/// Department column.
pub const DEPARTMENT: ColumnSpec = ColumnSpec {
    canonical: "Department",
    aliases: &["Department", "Arbetsplats"],
};

/// Specialist type column.
pub const SPECIALIST_TYPE: ColumnSpec = ColumnSpec {
    canonical: "SpecialistType",
    aliases: &[
        "SpecialistType",
        "Specialist Type",
        "Specialist eller ST-fysiker",
    ],
};

/// Experience column.
pub const EXPERIENCE_YEARS: ColumnSpec = ColumnSpec {
    canonical: "ExperienceYears",
    aliases: &[
        "ExperienceYears",
        "Antal hela år med arbete i klinisk verksamhet",
    ],
};

/// Salary column.
pub const MONTHLY_SALARY: ColumnSpec = ColumnSpec {
    canonical: "MonthlySalary",
    aliases: &["MonthlySalary", "Månadslön totalt"],
};

/// Every column the loader requires.
pub const REQUIRED_COLUMNS: [ColumnSpec; 5] = [
    JOB_TITLE,
    DEPARTMENT,
    SPECIALIST_TYPE,
    EXPERIENCE_YEARS,
    MONTHLY_SALARY,
];

/// Options controlling ingestion.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Summary of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read from the source.
    pub rows_read: usize,
    /// Rows dropped because a numeric field was missing or invalid.
    pub rows_skipped: usize,
}

impl LoadReport {
    /// Rows that made it into the dataset.
    pub fn rows_loaded(&self) -> usize {
        self.rows_read - self.rows_skipped
    }
}

impl Dataset {
    /// Loads the dataset from a comma-delimited file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or unreadable, a required column is
    /// absent, or no row survives normalization.
    pub fn load(path: impl AsRef<Path>) -> IngestResult<Dataset> {
        load_with_options(path, &LoadOptions::default()).map(|(dataset, _)| dataset)
    }
}

/// Loads the dataset from a file with explicit options, returning a load report.
///
/// # Errors
///
/// See [`Dataset::load`].
pub fn load_with_options(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> IngestResult<(Dataset, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let (dataset, report) = load_from_reader(file, options)?;

    if dataset.is_empty() {
        return Err(IngestError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = report.rows_loaded(),
        skipped = report.rows_skipped,
        fingerprint = %dataset.fingerprint().short(),
        "salary dataset loaded"
    );

    Ok((dataset, report))
}

/// Loads the dataset from any reader.
///
/// Unlike [`load_with_options`], an empty result is not an error here.
///
/// # Errors
///
/// Fails on malformed delimited data or a missing required column.
pub fn load_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> IngestResult<(Dataset, LoadReport)> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let layout = HeaderLayout::resolve(&headers)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (row, result) in csv_reader.records().enumerate() {
        let raw = result?;
        report.rows_read += 1;

        match layout.parse(&raw) {
            Ok(record) => records.push(record),
            Err(column) => {
                report.rows_skipped += 1;
                tracing::warn!(
                    row = row + 1,
                    column,
                    "skipping row with missing or invalid numeric value"
                );
            }
        }
    }

    Ok((Dataset::from_records(records), report))
}

/// Field positions of the required columns within a header row.
struct HeaderLayout {
    job_title: usize,
    department: usize,
    specialist_type: usize,
    experience_years: usize,
    monthly_salary: usize,
}

impl HeaderLayout {
    fn resolve(headers: &StringRecord) -> IngestResult<Self> {
        let find = |spec: ColumnSpec| -> IngestResult<usize> {
            headers
                .iter()
                .position(|header| header_matches(header, spec))
                .ok_or(IngestError::MissingColumn {
                    column: spec.canonical,
                })
        };

        Ok(Self {
            job_title: find(JOB_TITLE)?,
            department: find(DEPARTMENT)?,
            specialist_type: find(SPECIALIST_TYPE)?,
            experience_years: find(EXPERIENCE_YEARS)?,
            monthly_salary: find(MONTHLY_SALARY)?,
        })
    }

    /// Parses one row; on failure returns the canonical name of the bad column.
    fn parse(&self, raw: &StringRecord) -> Result<Record, &'static str> {
        let field = |idx: usize| raw.get(idx).unwrap_or("");

        let experience = parse_non_negative(field(self.experience_years))
            .ok_or(EXPERIENCE_YEARS.canonical)?;
        let salary =
            parse_non_negative(field(self.monthly_salary)).ok_or(MONTHLY_SALARY.canonical)?;

        Ok(Record::new(
            field(self.job_title),
            field(self.department),
            field(self.specialist_type),
            experience.floor() as u32,
            salary,
        ))
    }
}

fn header_matches(header: &str, spec: ColumnSpec) -> bool {
    let header = header.trim_start_matches('\u{feff}').trim().to_lowercase();
    spec.aliases
        .iter()
        .any(|alias| alias.to_lowercase() == header)
}

/// Parses a non-negative, finite number.
///
/// Whitespace used as a thousands separator is ignored. Commas are read as
/// thousands separators when they split the integer part into groups of
/// three (`45,000`, `1,250,000.5`), otherwise a single comma followed by one
/// or two digits is the decimal separator (`2,5`, `41000,50`). Any other
/// comma placement is rejected rather than guessed.
fn parse_non_negative(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = if !cleaned.contains(',') {
        cleaned
    } else {
        let (integer, fraction) = match cleaned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (cleaned.as_str(), None),
        };
        if is_thousands_grouped(integer) {
            let digits = integer.replace(',', "");
            match fraction {
                Some(fraction) => format!("{digits}.{fraction}"),
                None => digits,
            }
        } else {
            match (fraction, integer.split_once(',')) {
                (None, Some((whole, decimals)))
                    if !whole.is_empty()
                        && (1..=2).contains(&decimals.len())
                        && decimals.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    format!("{whole}.{decimals}")
                }
                _ => return None,
            }
        }
    };

    let value: f64 = normalized.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// True for digit groups like `45,000` or `1,250,000`.
fn is_thousands_grouped(integer: &str) -> bool {
    let mut groups = integer.split(',');
    let Some(lead) = groups.next() else {
        return false;
    };
    let lead_ok = (1..=3).contains(&lead.len())
        && !lead.starts_with('0')
        && lead.bytes().all(|b| b.is_ascii_digit());
    let mut rest = groups.peekable();
    lead_ok
        && rest.peek().is_some()
        && rest.all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CategoryColumn, NOT_SPECIFIED};

    fn load_str(data: &str) -> IngestResult<(Dataset, LoadReport)> {
        load_from_reader(data.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_load_english_headers() {
        let data = "Job Title,Department,SpecialistType,ExperienceYears,MonthlySalary\n\
                    Läkare,Akuten,Specialist,12,72000\n\
                    Sjuksköterska,Akuten,Nej,3,38500\n";
        let (dataset, report) = load_str(data).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(report.rows_loaded(), 2);
        assert_eq!(dataset.records()[0].experience_years, 12);
    }

    #[test]
    fn test_load_swedish_headers() {
        let data = "Befattning,Arbetsplats,Specialist eller ST-fysiker,\
                    Antal hela år med arbete i klinisk verksamhet,Månadslön totalt\n\
                    Läkare,Kirurgen,ST-fysiker,4,51000\n";
        let (dataset, _) = load_str(data).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].specialist_type, "ST-fysiker");
    }

    #[test]
    fn test_load_normalizes_missing_categories() {
        let data = "Job Title,Department,SpecialistType,ExperienceYears,MonthlySalary\n\
                    ,,,7,41000\n";
        let (dataset, _) = load_str(data).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.job_title, NOT_SPECIFIED);
        assert_eq!(record.department, NOT_SPECIFIED);
        assert_eq!(record.specialist_type, "Nej");
        assert_eq!(
            dataset.distinct_values(CategoryColumn::JobTitle),
            &[NOT_SPECIFIED]
        );
    }

    #[test]
    fn test_load_skips_invalid_numeric_rows() {
        let data = "Job Title,Department,SpecialistType,ExperienceYears,MonthlySalary\n\
                    A,D,Nej,,41000\n\
                    A,D,Nej,5,-3\n\
                    A,D,Nej,five,30000\n\
                    A,D,Nej,5,30000\n";
        let (dataset, report) = load_str(data).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_skipped, 3);
    }

    #[test]
    fn test_load_missing_column() {
        let data = "Job Title,Department,ExperienceYears,MonthlySalary\nA,D,1,2\n";
        let err = load_str(data).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                column: "SpecialistType"
            }
        ));
    }

    #[test]
    fn test_load_header_with_bom_and_case() {
        let data = "\u{feff}job title,DEPARTMENT,specialisttype,experienceyears,monthlysalary\n\
                    A,D,Nej,1,2\n";
        let (dataset, _) = load_str(data).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_custom_delimiter() {
        let data = "Job Title;Department;SpecialistType;ExperienceYears;MonthlySalary\n\
                    A;D;Nej;2,5;41000,50\n";
        let (dataset, _) =
            load_from_reader(data.as_bytes(), &LoadOptions { delimiter: b';' }).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.experience_years, 2);
        assert!((record.monthly_salary - 41_000.5).abs() < 1e-9);
    }

    #[test]
    fn test_load_thousands_separated_salary() {
        let data = "Job Title,Department,SpecialistType,ExperienceYears,MonthlySalary\n\
                    A,D,Nej,3,\"45,000\"\n\
                    A,D,Nej,4,\"45,0000\"\n";
        let (dataset, report) = load_str(data).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].monthly_salary, 45_000.0);
        assert_eq!(report.rows_skipped, 1);
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(parse_non_negative("45 000"), Some(45_000.0));
        assert_eq!(parse_non_negative("12.5"), Some(12.5));
        assert_eq!(parse_non_negative("1,5"), Some(1.5));
        assert_eq!(parse_non_negative("41000,50"), Some(41_000.5));
        assert_eq!(parse_non_negative("1,250,000.5"), Some(1_250_000.5));
        assert_eq!(parse_non_negative("0,125"), None);
        assert_eq!(parse_non_negative("4,5000"), None);
        assert_eq!(parse_non_negative(""), None);
        assert_eq!(parse_non_negative("-1"), None);
        assert_eq!(parse_non_negative("NaN"), None);
        assert_eq!(parse_non_negative("inf"), None);
    }
}

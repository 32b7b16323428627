//! Salary record and column types.

use std::fmt;

/// Sentinel for a missing job title or department.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Known specialist type values.
pub mod specialist {
    /// Registered specialist.
    pub const SPECIALIST: &str = "Specialist";

    /// Physician in specialist training.
    pub const ST_FYSIKER: &str = "ST-fysiker";

    /// Neither; also the sentinel for a missing value.
    pub const NONE: &str = "Nej";
}

/// One employee salary entry.
///
/// All five fields are populated once ingestion has normalized the raw row;
/// missing categorical values are replaced by their sentinel at load time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// Job title, or [`NOT_SPECIFIED`].
    pub job_title: String,
    /// Department (workplace), or [`NOT_SPECIFIED`].
    pub department: String,
    /// One of the [`specialist`] values.
    pub specialist_type: String,
    /// Whole years of clinical experience.
    pub experience_years: u32,
    /// Total monthly salary.
    pub monthly_salary: f64,
}

impl Record {
    /// Creates a record, normalizing empty categorical values to their sentinels.
    pub fn new(
        job_title: impl Into<String>,
        department: impl Into<String>,
        specialist_type: impl Into<String>,
        experience_years: u32,
        monthly_salary: f64,
    ) -> Self {
        Self {
            job_title: normalize_category(job_title.into(), NOT_SPECIFIED),
            department: normalize_category(department.into(), NOT_SPECIFIED),
            specialist_type: normalize_category(specialist_type.into(), specialist::NONE),
            experience_years,
            monthly_salary,
        }
    }

    /// Returns the value of a categorical column.
    pub fn category(&self, column: CategoryColumn) -> &str {
        match column {
            CategoryColumn::JobTitle => &self.job_title,
            CategoryColumn::Department => &self.department,
            CategoryColumn::SpecialistType => &self.specialist_type,
        }
    }
}

fn normalize_category(value: String, sentinel: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// A filterable categorical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CategoryColumn {
    /// Job title column.
    #[default]
    JobTitle,
    /// Department column.
    Department,
    /// Specialist type column.
    SpecialistType,
}

impl CategoryColumn {
    /// All categorical columns in display order.
    pub const ALL: [CategoryColumn; 3] = [
        CategoryColumn::JobTitle,
        CategoryColumn::Department,
        CategoryColumn::SpecialistType,
    ];

    /// Human-readable column label.
    pub fn label(self) -> &'static str {
        match self {
            CategoryColumn::JobTitle => "Job Title",
            CategoryColumn::Department => "Department",
            CategoryColumn::SpecialistType => "Specialist Type",
        }
    }

    /// Sentinel substituted for missing values in this column.
    pub fn sentinel(self) -> &'static str {
        match self {
            CategoryColumn::JobTitle | CategoryColumn::Department => NOT_SPECIFIED,
            CategoryColumn::SpecialistType => specialist::NONE,
        }
    }

    /// Position of the column in [`CategoryColumn::ALL`].
    pub(crate) fn slot(self) -> usize {
        match self {
            CategoryColumn::JobTitle => 0,
            CategoryColumn::Department => 1,
            CategoryColumn::SpecialistType => 2,
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new_normalizes_empty_categories() {
        let record = Record::new("", "  ", "", 3, 42_000.0);
        assert_eq!(record.job_title, NOT_SPECIFIED);
        assert_eq!(record.department, NOT_SPECIFIED);
        assert_eq!(record.specialist_type, specialist::NONE);
    }

    #[test]
    fn test_record_new_trims_values() {
        let record = Record::new(" Läkare ", "Akuten", "Specialist", 10, 60_000.0);
        assert_eq!(record.job_title, "Läkare");
        assert_eq!(record.department, "Akuten");
    }

    #[test]
    fn test_record_category() {
        let record = Record::new("Läkare", "Akuten", "ST-fysiker", 4, 50_000.0);
        assert_eq!(record.category(CategoryColumn::JobTitle), "Läkare");
        assert_eq!(record.category(CategoryColumn::Department), "Akuten");
        assert_eq!(record.category(CategoryColumn::SpecialistType), "ST-fysiker");
    }

    #[test]
    fn test_column_sentinels() {
        assert_eq!(CategoryColumn::JobTitle.sentinel(), NOT_SPECIFIED);
        assert_eq!(CategoryColumn::SpecialistType.sentinel(), "Nej");
    }

    #[test]
    fn test_column_slots_match_all() {
        for (i, column) in CategoryColumn::ALL.iter().enumerate() {
            assert_eq!(column.slot(), i);
        }
    }
}

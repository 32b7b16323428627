//! Filter selections: the canonical memoization key of the filter stage.

use std::collections::BTreeSet;

use salary_dataset::{CategoryColumn, Dataset, Record, EXPERIENCE_MAX, EXPERIENCE_MIN};

use crate::error::SelectionError;

/// Spacing of the experience slider marks.
pub const EXPERIENCE_MARK_STEP: u32 = 5;

/// Slider marks over the experience domain: `0, 5, ..., 50`.
pub fn experience_marks() -> Vec<u32> {
    (EXPERIENCE_MIN..=EXPERIENCE_MAX)
        .step_by(EXPERIENCE_MARK_STEP as usize)
        .collect()
}

/// Inclusive experience range within `[EXPERIENCE_MIN, EXPERIENCE_MAX]`.
///
/// The type guarantees `min <= max` and both bounds in domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawExperienceRange"))]
pub struct ExperienceRange {
    min: u32,
    max: u32,
}

impl ExperienceRange {
    /// The whole experience domain.
    pub const FULL: ExperienceRange = ExperienceRange {
        min: EXPERIENCE_MIN,
        max: EXPERIENCE_MAX,
    };

    /// Creates a range, rejecting inverted or out-of-domain bounds.
    ///
    /// # Errors
    ///
    /// [`SelectionError::Inverted`] if `min > max`,
    /// [`SelectionError::OutOfBounds`] if either bound leaves the domain.
    pub fn new(min: i64, max: i64) -> Result<Self, SelectionError> {
        if min > max {
            return Err(SelectionError::Inverted { min, max });
        }
        let domain = i64::from(EXPERIENCE_MIN)..=i64::from(EXPERIENCE_MAX);
        if !domain.contains(&min) || !domain.contains(&max) {
            return Err(SelectionError::OutOfBounds {
                min,
                max,
                domain_min: EXPERIENCE_MIN,
                domain_max: EXPERIENCE_MAX,
            });
        }
        Ok(Self {
            min: min as u32,
            max: max as u32,
        })
    }

    /// Creates a range, recovering from invalid bounds.
    ///
    /// Inverted bounds are swapped, then both are clamped into the domain.
    pub fn clamped(min: i64, max: i64) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let clamp = |v: i64| v.clamp(i64::from(EXPERIENCE_MIN), i64::from(EXPERIENCE_MAX)) as u32;
        Self {
            min: clamp(lo),
            max: clamp(hi),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Returns true if `years` lies within the range.
    pub fn contains(&self, years: u32) -> bool {
        (self.min..=self.max).contains(&years)
    }
}

/// Unvalidated wire form of an [`ExperienceRange`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawExperienceRange {
    min: i64,
    max: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawExperienceRange> for ExperienceRange {
    type Error = SelectionError;

    fn try_from(raw: RawExperienceRange) -> Result<Self, Self::Error> {
        ExperienceRange::new(raw.min, raw.max)
    }
}

impl Default for ExperienceRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// The currently chosen filter values.
///
/// Value sets are ordered and deduplicated, so two selections holding the
/// same values compare and hash equal regardless of the order the values
/// were picked in. That makes a selection directly usable as a cache key.
///
/// An empty value set matches **nothing**: it is a constraint that excludes
/// every record, never "no constraint on this column".
///
/// # Example
///
/// ```
/// use salary_explorer::{ExperienceRange, FilterSelection};
///
/// let a = FilterSelection::new(["B", "A"], ["D"], ["Nej"], ExperienceRange::FULL);
/// let b = FilterSelection::new(["A", "B", "A"], ["D"], ["Nej"], ExperienceRange::FULL);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSelection {
    /// Selected job titles.
    pub job_titles: BTreeSet<String>,
    /// Selected departments.
    pub departments: BTreeSet<String>,
    /// Selected specialist types.
    pub specialist_types: BTreeSet<String>,
    /// Selected experience range.
    pub experience: ExperienceRange,
}

impl FilterSelection {
    /// Creates a selection from value lists in any order.
    pub fn new<J, D, S>(
        job_titles: J,
        departments: D,
        specialist_types: S,
        experience: ExperienceRange,
    ) -> Self
    where
        J: IntoIterator,
        J::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            job_titles: job_titles.into_iter().map(Into::into).collect(),
            departments: departments.into_iter().map(Into::into).collect(),
            specialist_types: specialist_types.into_iter().map(Into::into).collect(),
            experience,
        }
    }

    /// Every known value of every column and the full experience range.
    pub fn all(dataset: &Dataset) -> Self {
        Self::new(
            dataset.distinct_values(CategoryColumn::JobTitle).iter().cloned(),
            dataset.distinct_values(CategoryColumn::Department).iter().cloned(),
            dataset
                .distinct_values(CategoryColumn::SpecialistType)
                .iter()
                .cloned(),
            ExperienceRange::FULL,
        )
    }

    /// Selected values of a column.
    pub fn values(&self, column: CategoryColumn) -> &BTreeSet<String> {
        match column {
            CategoryColumn::JobTitle => &self.job_titles,
            CategoryColumn::Department => &self.departments,
            CategoryColumn::SpecialistType => &self.specialist_types,
        }
    }

    /// Replaces the selected values of a column.
    pub fn with_values<I>(mut self, column: CategoryColumn, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        match column {
            CategoryColumn::JobTitle => self.job_titles = values,
            CategoryColumn::Department => self.departments = values,
            CategoryColumn::SpecialistType => self.specialist_types = values,
        }
        self
    }

    /// Replaces the experience range.
    pub fn with_experience(mut self, experience: ExperienceRange) -> Self {
        self.experience = experience;
        self
    }

    /// Returns true if the record satisfies all four predicates.
    pub fn matches(&self, record: &Record) -> bool {
        self.job_titles.contains(&record.job_title)
            && self.departments.contains(&record.department)
            && self.specialist_types.contains(&record.specialist_type)
            && self.experience.contains(record.experience_years)
    }
}

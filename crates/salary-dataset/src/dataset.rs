//! The immutable, process-wide salary dataset.

use std::collections::BTreeMap;

use roaring::RoaringBitmap;

use crate::fingerprint::Fingerprint;
use crate::record::{CategoryColumn, Record};
use crate::registry::CategoryRegistry;

/// Lowest experience value a selection may reference.
pub const EXPERIENCE_MIN: u32 = 0;

/// Highest experience value a selection may reference.
pub const EXPERIENCE_MAX: u32 = 50;

/// Per-column index: the sorted distinct values and, for each value, the
/// bitmap of record positions holding it.
#[derive(Debug, Clone)]
struct ColumnIndex {
    registry: CategoryRegistry,
    postings: Vec<RoaringBitmap>,
}

impl ColumnIndex {
    fn build(records: &[Record], column: CategoryColumn) -> Self {
        let registry = CategoryRegistry::from_values(records.iter().map(|r| r.category(column)));
        let mut postings = vec![RoaringBitmap::new(); registry.len()];

        for (position, record) in records.iter().enumerate() {
            if let Some(code) = registry.code(record.category(column)) {
                postings[code as usize].insert(position as u32);
            }
        }

        Self { registry, postings }
    }
}

/// An ordered, immutable sequence of [`Record`]s plus derived constant metadata.
///
/// Record positions (`u32`) are the stable identity of a row: filtered subsets
/// are bitmaps of positions into this dataset. Distinct values, per-value
/// postings and the content fingerprint are computed once at construction.
///
/// # Example
///
/// ```
/// use salary_dataset::{CategoryColumn, Dataset, Record};
///
/// let dataset = Dataset::from_records(vec![
///     Record::new("Läkare", "Akuten", "Specialist", 12, 72_000.0),
///     Record::new("Sjuksköterska", "Akuten", "", 3, 38_500.0),
/// ]);
///
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(
///     dataset.distinct_values(CategoryColumn::JobTitle),
///     &["Läkare", "Sjuksköterska"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    columns: [ColumnIndex; 3],
    experience: BTreeMap<u32, RoaringBitmap>,
    all: RoaringBitmap,
    fingerprint: Fingerprint,
}

impl Dataset {
    /// Builds a dataset and its indexes from normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = CategoryColumn::ALL.map(|column| ColumnIndex::build(&records, column));

        let mut experience: BTreeMap<u32, RoaringBitmap> = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            experience
                .entry(record.experience_years)
                .or_default()
                .insert(position as u32);
        }

        let all: RoaringBitmap = (0..records.len() as u32).collect();
        let fingerprint = fingerprint_records(&records);

        Self {
            records,
            columns,
            experience,
            all,
            fingerprint,
        }
    }

    /// Returns the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Gets a record by position.
    #[inline]
    pub fn record(&self, position: u32) -> Option<&Record> {
        self.records.get(position as usize)
    }

    /// Sorted distinct values of a categorical column.
    pub fn distinct_values(&self, column: CategoryColumn) -> &[String] {
        self.columns[column.slot()].registry.values()
    }

    /// The value registry of a categorical column.
    pub fn registry(&self, column: CategoryColumn) -> &CategoryRegistry {
        &self.columns[column.slot()].registry
    }

    /// Positions of the records holding `value` in `column`.
    ///
    /// Returns `None` for values that never occur in the dataset.
    pub fn postings(&self, column: CategoryColumn, value: &str) -> Option<&RoaringBitmap> {
        let index = &self.columns[column.slot()];
        index
            .registry
            .code(value)
            .and_then(|code| index.postings.get(code as usize))
    }

    /// Positions of the records whose experience lies in `[min, max]`.
    pub fn experience_postings(&self, min: u32, max: u32) -> RoaringBitmap {
        if min > max {
            return RoaringBitmap::new();
        }
        self.experience
            .range(min..=max)
            .fold(RoaringBitmap::new(), |mut acc, (_, bitmap)| {
                acc |= bitmap;
                acc
            })
    }

    /// Positions of every record.
    pub fn all_positions(&self) -> &RoaringBitmap {
        &self.all
    }

    /// Content fingerprint, stable for identical record sequences.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

fn fingerprint_records(records: &[Record]) -> Fingerprint {
    records
        .iter()
        .fold(Fingerprint::builder(), |builder, record| {
            builder
                .field(record.job_title.as_bytes())
                .field(record.department.as_bytes())
                .field(record.specialist_type.as_bytes())
                .field(&record.experience_years.to_le_bytes())
                .field(&record.monthly_salary.to_bits().to_le_bytes())
        })
        .finish()
}

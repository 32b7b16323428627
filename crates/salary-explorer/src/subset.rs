//! Filtered record subsets.

use salary_dataset::{Dataset, Fingerprint, Record, RoaringBitmap};

/// The records of a [`Dataset`] that satisfy a selection.
///
/// Membership is structural: the subset is a bitmap of record positions in
/// the dataset it was computed from, never a comparison of row contents.
/// The fingerprint identifies the subset's content for downstream memoization.
///
/// # Example
///
/// ```
/// use salary_explorer::FilteredSubset;
///
/// let subset = FilteredSubset::from_positions([0, 2, 5]);
/// assert_eq!(subset.len(), 3);
/// assert!(subset.contains(2));
/// assert!(!subset.contains(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSubset {
    positions: RoaringBitmap,
    fingerprint: Fingerprint,
}

impl FilteredSubset {
    /// Creates a subset from a position bitmap.
    pub fn new(positions: RoaringBitmap) -> Self {
        let bytes: Vec<u8> = positions.iter().flat_map(u32::to_le_bytes).collect();
        let fingerprint = Fingerprint::of_bytes(&bytes);
        Self {
            positions,
            fingerprint,
        }
    }

    /// Creates a subset from record positions in any order.
    pub fn from_positions<I: IntoIterator<Item = u32>>(positions: I) -> Self {
        Self::new(positions.into_iter().collect())
    }

    /// Creates an empty subset.
    pub fn empty() -> Self {
        Self::new(RoaringBitmap::new())
    }

    /// Returns the number of records in the subset.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() as usize
    }

    /// Returns true if no record matched.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks whether a record position is in the subset.
    #[inline]
    pub fn contains(&self, position: u32) -> bool {
        self.positions.contains(position)
    }

    /// The position bitmap.
    pub fn positions(&self) -> &RoaringBitmap {
        &self.positions
    }

    /// Content fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Iterates the subset's records in dataset order.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.positions
            .iter()
            .filter_map(move |position| dataset.record(position))
    }

    /// Positions as a sorted Vec.
    pub fn to_vec(&self) -> Vec<u32> {
        self.positions.iter().collect()
    }
}

impl Default for FilteredSubset {
    fn default() -> Self {
        Self::empty()
    }
}

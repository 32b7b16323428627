//! Category registry mapping column values to compact codes.

use std::collections::{BTreeSet, HashMap};

/// Registry that maps between category values and compact `u32` codes.
///
/// Codes are assigned in lexicographic order of the values, so iterating
/// codes `0..len()` yields the column's sorted distinct values. The registry
/// is immutable after construction.
///
/// # Example
///
/// ```
/// use salary_dataset::CategoryRegistry;
///
/// let registry = CategoryRegistry::from_values(["Läkare", "Barnmorska", "Läkare"]);
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.code("Barnmorska"), Some(0));
/// assert_eq!(registry.value(1), Some("Läkare"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    /// value -> code mapping.
    value_to_code: HashMap<String, u32>,
    /// code -> value mapping, sorted.
    code_to_value: Vec<String>,
}

impl CategoryRegistry {
    /// Creates a registry from an iterator of values.
    ///
    /// Duplicates collapse to a single code.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        let code_to_value: Vec<String> = sorted.into_iter().collect();
        let value_to_code = code_to_value
            .iter()
            .enumerate()
            .map(|(code, value)| (value.clone(), code as u32))
            .collect();

        Self {
            value_to_code,
            code_to_value,
        }
    }

    /// Gets the code for a value.
    #[inline]
    pub fn code(&self, value: &str) -> Option<u32> {
        self.value_to_code.get(value).copied()
    }

    /// Gets the value for a code.
    #[inline]
    pub fn value(&self, code: u32) -> Option<&str> {
        self.code_to_value.get(code as usize).map(String::as_str)
    }

    /// Sorted distinct values.
    pub fn values(&self) -> &[String] {
        &self.code_to_value
    }

    /// Returns the number of distinct values.
    #[inline]
    pub fn len(&self) -> usize {
        self.code_to_value.len()
    }

    /// Returns true if the registry holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code_to_value.is_empty()
    }

    /// Returns true if the value is registered.
    #[inline]
    pub fn contains(&self, value: &str) -> bool {
        self.value_to_code.contains_key(value)
    }
}

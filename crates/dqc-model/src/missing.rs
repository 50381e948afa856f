//! Missing-value vocabulary.
//!
//! An ordered set of string literals that represent "no value". Values in
//! the vocabulary are excluded from both validity and violation counts, and
//! the first entry doubles as the null literal that failed corrections fall
//! back to.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Literals treated as missing when no dataset-specific vocabulary exists.
pub const DEFAULT_MISSING_VALUES: &[&str] =
    &["", "-", "N/A", "NA", "NULL", "NaN", "nan", "null"];

/// Ordered vocabulary of missing-value literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingValues(Vec<String>);

impl Default for MissingValues {
    fn default() -> Self {
        Self(DEFAULT_MISSING_VALUES.iter().map(|s| (*s).to_string()).collect())
    }
}

impl MissingValues {
    /// Vocabulary containing only the empty string.
    ///
    /// Used when a dataset pads with empty cells only and the pandas-style
    /// NA literals must be treated as real values.
    pub fn empty_string_only() -> Self {
        Self(vec![String::new()])
    }

    /// Merge observed missing literals with the defaults into a sorted,
    /// deduplicated vocabulary. The empty string sorts first, so the null
    /// literal is stable across merges.
    pub fn merged_with(observed: &BTreeSet<String>) -> Self {
        let mut set: BTreeSet<String> = observed.clone();
        for literal in DEFAULT_MISSING_VALUES {
            set.insert((*literal).to_string());
        }
        Self(set.into_iter().collect())
    }

    /// The literal used to stand in for uncorrectable values.
    pub fn null_literal(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|entry| entry == value)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_literal_is_first_entry() {
        let missing = MissingValues::default();
        assert_eq!(missing.null_literal(), "");
    }

    #[test]
    fn merged_vocabulary_is_sorted_and_keeps_empty_first() {
        let observed: BTreeSet<String> =
            ["unknown".to_string(), "".to_string()].into_iter().collect();
        let merged = MissingValues::merged_with(&observed);
        assert_eq!(merged.null_literal(), "");
        assert!(merged.contains("unknown"));
        assert!(merged.contains("NA"));
        let slice = merged.as_slice();
        let mut sorted = slice.to_vec();
        sorted.sort();
        assert_eq!(slice, sorted.as_slice());
    }

    #[test]
    fn empty_string_only_skips_na_literals() {
        let missing = MissingValues::empty_string_only();
        assert!(missing.contains(""));
        assert!(!missing.contains("NA"));
    }
}

//! Column report: one column's full validation and correction lifecycle.
//!
//! Lifecycle is a forward-only state machine:
//!
//! ```text
//! Unvalidated --validate()--> Validated --apply_corrections()--> Corrected
//! ```
//!
//! `validate` partitions every raw (row, value) pair into null / valid /
//! datatype-violated / constraint-violated, computes a suggestion for every
//! violated pair, and profiles the valid set. `apply_corrections` merges the
//! suggestions into the corrected value stream and re-profiles.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use dqc_model::{
    FieldDescriptor, MissingValues, Statistics, Suggestion, ValueError, ViolationKind,
};
use dqc_patterns::profile_field;
use dqc_validate::FieldValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportState {
    Unvalidated,
    Validated,
    Corrected,
}

/// Per-kind tallies of suggestion outcomes. A success is a suggestion that
/// differs from the null literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionCounts {
    pub corrected: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct ColumnReport {
    validator: FieldValidator,
    raw: Vec<(usize, String)>,
    state: ReportState,
    nulls: BTreeSet<usize>,
    valid: Vec<(usize, String)>,
    datatype_violations: Vec<(usize, String)>,
    constraint_violations: Vec<(usize, String)>,
    datatype_suggestions: Vec<Suggestion>,
    constraint_suggestions: Vec<Suggestion>,
    statistics: Statistics,
    corrected_statistics: Option<Statistics>,
    outlier_sigma: f64,
}

impl ColumnReport {
    /// Build a report over a column's raw values, numbering rows from 1.
    pub fn new(descriptor: FieldDescriptor, missing: MissingValues, values: Vec<String>) -> Self {
        let raw = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index + 1, value))
            .collect();
        Self {
            validator: FieldValidator::new(descriptor, missing),
            raw,
            state: ReportState::Unvalidated,
            nulls: BTreeSet::new(),
            valid: Vec::new(),
            datatype_violations: Vec::new(),
            constraint_violations: Vec::new(),
            datatype_suggestions: Vec::new(),
            constraint_suggestions: Vec::new(),
            statistics: Statistics::new(),
            corrected_statistics: None,
            outlier_sigma: dqc_patterns::DEFAULT_OUTLIER_SIGMA,
        }
    }

    pub fn with_outlier_sigma(mut self, sigma: f64) -> Self {
        self.outlier_sigma = sigma;
        self
    }

    pub fn name(&self) -> &str {
        &self.validator.descriptor().name
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        self.validator.descriptor()
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    pub fn total_rows(&self) -> usize {
        self.raw.len()
    }

    /// Partition the raw pairs, compute suggestions for every violated pair
    /// and profile the valid set. No-op once validated.
    pub fn validate(&mut self) {
        if self.state != ReportState::Unvalidated {
            return;
        }
        for (row, value) in &self.raw {
            let trimmed = value.trim();
            if self.validator.is_missing(trimmed) {
                self.nulls.insert(*row);
                continue;
            }
            match self.validator.validate(trimmed) {
                Ok(_) => self.valid.push((*row, trimmed.to_string())),
                Err(ValueError::DataType { .. }) => {
                    self.datatype_violations.push((*row, trimmed.to_string()));
                    self.datatype_suggestions.push(Suggestion {
                        row: *row,
                        original: trimmed.to_string(),
                        suggested: self.validator.suggest_datatype(trimmed),
                    });
                }
                Err(ValueError::Constraint { .. }) => {
                    self.constraint_violations.push((*row, trimmed.to_string()));
                    self.constraint_suggestions.push(Suggestion {
                        row: *row,
                        original: trimmed.to_string(),
                        suggested: self.validator.suggest_constraint(trimmed),
                    });
                }
            }
        }
        self.statistics = profile_field(self.descriptor(), &self.valid, self.outlier_sigma);
        self.state = ReportState::Validated;
        debug!(
            column = self.name(),
            valid = self.valid.len(),
            nulls = self.nulls.len(),
            datatype = self.datatype_violations.len(),
            constraint = self.constraint_violations.len(),
            "validated column"
        );
    }

    /// Merge all suggestions into the corrected value stream and re-profile
    /// over valid plus successfully corrected values. Idempotent.
    pub fn apply_corrections(&mut self) {
        if self.state == ReportState::Unvalidated {
            self.validate();
        }
        let mut merged = self.valid.clone();
        for suggestion in self.all_suggestions() {
            if suggestion.corrects(self.validator.null_literal())
                && self.validator.validate(&suggestion.suggested).is_ok()
            {
                merged.push((suggestion.row, suggestion.suggested.clone()));
            }
        }
        merged.sort_by_key(|(row, _)| *row);
        self.corrected_statistics =
            Some(profile_field(self.descriptor(), &merged, self.outlier_sigma));
        self.state = ReportState::Corrected;
    }

    /// Rows whose value is in the missing vocabulary.
    pub fn null_rows(&self) -> &BTreeSet<usize> {
        &self.nulls
    }

    /// Rows carrying a non-missing value.
    pub fn filled_rows(&self) -> BTreeSet<usize> {
        self.raw
            .iter()
            .map(|(row, _)| *row)
            .filter(|row| !self.nulls.contains(row))
            .collect()
    }

    pub fn valid_rows(&self) -> BTreeSet<usize> {
        self.valid.iter().map(|(row, _)| *row).collect()
    }

    /// Distinct raw values that passed validation, sorted.
    pub fn distinct_valid_values(&self) -> BTreeSet<String> {
        self.valid.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Union of both violation kinds.
    pub fn invalid_rows(&self) -> BTreeSet<usize> {
        self.datatype_violations
            .iter()
            .chain(&self.constraint_violations)
            .map(|(row, _)| *row)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.datatype_violations.is_empty() && self.constraint_violations.is_empty()
    }

    pub fn violations(&self, kind: ViolationKind) -> &[(usize, String)] {
        match kind {
            ViolationKind::Datatype => &self.datatype_violations,
            ViolationKind::Constraint => &self.constraint_violations,
        }
    }

    pub fn suggestions(&self, kind: ViolationKind) -> &[Suggestion] {
        match kind {
            ViolationKind::Datatype => &self.datatype_suggestions,
            ViolationKind::Constraint => &self.constraint_suggestions,
        }
    }

    fn all_suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.datatype_suggestions
            .iter()
            .chain(&self.constraint_suggestions)
    }

    /// Original -> replacement pairs for one violation kind, excluding
    /// null-literal outcomes.
    pub fn correction_pairs(&self, kind: ViolationKind) -> Vec<(String, String)> {
        self.suggestions(kind)
            .iter()
            .filter(|s| s.corrects(self.validator.null_literal()))
            .map(|s| (s.original.clone(), s.suggested.clone()))
            .collect()
    }

    /// Distinct values of one violation kind for which no correction exists.
    pub fn uncorrectable_values(&self, kind: ViolationKind) -> BTreeSet<String> {
        self.suggestions(kind)
            .iter()
            .filter(|s| !s.corrects(self.validator.null_literal()))
            .map(|s| s.original.clone())
            .collect()
    }

    pub fn correction_counts(&self, kind: ViolationKind) -> CorrectionCounts {
        let mut counts = CorrectionCounts::default();
        for suggestion in self.suggestions(kind) {
            if suggestion.corrects(self.validator.null_literal()) {
                counts.corrected += 1;
            } else {
                counts.failed += 1;
            }
        }
        counts
    }

    /// Statistics over the valid set (post-validation).
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Statistics over valid plus corrected values; present once corrections
    /// have been applied.
    pub fn corrected_statistics(&self) -> Option<&Statistics> {
        self.corrected_statistics.as_ref()
    }

    /// Rows that count as valid for row-level metrics: the valid partition,
    /// plus successfully corrected rows once in the corrected state.
    pub fn effective_valid_rows(&self) -> BTreeSet<usize> {
        let mut rows = self.valid_rows();
        if self.state == ReportState::Corrected {
            for suggestion in self.all_suggestions() {
                if suggestion.corrects(self.validator.null_literal()) {
                    rows.insert(suggestion.row);
                }
            }
        }
        rows
    }

    /// The corrected value stream: valid values as-is, violated rows
    /// replaced by their suggestion once corrections are applied, missing
    /// rows keeping their original literal.
    pub fn corrected_values(&self) -> Vec<String> {
        let mut overrides: BTreeMap<usize, &str> = BTreeMap::new();
        if self.state == ReportState::Corrected {
            for suggestion in self.all_suggestions() {
                overrides.insert(suggestion.row, suggestion.suggested.as_str());
            }
        }
        self.raw
            .iter()
            .map(|(row, value)| {
                overrides
                    .get(row)
                    .map(|replacement| (*replacement).to_string())
                    .unwrap_or_else(|| value.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqc_model::{Constraints, DEFAULT_FORMAT, MipType, StorageType};

    fn scenario_a_report() -> ColumnReport {
        let descriptor = FieldDescriptor {
            name: "score".to_string(),
            storage_type: StorageType::Integer,
            format: DEFAULT_FORMAT.to_string(),
            miptype: MipType::Integer,
            constraints: Some(Constraints {
                minimum: Some(3.0),
                maximum: Some(5.0),
                ..Constraints::default()
            }),
            suffix: None,
            decimal_char: None,
        };
        let values = ["1", "3", "3", "2", "5", "4", "2.5", "", "not_int", "20191212", "5.6"]
            .map(String::from)
            .to_vec();
        ColumnReport::new(descriptor, MissingValues::default(), values)
    }

    #[test]
    fn scenario_a_partition() {
        let mut report = scenario_a_report();
        report.validate();
        assert_eq!(report.null_rows(), &BTreeSet::from([8]));
        assert_eq!(
            report
                .violations(ViolationKind::Datatype)
                .iter()
                .map(|(row, _)| *row)
                .collect::<Vec<_>>(),
            vec![7, 9, 11]
        );
        assert_eq!(
            report
                .violations(ViolationKind::Constraint)
                .iter()
                .map(|(row, _)| *row)
                .collect::<Vec<_>>(),
            vec![1, 4, 10]
        );
        // Partition completeness: valid + violations + nulls == total.
        assert_eq!(
            report.valid_rows().len()
                + report.invalid_rows().len()
                + report.null_rows().len(),
            report.total_rows()
        );
    }

    #[test]
    fn scenario_a_suggestions() {
        let mut report = scenario_a_report();
        report.validate();
        let suggestions = report.suggestions(ViolationKind::Datatype);
        // 2.5 truncates to 2, which then fails the minimum constraint.
        assert_eq!(suggestions[0].row, 7);
        assert_eq!(suggestions[0].suggested, "");
        // not_int has no repair.
        assert_eq!(suggestions[1].suggested, "");
        // 5.6 truncates to 5, inside [3, 5].
        assert_eq!(suggestions[2].row, 11);
        assert_eq!(suggestions[2].suggested, "5");
        assert_eq!(
            report.correction_counts(ViolationKind::Datatype),
            CorrectionCounts {
                corrected: 1,
                failed: 2
            }
        );
        assert_eq!(
            report.uncorrectable_values(ViolationKind::Datatype),
            BTreeSet::from(["2.5".to_string(), "not_int".to_string()])
        );
    }

    #[test]
    fn scenario_b_nominal_corrections() {
        let mut descriptor = FieldDescriptor::text("category");
        descriptor.miptype = MipType::Nominal;
        descriptor.constraints = Some(Constraints::with_enum(vec![
            "Another3".to_string(),
            "Category1".to_string(),
            "Category2".to_string(),
        ]));
        let values = [
            "cAtegory1",
            "not_value",
            "Category1",
            "Category2",
            "anoter1",
            "",
            "",
            "Category2",
            "CATEGOR2",
        ]
        .map(String::from)
        .to_vec();
        let mut report = ColumnReport::new(descriptor, MissingValues::default(), values);
        report.validate();
        assert_eq!(
            report
                .violations(ViolationKind::Constraint)
                .iter()
                .map(|(row, _)| *row)
                .collect::<Vec<_>>(),
            vec![1, 2, 5, 9]
        );
        let suggestions = report.suggestions(ViolationKind::Constraint);
        assert_eq!(suggestions[0].suggested, "Category1");
        assert_eq!(suggestions[1].suggested, "");
        assert_eq!(suggestions[2].suggested, "Another3");
        assert_eq!(suggestions[3].suggested, "Category2");
        assert_eq!(
            report.uncorrectable_values(ViolationKind::Constraint),
            BTreeSet::from(["not_value".to_string()])
        );
    }

    #[test]
    fn corrections_update_statistics_and_stream() {
        let mut report = scenario_a_report();
        report.validate();
        let before = report.statistics()["count"].clone();
        assert_eq!(before, dqc_model::StatValue::Int(4));
        report.apply_corrections();
        let after = report
            .corrected_statistics()
            .expect("corrected statistics")["count"]
            .clone();
        // The corrected 5 joins the valid set; failed corrections do not.
        assert_eq!(after, dqc_model::StatValue::Int(5));

        let stream = report.corrected_values();
        assert_eq!(stream[10], "5"); // row 11: 5.6 -> 5
        assert_eq!(stream[6], ""); // row 7: uncorrectable, null literal
        assert_eq!(stream[1], "3"); // row 2: valid, untouched
        assert_eq!(stream[7], ""); // row 8: missing, keeps its literal
    }

    #[test]
    fn state_machine_is_forward_only() {
        let mut report = scenario_a_report();
        assert_eq!(report.state(), ReportState::Unvalidated);
        report.validate();
        assert_eq!(report.state(), ReportState::Validated);
        report.validate();
        assert_eq!(report.state(), ReportState::Validated);
        report.apply_corrections();
        assert_eq!(report.state(), ReportState::Corrected);
        // Re-applying recomputes from the same suggestion set.
        report.apply_corrections();
        assert_eq!(report.state(), ReportState::Corrected);
        let count = report.corrected_statistics().expect("stats")["count"].clone();
        assert_eq!(count, dqc_model::StatValue::Int(5));
    }

    #[test]
    fn zero_valid_values_yield_empty_statistics() {
        let mut descriptor = FieldDescriptor::text("empty");
        descriptor.storage_type = StorageType::Integer;
        descriptor.miptype = MipType::Integer;
        let mut report = ColumnReport::new(
            descriptor,
            MissingValues::default(),
            vec!["abc".to_string(), "".to_string()],
        );
        report.validate();
        assert!(report.statistics().is_empty());
    }
}

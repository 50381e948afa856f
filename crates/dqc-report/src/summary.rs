//! Serializable snapshots of column and table reports.
//!
//! External collaborators (CLI, renderers) consume these instead of touching
//! report internals.

use serde::Serialize;

use dqc_model::{Statistics, Suggestion, ViolationKind};

use crate::column::{ColumnReport, CorrectionCounts, ReportState};
use crate::table::{RowMetrics, TableReport};

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "MIPType")]
    pub miptype: String,
    #[serde(rename = "type")]
    pub storage_type: String,
    pub state: ReportState,
    pub total_rows: usize,
    pub null_rows: usize,
    pub valid_rows: usize,
    pub datatype_violations: usize,
    pub constraint_violations: usize,
    pub datatype_corrections: CorrectionCounts,
    pub constraint_corrections: CorrectionCounts,
    pub datatype_suggestions: Vec<Suggestion>,
    pub constraint_suggestions: Vec<Suggestion>,
    pub statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_statistics: Option<Statistics>,
}

impl ColumnSummary {
    pub fn from_report(report: &ColumnReport) -> Self {
        Self {
            name: report.name().to_string(),
            miptype: report.descriptor().miptype.to_string(),
            storage_type: report.descriptor().storage_type.to_string(),
            state: report.state(),
            total_rows: report.total_rows(),
            null_rows: report.null_rows().len(),
            valid_rows: report.valid_rows().len(),
            datatype_violations: report.violations(ViolationKind::Datatype).len(),
            constraint_violations: report.violations(ViolationKind::Constraint).len(),
            datatype_corrections: report.correction_counts(ViolationKind::Datatype),
            constraint_corrections: report.correction_counts(ViolationKind::Constraint),
            datatype_suggestions: report.suggestions(ViolationKind::Datatype).to_vec(),
            constraint_suggestions: report.suggestions(ViolationKind::Constraint).to_vec(),
            statistics: report.statistics().clone(),
            corrected_statistics: report.corrected_statistics().cloned(),
        }
    }

    pub fn invalid_rows(&self) -> usize {
        self.datatype_violations + self.constraint_violations
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub id_column: String,
    pub is_valid: bool,
    pub row_metrics: RowMetrics,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    pub fn from_report(report: &TableReport) -> Self {
        Self {
            total_rows: report.total_rows(),
            total_columns: report.columns().len(),
            id_column: report.id_column().name().to_string(),
            is_valid: report.is_valid(),
            row_metrics: report.row_metrics().clone(),
            columns: report.columns().iter().map(ColumnSummary::from_report).collect(),
        }
    }
}

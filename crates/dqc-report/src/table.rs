//! Table report: per-column reports plus row-level completeness and
//! validity metrics relative to a designated identifier column.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use dqc_model::{MissingValues, SchemaDescriptor, TableReportError};

use crate::column::ColumnReport;

/// Labels of the quartile-based row buckets.
pub const BUCKET_LABELS: [&str; 5] = ["0-24%", "25-49%", "50-74%", "75-99%", "100%"];

/// Row counts per quartile bucket of column coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts(pub [usize; 5]);

impl BucketCounts {
    fn add(&mut self, count: usize, total_columns: usize) {
        self.0[bucket_index(count, total_columns)] += 1;
    }
}

/// Quartile boundaries are placed with `round()` on the column count; a row
/// covering every column always lands in the 100% bucket and a row covering
/// none in the lowest. The zero guard matters for narrow tables, where
/// `boundary(0.25)` itself rounds to 0.
fn bucket_index(count: usize, total_columns: usize) -> usize {
    if count >= total_columns {
        return 4;
    }
    if count == 0 {
        return 0;
    }
    let boundary = |q: f64| (q * total_columns as f64).round() as usize;
    if count >= boundary(0.75) {
        3
    } else if count >= boundary(0.5) {
        2
    } else if count >= boundary(0.25) {
        1
    } else {
        0
    }
}

/// Row-level metrics relative to the identifier column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowMetrics {
    /// Rows where only the identifier is filled and nothing else.
    pub only_id_filled: usize,
    /// Rows where the identifier itself is missing.
    pub id_missing: usize,
    /// Rows where every column is filled.
    pub fully_filled: usize,
    /// Per-row filled-column counts, bucketed.
    pub filled_buckets: BucketCounts,
    /// Per-row valid-column counts, bucketed.
    pub valid_buckets: BucketCounts,
}

#[derive(Debug)]
pub struct TableReport {
    headers: Vec<String>,
    columns: Vec<ColumnReport>,
    id_index: usize,
    total_rows: usize,
    row_metrics: RowMetrics,
}

impl TableReport {
    /// Build and validate a report for a fully-schema'd table.
    ///
    /// `column_values` holds one value vector per column, in header order.
    /// Fails fast on structural misconfiguration; nothing here is retried.
    pub fn new(
        headers: Vec<String>,
        column_values: Vec<Vec<String>>,
        schema: &SchemaDescriptor,
        id_column: &str,
    ) -> Result<Self, TableReportError> {
        let id_index = headers
            .iter()
            .position(|header| header == id_column)
            .ok_or_else(|| TableReportError::UnknownIdColumn(id_column.to_string()))?;
        Self::with_id_index(headers, column_values, schema, id_index)
    }

    /// As [`TableReport::new`] with a custom outlier threshold in sample
    /// standard deviations.
    pub fn with_outlier_sigma(
        headers: Vec<String>,
        column_values: Vec<Vec<String>>,
        schema: &SchemaDescriptor,
        id_column: &str,
        sigma: f64,
    ) -> Result<Self, TableReportError> {
        let id_index = headers
            .iter()
            .position(|header| header == id_column)
            .ok_or_else(|| TableReportError::UnknownIdColumn(id_column.to_string()))?;
        Self::build(headers, column_values, schema, id_index, sigma)
    }

    /// As [`TableReport::new`], addressing the identifier column by index.
    pub fn with_id_index(
        headers: Vec<String>,
        column_values: Vec<Vec<String>>,
        schema: &SchemaDescriptor,
        id_index: usize,
    ) -> Result<Self, TableReportError> {
        Self::build(
            headers,
            column_values,
            schema,
            id_index,
            dqc_patterns::DEFAULT_OUTLIER_SIGMA,
        )
    }

    fn build(
        headers: Vec<String>,
        column_values: Vec<Vec<String>>,
        schema: &SchemaDescriptor,
        id_index: usize,
        sigma: f64,
    ) -> Result<Self, TableReportError> {
        if schema.fields.is_empty() {
            return Err(TableReportError::EmptySchema);
        }
        if schema.fields.len() != headers.len() {
            return Err(TableReportError::ColumnCountMismatch {
                fields: schema.fields.len(),
                columns: headers.len(),
            });
        }
        if column_values.len() != headers.len() {
            return Err(TableReportError::ColumnCountMismatch {
                fields: schema.fields.len(),
                columns: column_values.len(),
            });
        }
        if id_index >= headers.len() {
            return Err(TableReportError::IdColumnOutOfRange {
                index: id_index,
                columns: headers.len(),
            });
        }

        let total_rows = column_values.iter().map(Vec::len).max().unwrap_or(0);
        let missing: MissingValues = schema.missing_values.clone();
        let mut columns = Vec::with_capacity(headers.len());
        for (field, mut values) in schema.fields.iter().cloned().zip(column_values) {
            values.resize(total_rows, String::new());
            let mut report =
                ColumnReport::new(field, missing.clone(), values).with_outlier_sigma(sigma);
            report.validate();
            columns.push(report);
        }

        let mut table = Self {
            headers,
            columns,
            id_index,
            total_rows,
            row_metrics: RowMetrics::default(),
        };
        table.recompute_row_metrics();
        info!(
            columns = table.columns.len(),
            rows = table.total_rows,
            valid = table.is_valid(),
            "built table report"
        );
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &[ColumnReport] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn id_column(&self) -> &ColumnReport {
        &self.columns[self.id_index]
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn row_metrics(&self) -> &RowMetrics {
        &self.row_metrics
    }

    /// True only when no column reports any invalid rows.
    pub fn is_valid(&self) -> bool {
        self.columns.iter().all(ColumnReport::is_valid)
    }

    /// Apply every column's corrections and recompute the row-level metrics.
    pub fn apply_corrections(&mut self) {
        for column in &mut self.columns {
            column.apply_corrections();
        }
        self.recompute_row_metrics();
        debug!("applied corrections to all columns");
    }

    fn recompute_row_metrics(&mut self) {
        let total_columns = self.columns.len();
        let filled: Vec<BTreeSet<usize>> =
            self.columns.iter().map(ColumnReport::filled_rows).collect();
        let valid: Vec<BTreeSet<usize>> = self
            .columns
            .iter()
            .map(ColumnReport::effective_valid_rows)
            .collect();

        let mut metrics = RowMetrics::default();
        for row in 1..=self.total_rows {
            let filled_count = filled.iter().filter(|rows| rows.contains(&row)).count();
            let valid_count = valid.iter().filter(|rows| rows.contains(&row)).count();
            let id_filled = filled[self.id_index].contains(&row);

            if !id_filled {
                metrics.id_missing += 1;
            } else if filled_count == 1 {
                metrics.only_id_filled += 1;
            }
            if filled_count == total_columns {
                metrics.fully_filled += 1;
            }
            metrics.filled_buckets.add(filled_count, total_columns);
            metrics.valid_buckets.add(valid_count, total_columns);
        }
        self.row_metrics = metrics;
    }

    /// Write the corrected dataset as CSV: header row preserved verbatim,
    /// every subsequent row substituting corrected or valid values.
    pub fn export_corrected<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        let streams: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(ColumnReport::corrected_values)
            .collect();
        for row in 0..self.total_rows {
            let record: Vec<&str> = streams
                .iter()
                .map(|stream| stream.get(row).map(String::as_str).unwrap_or(""))
                .collect();
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Convenience wrapper writing the corrected dataset to a file path.
    pub fn export_corrected_to_path(&self, path: &Path) -> csv::Result<()> {
        let file = std::fs::File::create(path)?;
        self.export_corrected(file)
    }
}

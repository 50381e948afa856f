//! CSV ingestion.
//!
//! Reads a delimited file into headers plus raw string rows. Cells keep their
//! raw spelling apart from whitespace and byte-order-mark trimming; every
//! interpretation decision (types, missing values) belongs to the inference
//! and validation layers.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

/// An in-memory table of raw string cells. The first file record supplies
/// the headers; every data row is padded to the header width.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// One column's raw values in row order. Empty when out of range.
    pub fn column(&self, index: usize) -> Vec<String> {
        if index >= self.headers.len() {
            return Vec::new();
        }
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }

    /// All columns in header order, ready for table-report construction.
    pub fn columns(&self) -> Vec<Vec<String>> {
        (0..self.headers.len()).map(|idx| self.column(idx)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file into a [`CsvTable`].
///
/// The reader is flexible: short records are padded with empty cells, long
/// records are truncated to the header width, and fully empty records are
/// skipped.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let mut records = reader.records();
    let Some(first) = records.next() else {
        return Ok(CsvTable::default());
    };
    let first = first.with_context(|| format!("read header record: {}", path.display()))?;
    let headers: Vec<String> = first.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read csv table"
    );
    Ok(CsvTable { headers, rows })
}

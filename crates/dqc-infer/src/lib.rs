//! Schema inference engine.
//!
//! Given header names and a bounded sample of rows, infers the most specific
//! consistent type and constraint set per column and assembles the dataset's
//! missing-value vocabulary.
//!
//! # Resolution
//!
//! Every sampled cell is stripped and run through the pattern library's
//! priority chain. Per column:
//!
//! - one distinct (type, pattern) across the sample → described directly;
//! - all cells missing → plain text descriptor;
//! - otherwise the two most frequent (type, pattern) pairs compete and the
//!   one with the more specific type wins (date > integer > numerical >
//!   text). Most common shape, but prefer specificity; not a strict
//!   majority vote.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use dqc_model::{FieldDescriptor, MipType, MissingValues, SchemaDescriptor};
use dqc_patterns::{ValuePattern, describe, infer_value};

/// Tuning knobs for schema inference.
#[derive(Debug, Clone)]
pub struct InferOptions {
    /// Maximum number of rows sampled per column.
    pub sample_rows: usize,
    /// Cardinality threshold for nominal reclassification.
    pub maxlevels: usize,
    /// Advisory confidence level; logged, not used as a hard filter.
    pub confidence: f64,
    /// Treat only the literal empty string as missing, instead of the full
    /// NA vocabulary.
    pub na_empty_strings_only: bool,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            sample_rows: 100,
            maxlevels: 10,
            confidence: 1.0,
            na_empty_strings_only: false,
        }
    }
}

/// Infer a schema descriptor from headers and a row sample.
pub fn infer_schema(
    headers: &[String],
    rows: &[Vec<String>],
    options: &InferOptions,
) -> SchemaDescriptor {
    let classify_missing = if options.na_empty_strings_only {
        MissingValues::empty_string_only()
    } else {
        MissingValues::default()
    };
    debug!(
        columns = headers.len(),
        sample_rows = options.sample_rows,
        maxlevels = options.maxlevels,
        confidence = options.confidence,
        "inferring schema"
    );

    let mut observed_missing: BTreeSet<String> = BTreeSet::new();
    let mut fields = Vec::with_capacity(headers.len());

    for (index, header) in headers.iter().enumerate() {
        let mut tallies: BTreeMap<ValuePattern, usize> = BTreeMap::new();
        let mut uniques: BTreeMap<MipType, BTreeSet<String>> = BTreeMap::new();

        for row in rows.iter().take(options.sample_rows) {
            let raw = row.get(index).map(String::as_str).unwrap_or("");
            let trimmed = raw.trim();
            let pattern = infer_value(trimmed, &classify_missing);
            let Some(miptype) = pattern.miptype() else {
                observed_missing.insert(trimmed.to_string());
                continue;
            };
            uniques
                .entry(miptype)
                .or_default()
                .insert(trimmed.to_string());
            *tallies.entry(pattern).or_default() += 1;
        }

        let field = resolve_column(header, &tallies, &uniques, options.maxlevels);
        debug!(
            column = header.as_str(),
            miptype = %field.miptype,
            storage = %field.storage_type,
            "resolved column"
        );
        fields.push(field);
    }

    let missing_values = if options.na_empty_strings_only {
        MissingValues::empty_string_only()
    } else {
        MissingValues::merged_with(&observed_missing)
    };

    SchemaDescriptor {
        fields,
        missing_values,
    }
}

/// Pick a column's descriptor from its pattern tallies.
fn resolve_column(
    name: &str,
    tallies: &BTreeMap<ValuePattern, usize>,
    uniques: &BTreeMap<MipType, BTreeSet<String>>,
    maxlevels: usize,
) -> FieldDescriptor {
    // All sampled rows were missing.
    if tallies.is_empty() {
        return FieldDescriptor::text(name);
    }

    if tallies.len() == 1
        && let Some(pattern) = tallies.keys().next()
    {
        return describe(name, pattern, &uniques_for(pattern, uniques), maxlevels);
    }

    // Competing shapes: take the two most frequent and keep the one with the
    // more specific type.
    let mut ranked: Vec<(&ValuePattern, usize)> =
        tallies.iter().map(|(pattern, count)| (pattern, *count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let winner = ranked
        .iter()
        .take(2)
        .min_by_key(|(pattern, _)| pattern.miptype().map(|t| t.priority()).unwrap_or(u8::MAX))
        .map(|(pattern, _)| *pattern)
        .unwrap_or(ranked[0].0);

    describe(name, winner, &uniques_for(winner, uniques), maxlevels)
}

/// Distinct values counted towards the winner's cardinality. A text column
/// accepts every shape, so all observed values are candidate categories;
/// any other winner only counts values that matched its own type.
fn uniques_for(
    winner: &ValuePattern,
    uniques: &BTreeMap<MipType, BTreeSet<String>>,
) -> BTreeSet<String> {
    match winner.miptype() {
        Some(MipType::Text) => uniques.values().flatten().cloned().collect(),
        Some(miptype) => uniques.get(&miptype).cloned().unwrap_or_default(),
        None => BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqc_model::{MipType, StorageType};

    fn rows(columns: &[&[&str]]) -> Vec<Vec<String>> {
        let height = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        (0..height)
            .map(|r| {
                columns
                    .iter()
                    .map(|c| c.get(r).map(|v| (*v).to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn unanimous_columns_describe_directly() {
        let schema = infer_schema(
            &headers(&["visit_date", "score"]),
            &rows(&[
                &["31-05-1980", "01-02-2019", "15-11-2001"],
                &["1.5", "2.5", "3.5"],
            ]),
            &InferOptions::default(),
        );
        assert_eq!(schema.fields[0].miptype, MipType::Date);
        assert_eq!(schema.fields[0].format, "%d-%m-%Y");
        assert_eq!(schema.fields[1].miptype, MipType::Numerical);
        assert_eq!(schema.fields[1].storage_type, StorageType::Number);
    }

    #[test]
    fn mixed_integer_and_text_prefers_integer() {
        let values: Vec<String> = (0..30)
            .map(|i| {
                if i % 10 == 0 {
                    "junk".to_string()
                } else {
                    (i + 100).to_string()
                }
            })
            .collect();
        let data: Vec<Vec<String>> = values.into_iter().map(|v| vec![v]).collect();
        let schema = infer_schema(
            &headers(&["subject_id"]),
            &data,
            &InferOptions {
                maxlevels: 3,
                ..InferOptions::default()
            },
        );
        assert_eq!(schema.fields[0].miptype, MipType::Integer);
    }

    #[test]
    fn all_missing_column_defaults_to_text() {
        let schema = infer_schema(
            &headers(&["notes"]),
            &rows(&[&["", "NA", ""]]),
            &InferOptions::default(),
        );
        assert_eq!(schema.fields[0].miptype, MipType::Text);
        assert_eq!(schema.fields[0].storage_type, StorageType::String);
    }

    #[test]
    fn observed_missing_literals_join_the_vocabulary() {
        let schema = infer_schema(
            &headers(&["age"]),
            &rows(&[&["42", "NaN", "37"]]),
            &InferOptions::default(),
        );
        assert!(schema.missing_values.contains("NaN"));
        assert_eq!(schema.missing_values.null_literal(), "");
    }

    #[test]
    fn empty_strings_only_narrows_the_vocabulary() {
        let schema = infer_schema(
            &headers(&["label"]),
            &rows(&[&["NA", "NA", "yes", "no", ""]]),
            &InferOptions {
                na_empty_strings_only: true,
                ..InferOptions::default()
            },
        );
        // "NA" is now a real category, not a missing marker.
        let enum_values = schema.fields[0].enum_values().expect("nominal enum");
        assert!(enum_values.contains(&"NA".to_string()));
        assert_eq!(schema.missing_values.as_slice(), &["".to_string()]);
    }

    #[test]
    fn low_cardinality_sample_becomes_nominal_with_enum() {
        let schema = infer_schema(
            &headers(&["sex"]),
            &rows(&[&["M", "F", "F", "M", "F"]]),
            &InferOptions::default(),
        );
        assert_eq!(schema.fields[0].miptype, MipType::Nominal);
        assert_eq!(
            schema.fields[0].enum_values(),
            Some(["F", "M"].map(String::from).as_slice())
        );
    }
}

//! Common data element (CDE) dictionary and mapping suggestions.
//!
//! A CDE dictionary holds canonical variable definitions. Given a validated
//! column report, [`CdeDictionary::suggest`] scores every dictionary entry
//! sharing the column's semantic type and proposes the best match when it
//! clears the caller's threshold. A miss is a normal outcome, never an error.
//!
//! Scoring blends a lexical name score with a value-range score:
//!
//! ```text
//! score = 0.8 * name + 0.2 * range     (when both sides carry a range)
//! score = name                         (otherwise)
//! ```
//!
//! Both parts are F1 scores. The name part derives precision and recall from
//! edit distance; the range part from category overlap (nominal) or interval
//! overlap (numeric).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use dqc_model::MipType;
use dqc_report::ColumnReport;

/// Weight of the lexical name score when a range score is available.
pub const NAME_WEIGHT: f64 = 0.8;
/// Weight of the value-range score when available.
pub const RANGE_WEIGHT: f64 = 0.2;
/// Default acceptance threshold for a suggestion.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Allowed values of a dictionary variable, either a numeric interval or an
/// explicit enumeration of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRange {
    Numeric { minimum: f64, maximum: f64 },
    Enumeration(Vec<String>),
}

/// One canonical variable definition. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdeVariable {
    pub code: String,
    #[serde(rename = "MIPType")]
    pub miptype: MipType,
    /// Slash-separated position in the concept hierarchy.
    #[serde(default)]
    pub concept_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    /// Alternate names the variable is known under in source datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_lookup: Vec<String>,
    /// Alternate enumerations seen in source datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_lookup: Vec<Vec<String>>,
}

impl CdeVariable {
    /// All category spellings the variable accepts, lowercased.
    fn category_pool(&self) -> BTreeSet<String> {
        let mut pool: BTreeSet<String> = BTreeSet::new();
        if let Some(ValueRange::Enumeration(values)) = &self.range {
            pool.extend(values.iter().map(|v| v.to_lowercase()));
        }
        for alternates in &self.enum_lookup {
            pool.extend(alternates.iter().map(|v| v.to_lowercase()));
        }
        pool
    }
}

/// What a column looks like to the matcher: its header, semantic type and
/// observed value range.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    pub miptype: MipType,
    /// Distinct observed categories for nominal and text columns.
    pub categories: BTreeSet<String>,
    /// Observed (min, max) for integer and numerical columns.
    pub numeric_range: Option<(f64, f64)>,
}

impl ColumnProfile {
    /// Extract the matcher's view from a validated column report.
    pub fn from_report(report: &ColumnReport) -> Self {
        let descriptor = report.descriptor();
        let categories = match descriptor.miptype {
            MipType::Nominal | MipType::Text => report.distinct_valid_values(),
            _ => BTreeSet::new(),
        };
        let stats = report.statistics();
        let numeric_range = match descriptor.miptype {
            MipType::Integer | MipType::Numerical => stats
                .get("min")
                .and_then(|v| v.as_f64())
                .zip(stats.get("max").and_then(|v| v.as_f64())),
            _ => None,
        };
        Self {
            name: descriptor.name.clone(),
            miptype: descriptor.miptype,
            categories,
            numeric_range,
        }
    }
}

/// A scored mapping proposal for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdeSuggestion {
    pub code: String,
    pub concept_path: String,
    pub score: f64,
}

/// Reference dictionary of CDE variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CdeDictionary {
    variables: Vec<CdeVariable>,
}

impl CdeDictionary {
    pub fn new(variables: Vec<CdeVariable>) -> Self {
        Self { variables }
    }

    /// Parse a dictionary from a JSON array of variable definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse CDE dictionary JSON")
    }

    /// Load a dictionary from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read CDE dictionary from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse CDE dictionary from {}", path.display()))
    }

    pub fn variables(&self) -> &[CdeVariable] {
        &self.variables
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Score every variable sharing the column's type and return the best
    /// candidate whose score clears `threshold`. `None` is a normal miss.
    pub fn suggest(&self, column: &ColumnProfile, threshold: f64) -> Option<CdeSuggestion> {
        let mut best: Option<CdeSuggestion> = None;
        for variable in &self.variables {
            if variable.miptype != column.miptype {
                continue;
            }
            let score = similarity(column, variable);
            debug!(
                column = column.name.as_str(),
                code = variable.code.as_str(),
                score,
                "scored candidate"
            );
            if score >= threshold && best.as_ref().is_none_or(|held| score > held.score) {
                best = Some(CdeSuggestion {
                    code: variable.code.clone(),
                    concept_path: variable.concept_path.clone(),
                    score,
                });
            }
        }
        best
    }

    /// As [`CdeDictionary::suggest`], straight from a column report.
    pub fn suggest_for_report(
        &self,
        report: &ColumnReport,
        threshold: f64,
    ) -> Option<CdeSuggestion> {
        self.suggest(&ColumnProfile::from_report(report), threshold)
    }
}

/// Blended similarity of one column against one dictionary variable.
fn similarity(column: &ColumnProfile, variable: &CdeVariable) -> f64 {
    let name = name_score(&column.name, variable);
    match range_score(column, variable) {
        Some(range) => NAME_WEIGHT * name + RANGE_WEIGHT * range,
        None => name,
    }
}

/// Best lexical score of the column name against the variable's code and
/// every alternate name.
fn name_score(column_name: &str, variable: &CdeVariable) -> f64 {
    std::iter::once(variable.code.as_str())
        .chain(variable.variable_lookup.iter().map(String::as_str))
        .map(|candidate| edit_distance_f1(column_name, candidate))
        .fold(0.0, f64::max)
}

/// F1 score derived from edit distance: the characters of the longer string
/// not consumed by edits count as matched, yielding precision over `a` and
/// recall over `b`.
fn edit_distance_f1(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }
    let distance = strsim::levenshtein(&a, &b);
    let matched = len_a.max(len_b).saturating_sub(distance);
    let precision = matched as f64 / len_a as f64;
    let recall = matched as f64 / len_b as f64;
    f1(precision, recall)
}

/// Range score when both the column and the variable carry a usable range.
fn range_score(column: &ColumnProfile, variable: &CdeVariable) -> Option<f64> {
    match (&variable.range, column.miptype) {
        (Some(ValueRange::Enumeration(_)), MipType::Nominal | MipType::Text) => {
            if column.categories.is_empty() {
                return None;
            }
            Some(category_overlap_f1(&column.categories, variable))
        }
        (
            Some(ValueRange::Numeric { minimum, maximum }),
            MipType::Integer | MipType::Numerical,
        ) => {
            let (low, high) = column.numeric_range?;
            Some(interval_overlap_f1((low, high), (*minimum, *maximum)))
        }
        _ => None,
    }
}

/// F1 of the case-insensitive category overlap: precision over the variable's
/// category pool, recall over the column's observed categories.
fn category_overlap_f1(observed: &BTreeSet<String>, variable: &CdeVariable) -> f64 {
    let pool = variable.category_pool();
    if pool.is_empty() {
        return 0.0;
    }
    let observed: BTreeSet<String> = observed.iter().map(|v| v.to_lowercase()).collect();
    let overlap = observed.intersection(&pool).count();
    let precision = overlap as f64 / pool.len() as f64;
    let recall = overlap as f64 / observed.len() as f64;
    f1(precision, recall)
}

/// F1 of the interval overlap, each side's part measured against its own
/// length. A zero-length interval counts fully when its point lies inside
/// the other interval.
fn interval_overlap_f1(column: (f64, f64), candidate: (f64, f64)) -> f64 {
    let overlap = (column.1.min(candidate.1) - column.0.max(candidate.0)).max(0.0);
    let contained = column.1.min(candidate.1) >= column.0.max(candidate.0);
    let part = |len: f64| {
        if len > 0.0 {
            overlap / len
        } else if contained {
            1.0
        } else {
            0.0
        }
    };
    f1(part(column.1 - column.0), part(candidate.1 - candidate.0))
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender_variable() -> CdeVariable {
        CdeVariable {
            code: "gender_type".to_string(),
            miptype: MipType::Nominal,
            concept_path: "demographics/gender".to_string(),
            range: Some(ValueRange::Enumeration(vec![
                "M".to_string(),
                "F".to_string(),
            ])),
            variable_lookup: vec!["gendre".to_string(), "sex".to_string()],
            enum_lookup: vec![vec!["male".to_string(), "female".to_string()]],
        }
    }

    fn age_variable() -> CdeVariable {
        CdeVariable {
            code: "subject_age".to_string(),
            miptype: MipType::Numerical,
            concept_path: "demographics/age".to_string(),
            range: Some(ValueRange::Numeric {
                minimum: 0.0,
                maximum: 120.0,
            }),
            variable_lookup: Vec::new(),
            enum_lookup: Vec::new(),
        }
    }

    fn nominal_profile(name: &str, categories: &[&str]) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            miptype: MipType::Nominal,
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            numeric_range: None,
        }
    }

    #[test]
    fn edit_distance_f1_matches_hand_computation() {
        // "gendreww" vs "gendre": distance 2, matched 6 of max(8, 6).
        // precision 6/8, recall 6/6, F1 = 2 * 0.75 / 1.75.
        let score = edit_distance_f1("gendreww", "gendre");
        assert!((score - 6.0 / 7.0).abs() < 1e-9);
        assert!((edit_distance_f1("age", "AGE") - 1.0).abs() < 1e-9);
        assert_eq!(edit_distance_f1("", "age"), 0.0);
    }

    #[test]
    fn close_name_is_suggested_above_threshold() {
        let dictionary = CdeDictionary::new(vec![gender_variable(), age_variable()]);
        let column = nominal_profile("gendreww", &["m", "f"]);
        let suggestion = dictionary
            .suggest(&column, DEFAULT_THRESHOLD)
            .expect("suggestion");
        assert_eq!(suggestion.code, "gender_type");
        assert!(suggestion.score >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn unrelated_column_yields_no_suggestion() {
        let dictionary = CdeDictionary::new(vec![age_variable()]);
        let column = ColumnProfile {
            name: "verrryirrelevant".to_string(),
            miptype: MipType::Numerical,
            categories: BTreeSet::new(),
            numeric_range: Some((5000.0, 9000.0)),
        };
        assert_eq!(dictionary.suggest(&column, DEFAULT_THRESHOLD), None);
    }

    #[test]
    fn type_filter_excludes_other_miptypes() {
        let dictionary = CdeDictionary::new(vec![gender_variable()]);
        let mut column = nominal_profile("gender_type", &["m", "f"]);
        column.miptype = MipType::Text;
        assert_eq!(dictionary.suggest(&column, DEFAULT_THRESHOLD), None);
    }

    #[test]
    fn enumeration_overlap_boosts_and_penalizes() {
        let full = category_overlap_f1(
            &["m", "f"].iter().map(|c| (*c).to_string()).collect(),
            &gender_variable(),
        );
        // Overlap 2 against a pool of 4 spellings.
        assert!((full - f1(0.5, 1.0)).abs() < 1e-9);

        let none = category_overlap_f1(
            &["yes", "no"].iter().map(|c| (*c).to_string()).collect(),
            &gender_variable(),
        );
        assert_eq!(none, 0.0);
    }

    #[test]
    fn interval_overlap_is_symmetric_in_containment() {
        // Column 20..60 inside candidate 0..120: recall 1, precision 1/3.
        let score = interval_overlap_f1((20.0, 60.0), (0.0, 120.0));
        assert!((score - f1(1.0, 40.0 / 120.0)).abs() < 1e-9);
        assert_eq!(interval_overlap_f1((5000.0, 9000.0), (0.0, 120.0)), 0.0);
        // Coinciding point intervals match fully.
        assert_eq!(interval_overlap_f1((30.0, 30.0), (30.0, 30.0)), 1.0);
    }

    #[test]
    fn loads_dictionary_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"code":"subject_age","MIPType":"numerical"}}]"#)
            .expect("write dictionary");
        let dictionary = CdeDictionary::load(file.path()).expect("load dictionary");
        assert_eq!(dictionary.variables()[0].code, "subject_age");
        assert_eq!(dictionary.variables()[0].range, None);
    }

    #[test]
    fn dictionary_round_trips_through_json() {
        let json = r#"[
            {
                "code": "gender_type",
                "MIPType": "nominal",
                "concept_path": "demographics/gender",
                "range": ["M", "F"],
                "variable_lookup": ["gendre", "sex"]
            },
            {
                "code": "subject_age",
                "MIPType": "numerical",
                "range": {"minimum": 0.0, "maximum": 120.0}
            }
        ]"#;
        let dictionary = CdeDictionary::from_json_str(json).expect("parse dictionary");
        assert_eq!(dictionary.variables().len(), 2);
        assert_eq!(
            dictionary.variables()[0].range,
            Some(ValueRange::Enumeration(vec![
                "M".to_string(),
                "F".to_string()
            ]))
        );
        assert!(matches!(
            dictionary.variables()[1].range,
            Some(ValueRange::Numeric { .. })
        ));
    }
}

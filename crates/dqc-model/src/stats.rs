//! Flat statistics maps produced by the type profilers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One statistics entry: scalar or list, depending on the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Row numbers, e.g. outlier locations.
    Rows(Vec<usize>),
    /// (value, occurrence count) pairs for frequency statistics.
    Frequencies(Vec<(String, usize)>),
}

impl StatValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Int(v) => Some(*v as f64),
            StatValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Int(v) => write!(f, "{v}"),
            StatValue::Float(v) => write!(f, "{v:.4}"),
            StatValue::Text(v) => f.write_str(v),
            StatValue::Rows(rows) => {
                let parts: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            StatValue::Frequencies(pairs) => {
                let parts: Vec<String> =
                    pairs.iter().map(|(v, n)| format!("{v} ({n})")).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// Flat key -> value statistics map. Keys are type-dependent.
pub type Statistics = BTreeMap<String, StatValue>;

use serde::{Deserialize, Serialize};

/// Which validation step a value failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Datatype,
    Constraint,
}

/// A corrective replacement proposed for one violated value.
///
/// `suggested` is the null literal when no safe correction exists; callers
/// detect a failed correction by comparing against it, never via an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// 1-based row number, stable for the lifetime of a column report.
    pub row: usize,
    pub original: String,
    pub suggested: String,
}

impl Suggestion {
    pub fn corrects(&self, null_literal: &str) -> bool {
        self.suggested != null_literal
    }
}

use serde::{Deserialize, Serialize};

/// Semantic type of a column.
///
/// Distinct from [`StorageType`]: a `Nominal` column may be stored as
/// `string`, `integer` or `boolean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MipType {
    Date,
    Integer,
    Numerical,
    Nominal,
    Text,
}

impl MipType {
    /// Rank in the specificity order used for inference tie-breaks.
    ///
    /// Lower rank wins: date > integer > numerical > text. Nominal never
    /// competes here because it only appears after cardinality description.
    pub fn priority(self) -> u8 {
        match self {
            MipType::Date => 0,
            MipType::Integer => 1,
            MipType::Numerical => 2,
            MipType::Nominal | MipType::Text => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MipType::Date => "date",
            MipType::Integer => "integer",
            MipType::Numerical => "numerical",
            MipType::Nominal => "nominal",
            MipType::Text => "text",
        }
    }
}

impl std::fmt::Display for MipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Integer,
    Number,
    String,
    Boolean,
    Date,
}

impl StorageType {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::Integer => "integer",
            StorageType::Number => "number",
            StorageType::String => "string",
            StorageType::Boolean => "boolean",
            StorageType::Date => "date",
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

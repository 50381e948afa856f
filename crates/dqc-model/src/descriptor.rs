//! Field and schema descriptors.
//!
//! A field descriptor pairs the declared storage type with the semantic
//! MIPType and an optional constraint set. Constraints, when present, are
//! authoritative and never re-inferred.

use serde::{Deserialize, Serialize};

use crate::enums::{MipType, StorageType};
use crate::missing::MissingValues;

/// Format used when a field carries no date template.
pub const DEFAULT_FORMAT: &str = "default";

/// Declared constraints for one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Allowed values, sorted and deduplicated.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.enum_values.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.required.is_none()
            && self.unique.is_none()
    }

    pub fn with_enum(values: Vec<String>) -> Self {
        Self {
            enum_values: Some(values),
            ..Self::default()
        }
    }
}

/// Descriptor for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Declared storage type, serialized as `type`.
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// Date template (strftime-style) or `"default"`.
    pub format: String,
    #[serde(rename = "MIPType")]
    pub miptype: MipType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    /// Non-numeric suffix observed on integer/numerical values (units etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Decimal separator for numerical fields (`.` or `,`).
    #[serde(rename = "decimalChar", skip_serializing_if = "Option::is_none")]
    pub decimal_char: Option<char>,
}

impl FieldDescriptor {
    /// Plain text descriptor with no constraints.
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            storage_type: StorageType::String,
            format: DEFAULT_FORMAT.to_string(),
            miptype: MipType::Text,
            constraints: None,
            suffix: None,
            decimal_char: None,
        }
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        self.constraints
            .as_ref()
            .and_then(|c| c.enum_values.as_deref())
    }
}

/// Inferred or supplied schema for a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub fields: Vec<FieldDescriptor>,
    #[serde(rename = "missingValues")]
    pub missing_values: MissingValues,
}

impl SchemaDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_serializes_with_schema_keys() {
        let field = FieldDescriptor {
            name: "age".to_string(),
            storage_type: StorageType::Integer,
            format: DEFAULT_FORMAT.to_string(),
            miptype: MipType::Integer,
            constraints: Some(Constraints {
                minimum: Some(0.0),
                maximum: Some(120.0),
                ..Constraints::default()
            }),
            suffix: None,
            decimal_char: None,
        };
        let json = serde_json::to_value(&field).expect("serialize field");
        assert_eq!(json["type"], "integer");
        assert_eq!(json["MIPType"], "integer");
        assert_eq!(json["constraints"]["minimum"], 0.0);
        assert!(json.get("suffix").is_none());
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = SchemaDescriptor {
            fields: vec![FieldDescriptor::text("diagnosis")],
            missing_values: MissingValues::default(),
        };
        let json = serde_json::to_string(&schema).expect("serialize schema");
        assert!(json.contains("missingValues"));
        let round: SchemaDescriptor = serde_json::from_str(&json).expect("deserialize schema");
        assert_eq!(round, schema);
    }

    #[test]
    fn enum_constraint_serializes_as_enum() {
        let constraints = Constraints::with_enum(vec!["F".to_string(), "M".to_string()]);
        let json = serde_json::to_value(&constraints).expect("serialize constraints");
        assert_eq!(json["enum"][0], "F");
    }
}

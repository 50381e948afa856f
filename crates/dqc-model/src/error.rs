use thiserror::Error;

/// A single value failed validation against its field descriptor.
///
/// Both kinds are caught at the column-report boundary and turned into
/// violation-bucket membership; they never surface to collaborators during
/// normal validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The raw value cannot be cast to the field's declared storage type.
    #[error("value {value:?} is not a valid {storage_type}")]
    DataType { value: String, storage_type: String },
    /// The value casts cleanly but fails a declared constraint.
    #[error("value {value:?} violates constraint: {detail}")]
    Constraint { value: String, detail: String },
}

impl ValueError {
    pub fn is_datatype(&self) -> bool {
        matches!(self, ValueError::DataType { .. })
    }
}

/// Fatal misconfiguration while building a table report.
///
/// Never retried; the caller must fix the configuration and restart.
#[derive(Debug, Error)]
pub enum TableReportError {
    #[error("identifier column {0:?} is not part of the schema")]
    UnknownIdColumn(String),
    #[error("identifier column index {index} out of range for {columns} columns")]
    IdColumnOutOfRange { index: usize, columns: usize },
    #[error("schema has {fields} fields but the dataset has {columns} columns")]
    ColumnCountMismatch { fields: usize, columns: usize },
    #[error("schema contains no fields")]
    EmptySchema,
}

pub type Result<T> = std::result::Result<T, TableReportError>;

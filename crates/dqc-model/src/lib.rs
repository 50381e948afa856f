//! Core data model for the tabular quality-control engine.

pub mod descriptor;
pub mod enums;
pub mod error;
pub mod missing;
pub mod stats;
pub mod suggestion;

pub use descriptor::{Constraints, DEFAULT_FORMAT, FieldDescriptor, SchemaDescriptor};
pub use enums::{MipType, StorageType};
pub use error::{Result, TableReportError, ValueError};
pub use missing::{DEFAULT_MISSING_VALUES, MissingValues};
pub use stats::{StatValue, Statistics};
pub use suggestion::{Suggestion, ViolationKind};

//! Column and table quality reports.

pub mod column;
pub mod summary;
pub mod table;

pub use column::{ColumnReport, CorrectionCounts, ReportState};
pub use summary::{ColumnSummary, TableSummary};
pub use table::{BUCKET_LABELS, BucketCounts, RowMetrics, TableReport};

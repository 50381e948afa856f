//! Library components for the data quality control CLI.

pub mod logging;
pub mod summary;

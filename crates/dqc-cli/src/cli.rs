//! CLI argument definitions for the data quality control tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "mip-dqc",
    version,
    about = "Data quality control for tabular datasets",
    long_about = "Infer column types from tabular data, validate values against a schema,\n\
                  suggest corrections for violations, and map columns to common data\n\
                  elements by similarity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Infer a schema from a CSV dataset and print it as JSON.
    Infer(InferArgs),

    /// Validate a CSV dataset and report violations and corrections.
    Validate(ValidateArgs),

    /// Suggest common-data-element mappings for a dataset's columns.
    SuggestCde(SuggestCdeArgs),
}

#[derive(Parser)]
pub struct InferArgs {
    /// Path to the CSV dataset.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    #[command(flatten)]
    pub inference: InferenceOpts,

    /// Write the schema JSON to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the CSV dataset.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Schema JSON to validate against (inferred from the data when absent).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Identifier column for row-level metrics (default: first column).
    #[arg(long = "id-column", value_name = "NAME")]
    pub id_column: Option<String>,

    /// Merge correction suggestions into the reported statistics.
    #[arg(long = "apply-corrections")]
    pub apply_corrections: bool,

    /// Write the corrected dataset as CSV.
    #[arg(long = "corrected-csv", value_name = "PATH")]
    pub corrected_csv: Option<PathBuf>,

    /// Write the full report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Outlier threshold in sample standard deviations.
    #[arg(long = "outlier-sigma", value_name = "K", default_value_t = 3.0)]
    pub outlier_sigma: f64,

    #[command(flatten)]
    pub inference: InferenceOpts,
}

#[derive(Parser)]
pub struct SuggestCdeArgs {
    /// Path to the CSV dataset.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// CDE dictionary JSON.
    #[arg(long = "dictionary", value_name = "PATH")]
    pub dictionary: PathBuf,

    /// Schema JSON to validate against (inferred from the data when absent).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Minimum similarity score for a suggestion.
    #[arg(long = "threshold", value_name = "T", default_value_t = dqc_cde::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    #[command(flatten)]
    pub inference: InferenceOpts,
}

/// Schema inference knobs shared by every subcommand.
#[derive(Parser)]
pub struct InferenceOpts {
    /// Number of rows sampled per column during inference.
    #[arg(long = "sample-rows", value_name = "N", default_value_t = 100)]
    pub sample_rows: usize,

    /// Distinct-value threshold below which a column becomes nominal.
    #[arg(long = "max-levels", value_name = "N", default_value_t = 10)]
    pub max_levels: usize,

    /// Treat only the empty string as missing, not the full NA vocabulary.
    #[arg(long = "na-empty-only")]
    pub na_empty_only: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

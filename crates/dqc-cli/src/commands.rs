use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use dqc_cde::{CdeDictionary, CdeSuggestion};
use dqc_infer::{InferOptions, infer_schema};
use dqc_ingest::{CsvTable, read_csv_table};
use dqc_model::SchemaDescriptor;
use dqc_report::{TableReport, TableSummary};

use crate::cli::{InferArgs, InferenceOpts, SuggestCdeArgs, ValidateArgs};

pub fn run_infer(args: &InferArgs) -> Result<()> {
    let table = read_table(&args.dataset)?;
    let schema = infer_schema(&table.headers, &table.rows, &infer_options(&args.inference));
    let json = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("write schema to {}", path.display()))?;
            info!(path = %path.display(), "schema written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_validate(args: &ValidateArgs) -> Result<TableSummary> {
    let table = read_table(&args.dataset)?;
    let schema = load_or_infer_schema(&table, args.schema.as_deref(), &args.inference)?;
    let id_column = args
        .id_column
        .clone()
        .unwrap_or_else(|| table.headers[0].clone());

    let spinner = progress_spinner(format!("validating {} columns", table.headers.len()));
    let mut report = TableReport::with_outlier_sigma(
        table.headers.clone(),
        table.columns(),
        &schema,
        &id_column,
        args.outlier_sigma,
    )?;
    spinner.finish_and_clear();

    if args.apply_corrections {
        report.apply_corrections();
    }
    if let Some(path) = &args.corrected_csv {
        report
            .export_corrected_to_path(path)
            .with_context(|| format!("write corrected csv to {}", path.display()))?;
        info!(path = %path.display(), "corrected dataset written");
    }

    let summary = TableSummary::from_report(&report);
    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary).context("serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("write report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }
    Ok(summary)
}

pub fn run_suggest_cde(args: &SuggestCdeArgs) -> Result<Vec<(String, Option<CdeSuggestion>)>> {
    let table = read_table(&args.dataset)?;
    let dictionary = CdeDictionary::load(&args.dictionary)?;
    if dictionary.is_empty() {
        bail!("CDE dictionary is empty: {}", args.dictionary.display());
    }
    let schema = load_or_infer_schema(&table, args.schema.as_deref(), &args.inference)?;
    let id_column = table.headers[0].clone();
    let report = TableReport::new(table.headers.clone(), table.columns(), &schema, &id_column)?;

    let bar = ProgressBar::new(report.columns().len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("invalid progress template")?,
    );
    let mut suggestions = Vec::with_capacity(report.columns().len());
    for column in report.columns() {
        bar.set_message(column.name().to_string());
        suggestions.push((
            column.name().to_string(),
            dictionary.suggest_for_report(column, args.threshold),
        ));
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(suggestions)
}

fn read_table(path: &Path) -> Result<CsvTable> {
    let table = read_csv_table(path)?;
    if table.is_empty() {
        bail!("dataset has no columns: {}", path.display());
    }
    Ok(table)
}

fn load_or_infer_schema(
    table: &CsvTable,
    schema_path: Option<&Path>,
    opts: &InferenceOpts,
) -> Result<SchemaDescriptor> {
    match schema_path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read schema from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parse schema from {}", path.display()))
        }
        None => Ok(infer_schema(
            &table.headers,
            &table.rows,
            &infer_options(opts),
        )),
    }
}

fn infer_options(opts: &InferenceOpts) -> InferOptions {
    InferOptions {
        sample_rows: opts.sample_rows,
        maxlevels: opts.max_levels,
        na_empty_strings_only: opts.na_empty_only,
        ..InferOptions::default()
    }
}

fn progress_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

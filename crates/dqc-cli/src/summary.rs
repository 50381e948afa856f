//! Console rendering of validation reports and CDE suggestions.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dqc_cde::CdeSuggestion;
use dqc_report::{BUCKET_LABELS, TableSummary};

pub fn print_table_summary(summary: &TableSummary) {
    println!(
        "Rows: {}   Columns: {}   Id column: {}",
        summary.total_rows, summary.total_columns, summary.id_column
    );
    let metrics = &summary.row_metrics;
    println!(
        "Fully filled rows: {}   Id missing: {}   Only id filled: {}",
        metrics.fully_filled, metrics.id_missing, metrics.only_id_filled
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("MIPType"),
        header_cell("Type"),
        header_cell("Nulls"),
        header_cell("Valid"),
        header_cell("Datatype"),
        header_cell("Constraint"),
        header_cell("Corrected"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in &summary.columns {
        let corrected =
            column.datatype_corrections.corrected + column.constraint_corrections.corrected;
        let failed = column.datatype_corrections.failed + column.constraint_corrections.failed;
        table.add_row(vec![
            Cell::new(&column.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&column.miptype),
            Cell::new(&column.storage_type),
            plain_count(column.null_rows),
            Cell::new(column.valid_rows),
            violation_cell(column.datatype_violations),
            violation_cell(column.constraint_violations),
            count_cell(corrected, Color::Green),
            count_cell(failed, Color::Yellow),
        ]);
    }
    println!("{table}");
    print_bucket_table(summary);
}

fn print_bucket_table(summary: &TableSummary) {
    let mut table = Table::new();
    let mut header = vec![header_cell("Coverage")];
    header.extend(BUCKET_LABELS.iter().map(|label| header_cell(label)));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 1..=BUCKET_LABELS.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut filled = vec![Cell::new("Filled columns")];
    filled.extend(
        summary
            .row_metrics
            .filled_buckets
            .0
            .iter()
            .map(|count| plain_count(*count)),
    );
    table.add_row(filled);

    let mut valid = vec![Cell::new("Valid columns")];
    valid.extend(
        summary
            .row_metrics
            .valid_buckets
            .0
            .iter()
            .map(|count| plain_count(*count)),
    );
    table.add_row(valid);

    println!();
    println!("Row coverage:");
    println!("{table}");
}

pub fn print_cde_suggestions(rows: &[(String, Option<CdeSuggestion>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("CDE code"),
        header_cell("Concept path"),
        header_cell("Score"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for (column, suggestion) in rows {
        match suggestion {
            Some(suggestion) => table.add_row(vec![
                Cell::new(column)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(&suggestion.code)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
                Cell::new(&suggestion.concept_path),
                Cell::new(format!("{:.3}", suggestion.score)),
            ]),
            None => table.add_row(vec![
                Cell::new(column)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn violation_cell(count: usize) -> Cell {
    count_cell(count, Color::Red)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn plain_count<T: ToString>(value: T) -> Cell {
    Cell::new(value)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

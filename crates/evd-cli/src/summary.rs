use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use evd_cli::types::{ClinGenRunResult, RunResult};
use evd_map::ReconcileStats;

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_file.display());
    if let Some(path) = &result.saved_mappings {
        println!("Mapping dictionary: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows read"), Cell::new(result.rows_read)]);
    table.add_row(vec![Cell::new("Rows kept"), Cell::new(result.rows_kept)]);
    table.add_row(vec![
        Cell::new("Rows without phenotype"),
        count_cell(Some(result.rows_without_phenotype), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Distinct phenotypes"),
        Cell::new(result.phenotypes),
    ]);
    table.add_row(vec![
        Cell::new("Literature pairs"),
        Cell::new(result.literature_pairs),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates dropped"),
        dim_cell(result.duplicates_dropped),
    ]);
    table.add_row(vec![
        Cell::new("Mapped records"),
        match result.mapping {
            Some(_) => Cell::new(result.mapped_records),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Records written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.records_written).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(stats) = &result.mapping {
        print_mapping_table(stats);
    }
}

pub fn print_clingen_summary(result: &ClinGenRunResult) {
    println!("Output: {}", result.output_file.display());
    if let Some(path) = &result.saved_mappings {
        println!("Mapping dictionary: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Curations read"), Cell::new(result.rows_read)]);
    table.add_row(vec![Cell::new("Distinct diseases"), Cell::new(result.diseases)]);
    table.add_row(vec![
        Cell::new("Duplicates dropped"),
        dim_cell(result.duplicates_dropped),
    ]);
    table.add_row(vec![
        Cell::new("Mapped records"),
        match result.mapping {
            Some(_) => Cell::new(result.mapped_records),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Unmapped diseases"),
        match result.mapping {
            Some(_) => count_cell(Some(result.unmapped.len()), Color::Yellow),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Records written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.records_written).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(stats) = &result.mapping {
        print_mapping_table(stats);
    }
    if !result.unmapped.is_empty() {
        println!();
        println!("Unmapped diseases:");
        for disease in &result.unmapped {
            println!("- {} ({})", disease.label, disease.disease_id);
        }
    }
}

fn print_mapping_table(stats: &ReconcileStats) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Lookups"),
        header_cell("Cache hits"),
        header_cell("Match"),
        header_cell("Fuzzy"),
        header_cell("Unmatched"),
        header_cell("Upgraded"),
        header_cell("Failed"),
    ]);
    apply_table_style(&mut table);
    for index in 0..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.lookups),
        dim_cell(stats.cache_hits),
        count_cell(Some(stats.matched), Color::Green),
        count_cell(Some(stats.fuzzy), Color::Yellow),
        dim_cell(stats.unmatched),
        Cell::new(stats.upgraded),
        count_cell(Some(stats.failures()), Color::Red),
    ]);
    println!();
    println!("Mapping:");
    println!("{table}");

    if !stats.failed_terms.is_empty() {
        eprintln!("Lookup failures:");
        for term in &stats.failed_terms {
            eprintln!("- {term}");
        }
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
    if table.column_count() >= 2 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(70)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

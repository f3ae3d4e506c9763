use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ctr_model::{DataDictionary, FieldMetadata};

use crate::pipeline::RunSummary;

/// Warnings listed individually before the table switches to a count.
const MAX_LISTED_WARNINGS: usize = 10;

pub fn print_run_summary(summary: &RunSummary) {
    for source in &summary.sources {
        println!("Source: {source}");
    }
    println!("Output: {}", summary.output.display());
    println!("{}", run_table(summary));
    print_parse_warnings(summary);
}

pub fn run_table(summary: &RunSummary) -> Table {
    let report = &summary.report;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Result")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows"), Cell::new(report.rows)]);
    table.add_row(vec![Cell::new("Columns"), Cell::new(summary.columns)]);
    table.add_row(vec![
        Cell::new("Checkbox fields regrouped"),
        list_cell(&report.checkbox_fields),
    ]);
    table.add_row(vec![
        Cell::new("Timestamp fields reconciled"),
        list_cell(&report.timestamp_fields),
    ]);
    table.add_row(vec![
        Cell::new("Rows without timestamp"),
        count_cell(report.rows_without_timestamp, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Unparseable timestamps"),
        count_cell(report.parse_warnings.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Columns relabeled"),
        list_cell(&report.relabeled_columns),
    ]);
    table
}

fn print_parse_warnings(summary: &RunSummary) {
    let warnings = &summary.report.parse_warnings;
    if warnings.is_empty() {
        return;
    }
    eprintln!("Unparseable timestamps (treated as missing):");
    for warning in warnings.iter().take(MAX_LISTED_WARNINGS) {
        eprintln!("- {} row {}", warning.column, warning.row + 1);
    }
    if warnings.len() > MAX_LISTED_WARNINGS {
        eprintln!("- ... and {} more", warnings.len() - MAX_LISTED_WARNINGS);
    }
}

pub fn print_dictionary(dictionary: &DataDictionary, plain: bool) {
    if plain {
        print!("{}", dictionary_plain(dictionary));
    } else {
        println!("{}", dictionary_table(dictionary));
    }
}

pub fn dictionary_table(dictionary: &DataDictionary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Form"),
        header_cell("Type"),
        header_cell("Label"),
        header_cell("Choices"),
    ]);
    apply_table_style(&mut table);
    for field in &dictionary.fields {
        table.add_row(vec![
            Cell::new(&field.field_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&field.form_name),
            Cell::new(field.field_type.as_str()),
            Cell::new(&field.field_label),
            choices_cell(field),
        ]);
    }
    table
}

/// Tab-separated dictionary, one field per line, header first.
pub fn dictionary_plain(dictionary: &DataDictionary) -> String {
    let mut out = String::from("field\tform\ttype\tlabel\tchoices\n");
    for field in &dictionary.fields {
        let choices = choices_text(field);
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            field.field_name,
            field.form_name,
            field.field_type.as_str(),
            single_line(&field.field_label),
            if choices.is_empty() { "-" } else { choices.as_str() },
        ));
    }
    out
}

fn choices_text(field: &FieldMetadata) -> String {
    field
        .choices()
        .iter()
        .map(|choice| format!("{}={}", choice.code, choice.label))
        .collect::<Vec<_>>()
        .join("; ")
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn choices_cell(field: &FieldMetadata) -> Cell {
    let text = choices_text(field);
    if text.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(text)
    }
}

fn apply_table_style(table: &mut Table) {
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

fn list_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(values.join(", "))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

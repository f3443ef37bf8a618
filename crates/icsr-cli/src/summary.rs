//! Terminal tables for run results and code lists.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use icsr_model::{CodeEntry, CodeList, IssueKind, ValidationIssue};

use crate::types::{RecordOutcome, RunResult};

/// Print the record table and, when there are any, the issue table.
///
/// `to_stderr` keeps stdout free for a document written there.
pub fn print_summary(result: &RunResult, to_stderr: bool) {
    let mut lines = vec![format!("Input: {}", result.input.display())];
    if let Some(path) = &result.output {
        lines.push(format!("Output: {}", path.display()));
    }
    lines.push(record_table(result).to_string());
    if let Some(table) = issue_table(&result.records) {
        lines.push(String::new());
        lines.push("Issues:".to_string());
        lines.push(table.to_string());
    }
    for line in lines {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

/// One row per record with its status and issue counts.
pub fn record_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Safety report"),
        header_cell("Status"),
        header_cell("Structural"),
        header_cell("Business"),
        header_cell("Referential"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for column in 3..6 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut totals = [0usize; 3];
    for record in &result.records {
        let counts = kind_counts(record);
        for (total, count) in totals.iter_mut().zip(counts) {
            *total += count.unwrap_or(0);
        }
        table.add_row(vec![
            Cell::new(record.index),
            report_id_cell(record.safety_report_id.as_deref()),
            status_cell(record),
            count_cell(counts[0], Color::Red),
            count_cell(counts[1], Color::Yellow),
            count_cell(counts[2], Color::Magenta),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} {}", result.records.len(), result.command))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        failed_cell(result.failed()),
        count_cell(Some(totals[0]), Color::Red).add_attribute(Attribute::Bold),
        count_cell(Some(totals[1]), Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(Some(totals[2]), Color::Magenta).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Every issue of every record, or `None` when there are none.
pub fn issue_table(records: &[RecordOutcome]) -> Option<Table> {
    let mut rows: Vec<(usize, &ValidationIssue)> = records
        .iter()
        .flat_map(|record| {
            record
                .report
                .iter()
                .flat_map(|report| report.issues.iter())
                .map(move |issue| (record.index, issue))
        })
        .collect();
    let errors: Vec<(usize, &str)> = records
        .iter()
        .filter_map(|record| record.error.as_deref().map(|error| (record.index, error)))
        .collect();
    if rows.is_empty() && errors.is_empty() {
        return None;
    }
    rows.sort_by_key(|(index, issue)| (*index, kind_rank(issue.kind)));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Kind"),
        header_cell("Rule"),
        header_cell("Location"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    for (index, error) in errors {
        table.add_row(vec![
            Cell::new(index),
            Cell::new("mapping").fg(Color::Red).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(error),
        ]);
    }
    for (index, issue) in rows {
        table.add_row(vec![
            Cell::new(index),
            kind_cell(issue.kind),
            Cell::new(issue.rule_id.as_deref().unwrap_or("-")),
            Cell::new(issue.location.to_string()),
            Cell::new(&issue.message),
        ]);
    }
    Some(table)
}

/// Overview of every code list.
pub fn code_list_table(lists: &[CodeList]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("List"),
        header_cell("Element"),
        header_cell("Codes"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for list in lists {
        table.add_row(vec![
            Cell::new(list.name()).fg(Color::Cyan),
            Cell::new(list.element()),
            Cell::new(list.entries().len()),
        ]);
    }
    table
}

/// Codes and labels of one list.
pub fn code_entry_table(entries: &[CodeEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Label")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for entry in entries {
        table.add_row(vec![Cell::new(entry.code), Cell::new(entry.label)]);
    }
    table
}

fn kind_counts(record: &RecordOutcome) -> [Option<usize>; 3] {
    match &record.report {
        Some(report) => [
            Some(report.structural_count()),
            Some(report.business_count()),
            Some(report.referential_count()),
        ],
        None => [None; 3],
    }
}

fn kind_rank(kind: IssueKind) -> u8 {
    match kind {
        IssueKind::StructuralType => 0,
        IssueKind::ReferentialIntegrity => 1,
        IssueKind::BusinessRule => 2,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn report_id_cell(id: Option<&str>) -> Cell {
    match id {
        Some(id) => Cell::new(id),
        None => dim_cell("<unset>"),
    }
}

fn status_cell(record: &RecordOutcome) -> Cell {
    if record.error.is_some() {
        Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold)
    } else if record.is_ok() {
        Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("issues").fg(Color::Yellow).add_attribute(Attribute::Bold)
    }
}

fn failed_cell(failed: usize) -> Cell {
    if failed == 0 {
        Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(format!("{failed} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn kind_cell(kind: IssueKind) -> Cell {
    let color = match kind {
        IssueKind::StructuralType => Color::Red,
        IssueKind::BusinessRule => Color::Yellow,
        IssueKind::ReferentialIntegrity => Color::Magenta,
    };
    Cell::new(kind.as_str()).fg(color)
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
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
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(3)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use icsr_model::{Location, ValidationLevel, ValidationReport};

    fn outcome(index: usize, issues: Vec<ValidationIssue>) -> RecordOutcome {
        let mut report = ValidationReport::new(ValidationLevel::Business);
        report.extend(issues);
        RecordOutcome {
            index,
            safety_report_id: Some(format!("DE-ACME-{index}")),
            report: Some(report),
            error: None,
        }
    }

    #[test]
    fn test_issue_table_absent_when_clean() {
        assert!(issue_table(&[outcome(0, Vec::new())]).is_none());
    }

    #[test]
    fn test_issue_table_rows() {
        let records = vec![
            outcome(
                0,
                vec![
                    ValidationIssue::business(
                        Location::root().field("c_1_identification_case_safety_report"),
                        "C.1.11.2 is required when C.1.11.1 is set",
                    )
                    .with_rule("C.1.11.2"),
                ],
            ),
            RecordOutcome {
                index: 1,
                safety_report_id: None,
                report: None,
                error: Some("template slot missing".to_string()),
            },
        ];
        let table = issue_table(&records).unwrap();
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("C.1.11.2"));
        assert!(rendered.contains("template slot missing"));
    }

    #[test]
    fn test_record_table_totals() {
        let result = RunResult {
            command: "validated",
            input: PathBuf::from("reports.json"),
            output: None,
            records: vec![
                outcome(0, Vec::new()),
                outcome(
                    1,
                    vec![ValidationIssue::structural(
                        Location::root().field("id"),
                        "bad value",
                    )],
                ),
            ],
        };
        let table = record_table(&result);
        assert_eq!(table.row_iter().count(), 3);
        assert!(table.to_string().contains("1 failed"));
    }

    #[test]
    fn test_code_tables() {
        let overview = code_list_table(&CodeList::ALL);
        assert_eq!(overview.row_iter().count(), CodeList::ALL.len());
        let entries = code_entry_table(&CodeList::ReportType.entries());
        assert!(entries.to_string().contains("Spontaneous"));
    }
}

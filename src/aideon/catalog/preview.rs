use std::fmt::Write;

use crate::aideon::catalog::model::{COLUMNS, RecordTable};

/// Rows shown when no explicit limit is given.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

const MAX_CELL_WIDTH: usize = 32;

/// Renders the first `limit` records as an aligned plain-text table followed
/// by a `shown of total` line.
pub fn render(table: &RecordTable, limit: usize) -> String {
    let header: Vec<String> = COLUMNS.iter().map(|column| column.to_string()).collect();
    let rows: Vec<Vec<String>> = table
        .iter()
        .take(limit)
        .map(|record| record.cells().iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut output, &rule, &widths);
    for row in &rows {
        push_row(&mut output, row, &widths);
    }
    let _ = writeln!(output, "({} of {} records)", rows.len(), table.len());
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (index, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{cell:<width$}");
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

/// Collapses whitespace and shortens long values to keep rows on one line.
fn clip(cell: &str) -> String {
    let flat = cell.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut clipped: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

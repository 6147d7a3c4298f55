use std::path::Path;

use rust_xlsxwriter::{Table, TableColumn, Workbook, Worksheet};

use crate::aideon::catalog::error::Result;
use crate::aideon::catalog::model::{COLUMNS, RecordTable};

/// Name of the single worksheet written to catalog workbooks.
pub const SHEET_NAME: &str = "Sheet1";

const PRICE_COLUMN: u16 = 4;

/// Writes the table as a workbook to the given path.
pub fn write_workbook(path: &Path, table: &RecordTable) -> Result<()> {
    let mut workbook = build_workbook(table)?;
    workbook.save(path)?;
    Ok(())
}

/// Renders the table as the bytes of an `.xlsx` file.
pub fn to_workbook_bytes(table: &RecordTable) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(table: &RecordTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col_idx, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, *header)?;
    }

    for (row_idx, record) in table.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, cell) in record.cells().iter().enumerate() {
            let col = col_idx as u16;
            if col == PRICE_COLUMN && record.price.is_finite() {
                worksheet.write_number(row, col, record.price)?;
            } else {
                worksheet.write_string(row, col, cell)?;
            }
        }
    }

    if !table.is_empty() {
        add_filter_table(worksheet, table.len() as u32)?;
    }

    Ok(workbook)
}

fn add_filter_table(worksheet: &mut Worksheet, row_end: u32) -> Result<()> {
    let columns: Vec<TableColumn> = COLUMNS
        .iter()
        .map(|header| TableColumn::new().set_header(*header))
        .collect();
    let mut excel_table = Table::new();
    excel_table.set_autofilter(true).set_columns(&columns);

    let col_end = (COLUMNS.len() as u16).saturating_sub(1);
    worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    Ok(())
}

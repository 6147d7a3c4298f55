use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use chrono::NaiveTime;

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::model::{COLUMNS, PRICE, Record, RecordTable, parse_price, row_location};

/// Reads records from the first worksheet of a workbook following the
/// conventions produced by the [`excel_write`](crate::io::excel_write) module.
///
/// The first used row holds the column names. Columns are located by name,
/// rows with no content are skipped. Date cells are read back as ISO dates.
pub fn read_workbook(path: &Path) -> Result<RecordTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CatalogError::InvalidWorkbook("workbook has no worksheets".into()))?;
    let range = read_required_sheet(&mut workbook, &sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };
    let positions = resolve_columns(&headers)?;
    let header_row = range.start().map_or(0, |(row, _)| row as usize);

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        records.push(row_to_record(row, &positions, header_row + index + 2)?);
    }

    Ok(RecordTable::from_records(records))
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| CatalogError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(CatalogError::from)?;
    Ok(range)
}

fn resolve_columns(headers: &[String]) -> Result<[usize; 7]> {
    let mut positions = [0usize; 7];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| CatalogError::missing_field(column, "header row"))?;
    }
    Ok(positions)
}

fn row_to_record(row: &[DataType], positions: &[usize; 7], row_number: usize) -> Result<Record> {
    let location = row_location(row_number);
    let text = |column: usize| cell_to_string(row.get(positions[column]));

    Ok(Record {
        id: text(0),
        author: text(1),
        title: text(2),
        genre: text(3),
        price: cell_to_price(row.get(positions[4]), &location)?,
        publish_date: text(5),
        description: text(6),
    })
}

fn cell_to_price(cell: Option<&DataType>, location: &str) -> Result<f64> {
    match cell {
        Some(DataType::Float(value)) => Ok(*value),
        Some(DataType::Int(value)) => Ok(*value as f64),
        Some(DataType::String(value)) => parse_price(value, location),
        Some(DataType::Empty) | None => Err(CatalogError::malformed_number(PRICE, "", location)),
        Some(other) => Err(CatalogError::malformed_number(
            PRICE,
            other.to_string(),
            location,
        )),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(date @ (DataType::DateTime(_) | DataType::DateTimeIso(_))) => date
            .as_datetime()
            .map(|value| {
                if value.time() == NaiveTime::MIN {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            })
            .unwrap_or_else(|| date.to_string()),
        Some(other) => other.to_string(),
    }
}

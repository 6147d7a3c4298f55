use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::model::{COLUMNS, Record, RecordTable, parse_price, row_location};

/// Writes the table as CSV to the given path.
pub fn write_csv_file(path: &Path, table: &RecordTable) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, table)
}

/// Renders the table as CSV bytes.
pub fn to_csv_bytes(table: &RecordTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, table)?;
    Ok(buffer)
}

/// Writes a header row with [`COLUMNS`] followed by one row per record.
pub fn write_csv<W: Write>(writer: W, table: &RecordTable) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(COLUMNS).map_err(serialization)?;
    for record in table {
        csv_writer.write_record(record.cells()).map_err(serialization)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads CSV from the given path.
pub fn read_csv_file(path: &Path) -> Result<RecordTable> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Rebuilds a table from CSV with a header row.
///
/// Columns are located by header name, so their order may differ from
/// [`COLUMNS`] and unknown columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<RecordTable> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers().map_err(malformed)?.clone();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(malformed)?;
        records.push(layout.record(&row, index + 2)?);
    }

    Ok(RecordTable::from_records(records))
}

/// Position of every required column inside the source header.
struct ColumnLayout {
    positions: [usize; 7],
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 7];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| CatalogError::missing_field(column, "header row"))?;
        }
        Ok(Self { positions })
    }

    fn record(&self, row: &StringRecord, row_number: usize) -> Result<Record> {
        let location = row_location(row_number);
        let cell = |column: usize| -> Result<String> {
            row.get(self.positions[column])
                .map(str::to_string)
                .ok_or_else(|| CatalogError::missing_field(COLUMNS[column], location.clone()))
        };

        Ok(Record {
            id: cell(0)?,
            author: cell(1)?,
            title: cell(2)?,
            genre: cell(3)?,
            price: parse_price(&cell(4)?, &location)?,
            publish_date: cell(5)?,
            description: cell(6)?,
        })
    }
}

fn serialization(err: csv::Error) -> CatalogError {
    CatalogError::Serialization(err.to_string())
}

fn malformed(err: csv::Error) -> CatalogError {
    CatalogError::MalformedDocument(err.to_string())
}

//! Pushes a record table to a remote spreadsheet.
//!
//! The orchestration in [`Publisher`] is independent of the transport: it
//! talks to the remote service through the [`SheetsApi`] trait, implemented
//! for Google Sheets by [`google::GoogleSheetsClient`].

pub mod credentials;
pub mod google;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::model::{COLUMNS, RecordTable, format_price};

pub use credentials::ServiceAccountCredentials;
pub use google::{ClientConfig, GoogleSheetsClient};

/// Permission scopes requested for the service account.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// Title of the worksheet created when the spreadsheet has none.
pub const DEFAULT_WORKSHEET: &str = "Sheet1";
/// Grid size of a newly created worksheet.
pub const DEFAULT_ROWS: u32 = 100;
pub const DEFAULT_COLUMNS: u32 = 20;

const SHEET_ID_MARKER: &str = "/d/";

/// Remote operations needed to replace the content of a worksheet.
pub trait SheetsApi {
    /// Returns the title of the first worksheet, if the spreadsheet has any.
    fn first_worksheet(&self, sheet_id: &str) -> Result<Option<String>>;

    /// Creates a worksheet and returns its title.
    fn add_worksheet(&self, sheet_id: &str, title: &str, rows: u32, columns: u32)
    -> Result<String>;

    /// Removes every value from the worksheet.
    fn clear_worksheet(&self, sheet_id: &str, worksheet: &str) -> Result<()>;

    /// Writes `values` row by row starting at the top-left cell.
    fn update_worksheet(&self, sheet_id: &str, worksheet: &str, values: &[Vec<Value>])
    -> Result<()>;
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishSummary {
    pub sheet_id: String,
    pub worksheet: String,
    /// Rows written, header included.
    pub rows_written: usize,
}

/// Replaces the first worksheet of a spreadsheet with a record table.
pub struct Publisher<A> {
    api: A,
}

impl<A: SheetsApi> Publisher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Writes a header row with [`COLUMNS`] followed by one row per record to
    /// the spreadsheet addressed by `sheet_url`.
    ///
    /// The worksheet is cleared before the write, so a failure between the two
    /// calls leaves it empty.
    #[instrument(level = "info", skip_all, fields(records = table.len()))]
    pub fn publish(&self, table: &RecordTable, sheet_url: &str) -> Result<PublishSummary> {
        let sheet_id = extract_sheet_id(sheet_url)?;

        let worksheet = match self.api.first_worksheet(&sheet_id)? {
            Some(title) => title,
            None => {
                info!(%sheet_id, "spreadsheet has no worksheet, creating one");
                self.api.add_worksheet(
                    &sheet_id,
                    DEFAULT_WORKSHEET,
                    DEFAULT_ROWS,
                    DEFAULT_COLUMNS,
                )?
            }
        };

        let values = table_values(table);
        debug!(%sheet_id, %worksheet, rows = values.len(), "replacing worksheet content");
        self.api.clear_worksheet(&sheet_id, &worksheet)?;
        self.api.update_worksheet(&sheet_id, &worksheet, &values)?;
        info!(%sheet_id, %worksheet, rows = values.len(), "worksheet updated");

        Ok(PublishSummary {
            sheet_id,
            worksheet,
            rows_written: values.len(),
        })
    }
}

/// Extracts the spreadsheet identifier from a sheet URL such as
/// `https://docs.google.com/spreadsheets/d/<id>/edit`.
pub fn extract_sheet_id(url: &str) -> Result<String> {
    let (_, rest) = url.split_once(SHEET_ID_MARKER).ok_or_else(|| {
        CatalogError::InvalidTarget(format!("no '{SHEET_ID_MARKER}' segment in '{url}'"))
    })?;
    let id = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if id.is_empty() {
        return Err(CatalogError::InvalidTarget(format!(
            "empty spreadsheet identifier in '{url}'"
        )));
    }
    Ok(id.to_string())
}

/// Converts the table into sheet rows: the header, then one row per record.
/// Prices are sent as numbers when they fit in JSON.
pub fn table_values(table: &RecordTable) -> Vec<Vec<Value>> {
    let mut values = Vec::with_capacity(table.len() + 1);
    values.push(
        COLUMNS
            .iter()
            .map(|column| Value::String(column.to_string()))
            .collect(),
    );

    for record in table {
        let price = serde_json::Number::from_f64(record.price)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(format_price(record.price)));
        values.push(vec![
            Value::String(record.id.clone()),
            Value::String(record.author.clone()),
            Value::String(record.title.clone()),
            Value::String(record.genre.clone()),
            price,
            Value::String(record.publish_date.clone()),
            Value::String(record.description.clone()),
        ]);
    }

    values
}

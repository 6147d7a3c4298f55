use crate::aideon::catalog::error::{CatalogError, Result};

/// Column order shared by every tabular representation of the catalog.
pub const COLUMNS: [&str; 7] = [
    "id",
    "author",
    "title",
    "genre",
    "price",
    "publish_date",
    "description",
];

/// Name of the only numeric field of a record.
pub const PRICE: &str = "price";

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Identifier carried as the `id` attribute of the `book` element.
    pub id: String,
    pub author: String,
    pub title: String,
    pub genre: String,
    pub price: f64,
    pub publish_date: String,
    /// Free text, stored without leading or trailing whitespace.
    pub description: String,
}

impl Record {
    /// Renders the record as text cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.author.clone(),
            self.title.clone(),
            self.genre.clone(),
            format_price(self.price),
            self.publish_date.clone(),
            self.description.clone(),
        ]
    }
}

/// Ordered, immutable collection of records.
///
/// Row order is document order on import and output order on export. A table
/// is never edited in place: edits produce a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<Record>,
}

impl RecordTable {
    /// Builds a table from records in the given order.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Converts a price into its default textual form.
///
/// Whole numbers keep a single decimal (`8.0`), other values use the shortest
/// representation that parses back to the same `f64` (`12.5`). Very large or
/// very small magnitudes switch to exponent notation (`1e+20`).
pub fn format_price(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Parses price text, ignoring surrounding whitespace.
pub fn parse_price(text: &str, location: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::malformed_number(PRICE, text, location));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CatalogError::malformed_number(PRICE, text, location))
}

/// Describes a `book` element for error messages.
pub(crate) fn book_location(position: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("book #{position} (id '{id}')"),
        None => format!("book #{position}"),
    }
}

/// Describes a data row of a tabular source for error messages. `row` counts
/// the header as row 1.
pub(crate) fn row_location(row: usize) -> String {
    format!("row {row}")
}

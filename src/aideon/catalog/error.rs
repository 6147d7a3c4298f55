use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error type covering the different failure cases that can occur when the
/// tool imports, exports, or publishes a book catalog.
///
/// Every variant renders as a single human readable line so the command line
/// front end can print it verbatim.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The input is not a well-formed document (XML syntax, unbalanced tags,
    /// missing root element, broken CSV framing).
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A required attribute, child element, or column is absent.
    #[error("missing required field '{field}' in {location}")]
    MissingField { field: String, location: String },

    /// A numeric field holds text that cannot be parsed as a number.
    #[error("invalid number '{value}' for field '{field}' in {location}")]
    MalformedNumber {
        field: String,
        value: String,
        location: String,
    },

    /// The serializer could not emit the document.
    #[error("failed to serialize catalog: {0}")]
    Serialization(String),

    /// The publish target could not be resolved into a spreadsheet.
    #[error("invalid spreadsheet target: {0}")]
    InvalidTarget(String),

    /// The credential document was unusable or rejected by the service.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The remote service failed while the sheet was being written.
    #[error("failed to write to the remote spreadsheet: {0}")]
    RemoteWriteFailure(String),

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the CLI receives an unsupported conversion request.
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl CatalogError {
    pub(crate) fn missing_field(field: &str, location: impl Into<String>) -> Self {
        CatalogError::MissingField {
            field: field.to_string(),
            location: location.into(),
        }
    }

    pub(crate) fn malformed_number(
        field: &str,
        value: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        CatalogError::MalformedNumber {
            field: field.to_string(),
            value: value.into(),
            location: location.into(),
        }
    }
}

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::aideon::catalog::error::Result;
use crate::aideon::catalog::io::{csv_io, excel_read, excel_write, xml_read, xml_write};
use crate::aideon::catalog::publish::{
    self, ClientConfig, GoogleSheetsClient, PublishSummary, Publisher, ServiceAccountCredentials,
};

/// Converts a catalog document into a CSV file.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn xml_to_csv(input: &Path, output: &Path) -> Result<()> {
    let table = xml_read::read_catalog(input)?;
    info!(record_count = table.len(), "parsed records from catalog document");
    csv_io::write_csv_file(output, &table)
}

/// Converts a catalog document into an Excel workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn xml_to_excel(input: &Path, output: &Path) -> Result<()> {
    let table = xml_read::read_catalog(input)?;
    info!(record_count = table.len(), "parsed records from catalog document");
    excel_write::write_workbook(output, &table)
}

/// Rebuilds a catalog document from an edited CSV file.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn csv_to_xml(input: &Path, output: &Path) -> Result<()> {
    let table = csv_io::read_csv_file(input)?;
    info!(record_count = table.len(), "read records from CSV");
    xml_write::write_catalog(output, &table)
}

/// Rebuilds a catalog document from an edited Excel workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn excel_to_xml(input: &Path, output: &Path) -> Result<()> {
    let table = excel_read::read_workbook(input)?;
    info!(record_count = table.len(), "read records from workbook");
    xml_write::write_catalog(output, &table)
}

/// Re-emits a catalog document through the importer and exporter.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn xml_to_xml(input: &Path, output: &Path) -> Result<()> {
    let table = xml_read::read_catalog(input)?;
    info!(record_count = table.len(), "parsed records from catalog document");
    xml_write::write_catalog(output, &table)
}

/// Publishes a catalog document to the first worksheet of a Google sheet.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), credentials = %credentials.display())
)]
pub fn publish_xml(
    input: &Path,
    sheet_url: &str,
    credentials: &Path,
    config: &ClientConfig,
) -> Result<PublishSummary> {
    let sheet_id = publish::extract_sheet_id(sheet_url)?;
    debug!(%sheet_id, "resolved spreadsheet identifier");

    let table = xml_read::read_catalog(input)?;
    info!(record_count = table.len(), "parsed records from catalog document");

    let credentials = ServiceAccountCredentials::from_path(credentials)?;
    let client = GoogleSheetsClient::authorize(&credentials, config)?;
    Publisher::new(client).publish(&table, sheet_url)
}

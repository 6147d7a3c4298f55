mod common;

use std::fs;

use aideon_catalog::io::{csv_io, xml_read};
use aideon_catalog::model::RecordTable;
use aideon_catalog::publish::ClientConfig;
use aideon_catalog::{CatalogError, sync};
use common::{TWO_BOOKS, assert_tables_match};
use tempfile::tempdir;

#[test]
fn xml_csv_xml_roundtrip_preserves_records() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    let csv_path = temp_dir.path().join("catalog.csv");
    let restored_path = temp_dir.path().join("edited_data.xml");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");

    sync::xml_to_csv(&xml_path, &csv_path).expect("XML to CSV");
    sync::csv_to_xml(&csv_path, &restored_path).expect("CSV to XML");

    let original = xml_read::read_catalog(&xml_path).expect("original read");
    let restored = xml_read::read_catalog(&restored_path).expect("restored read");
    assert_tables_match(&original, &restored);
}

#[test]
fn xml_excel_xml_roundtrip_preserves_records() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    let xlsx_path = temp_dir.path().join("catalog.xlsx");
    let restored_path = temp_dir.path().join("edited_data.xml");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");

    sync::xml_to_excel(&xml_path, &xlsx_path).expect("XML to Excel");
    sync::excel_to_xml(&xlsx_path, &restored_path).expect("Excel to XML");

    let original = xml_read::read_catalog(&xml_path).expect("original read");
    let restored = xml_read::read_catalog(&restored_path).expect("restored read");
    assert_tables_match(&original, &restored);
}

#[test]
fn csv_edits_flow_back_into_xml() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    let csv_path = temp_dir.path().join("catalog.csv");
    let restored_path = temp_dir.path().join("edited_data.xml");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");
    sync::xml_to_csv(&xml_path, &csv_path).expect("XML to CSV");

    let table = csv_io::read_csv_file(&csv_path).expect("CSV read");
    let mut records = table.into_records();
    records[1].price = 9.75;
    records.reverse();
    csv_io::write_csv_file(&csv_path, &RecordTable::from_records(records))
        .expect("edited CSV written");

    sync::csv_to_xml(&csv_path, &restored_path).expect("CSV to XML");
    let restored = xml_read::read_catalog(&restored_path).expect("restored read");

    assert_eq!(restored.records()[0].id, "2");
    assert_eq!(restored.records()[0].price, 9.75);
    assert_eq!(restored.records()[1].id, "1");
}

#[test]
fn xml_reexport_normalises_prices() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    let output_path = temp_dir.path().join("normalised.xml");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");

    sync::xml_to_xml(&xml_path, &output_path).expect("XML to XML");

    let written = fs::read_to_string(&output_path).expect("output read");
    assert!(written.contains("<price>12.5</price>"));
    assert!(written.contains("<price>8.0</price>"));
}

#[test]
fn failed_import_writes_no_output() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("broken.xml");
    let csv_path = temp_dir.path().join("broken.csv");
    fs::write(&xml_path, "<catalog><book id=\"1\"><price>free</price>").expect("input written");

    let error = sync::xml_to_csv(&xml_path, &csv_path).expect_err("import fails");

    assert!(matches!(error, CatalogError::MalformedDocument(_)));
    assert!(!csv_path.exists());
}

#[test]
fn publish_with_invalid_url_stops_before_reading_credentials() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");
    let missing_credentials = temp_dir.path().join("credentials.json");

    let error = sync::publish_xml(
        &xml_path,
        "https://docs.google.com/spreadsheets/",
        &missing_credentials,
        &ClientConfig::default(),
    )
    .expect_err("URL is invalid");

    assert!(matches!(error, CatalogError::InvalidTarget(_)));
}

#[test]
fn publish_with_broken_credentials_is_an_auth_failure() {
    let temp_dir = tempdir().expect("temporary directory");
    let xml_path = temp_dir.path().join("catalog.xml");
    let credentials_path = temp_dir.path().join("credentials.json");
    fs::write(&xml_path, TWO_BOOKS).expect("catalog written");
    fs::write(&credentials_path, r#"{"client_email": "a@b.c"}"#).expect("credentials written");

    let error = sync::publish_xml(
        &xml_path,
        "https://docs.google.com/spreadsheets/d/abc/edit",
        &credentials_path,
        &ClientConfig::default(),
    )
    .expect_err("credentials are incomplete");

    assert!(matches!(error, CatalogError::AuthFailure(_)));
}

mod common;

use std::cell::RefCell;

use aideon_catalog::publish::{
    ClientConfig, DEFAULT_WORKSHEET, GoogleSheetsClient, Publisher, SCOPES, SheetsApi,
    ServiceAccountCredentials, extract_sheet_id, table_values,
};
use aideon_catalog::{CatalogError, Result};
use common::sample_table;
use serde_json::{Value, json};

const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/abc123XYZ/edit#gid=0";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    FirstWorksheet(String),
    AddWorksheet(String, String, u32, u32),
    Clear(String, String),
    Update(String, String, Vec<Vec<Value>>),
}

/// Records every call and serves canned answers.
#[derive(Default)]
struct FakeSheets {
    worksheet: Option<String>,
    fail_clear: bool,
    calls: RefCell<Vec<Call>>,
}

impl SheetsApi for FakeSheets {
    fn first_worksheet(&self, sheet_id: &str) -> Result<Option<String>> {
        self.calls
            .borrow_mut()
            .push(Call::FirstWorksheet(sheet_id.to_string()));
        Ok(self.worksheet.clone())
    }

    fn add_worksheet(&self, sheet_id: &str, title: &str, rows: u32, columns: u32) -> Result<String> {
        self.calls.borrow_mut().push(Call::AddWorksheet(
            sheet_id.to_string(),
            title.to_string(),
            rows,
            columns,
        ));
        Ok(title.to_string())
    }

    fn clear_worksheet(&self, sheet_id: &str, worksheet: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(Call::Clear(sheet_id.to_string(), worksheet.to_string()));
        if self.fail_clear {
            return Err(CatalogError::RemoteWriteFailure(
                "clearing worksheet returned 500 Internal Server Error: backend error".into(),
            ));
        }
        Ok(())
    }

    fn update_worksheet(&self, sheet_id: &str, worksheet: &str, values: &[Vec<Value>]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Update(
            sheet_id.to_string(),
            worksheet.to_string(),
            values.to_vec(),
        ));
        Ok(())
    }
}

#[test]
fn extracts_sheet_id_from_url() {
    assert_eq!(extract_sheet_id(SHEET_URL).expect("id extracted"), "abc123XYZ");
    assert_eq!(
        extract_sheet_id("https://docs.google.com/spreadsheets/d/only-id").expect("id extracted"),
        "only-id"
    );
    assert_eq!(
        extract_sheet_id("https://docs.google.com/spreadsheets/d/q-id?usp=sharing")
            .expect("id extracted"),
        "q-id"
    );
}

#[test]
fn rejects_urls_without_identifier() {
    for url in [
        "",
        "https://docs.google.com/spreadsheets/",
        "https://docs.google.com/spreadsheets/d/",
        "https://docs.google.com/spreadsheets/d//edit",
    ] {
        let error = extract_sheet_id(url).expect_err("URL is invalid");
        assert!(
            matches!(error, CatalogError::InvalidTarget(_)),
            "unexpected error for {url:?}: {error}"
        );
    }
}

#[test]
fn table_values_start_with_header_row() {
    let values = table_values(&sample_table());

    assert_eq!(values.len(), 3);
    assert_eq!(
        values[0],
        vec![
            json!("id"),
            json!("author"),
            json!("title"),
            json!("genre"),
            json!("price"),
            json!("publish_date"),
            json!("description")
        ]
    );
    assert_eq!(values[1][0], json!("bk101"));
    assert_eq!(values[1][4], json!(44.95));
    assert_eq!(values[2][4], json!(5.0));
}

#[test]
fn publish_replaces_existing_first_worksheet() {
    let api = FakeSheets {
        worksheet: Some("Books".to_string()),
        ..FakeSheets::default()
    };
    let publisher = Publisher::new(api);
    let table = sample_table();

    let summary = publisher.publish(&table, SHEET_URL).expect("published");

    assert_eq!(summary.sheet_id, "abc123XYZ");
    assert_eq!(summary.worksheet, "Books");
    assert_eq!(summary.rows_written, 3);

    let calls = publisher.api().calls.borrow();
    assert_eq!(
        *calls,
        vec![
            Call::FirstWorksheet("abc123XYZ".into()),
            Call::Clear("abc123XYZ".into(), "Books".into()),
            Call::Update("abc123XYZ".into(), "Books".into(), table_values(&table)),
        ]
    );
}

#[test]
fn publish_creates_worksheet_when_absent() {
    let publisher = Publisher::new(FakeSheets::default());

    let summary = publisher
        .publish(&sample_table(), SHEET_URL)
        .expect("published");

    assert_eq!(summary.worksheet, DEFAULT_WORKSHEET);
    let calls = publisher.api().calls.borrow();
    assert_eq!(
        calls[1],
        Call::AddWorksheet("abc123XYZ".into(), DEFAULT_WORKSHEET.into(), 100, 20)
    );
    assert!(matches!(calls[2], Call::Clear(_, _)));
    assert!(matches!(calls[3], Call::Update(_, _, _)));
}

#[test]
fn publish_rejects_invalid_target_before_any_remote_call() {
    let publisher = Publisher::new(FakeSheets::default());

    let error = publisher
        .publish(&sample_table(), "https://example.com/not-a-sheet")
        .expect_err("target is invalid");

    assert!(matches!(error, CatalogError::InvalidTarget(_)));
    assert!(publisher.api().calls.borrow().is_empty());
}

#[test]
fn publish_surfaces_remote_failures_without_writing() {
    let api = FakeSheets {
        worksheet: Some("Sheet1".to_string()),
        fail_clear: true,
        ..FakeSheets::default()
    };
    let publisher = Publisher::new(api);

    let error = publisher
        .publish(&sample_table(), SHEET_URL)
        .expect_err("clear fails");

    assert!(matches!(error, CatalogError::RemoteWriteFailure(_)));
    assert!(!error.to_string().contains('\n'));
    let calls = publisher.api().calls.borrow();
    assert!(!calls.iter().any(|call| matches!(call, Call::Update(_, _, _))));
}

#[test]
fn scopes_cover_sheets_and_drive() {
    assert_eq!(
        SCOPES,
        [
            "https://www.googleapis.com/auth/spreadsheets",
            "https://www.googleapis.com/auth/drive"
        ]
    );
}

fn credentials_json(private_key: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": "service_account",
        "project_id": "catalog-project",
        "private_key_id": "key-1",
        "private_key": private_key,
        "client_email": "uploader@catalog-project.iam.gserviceaccount.com",
        "client_id": "1234567890"
    }))
    .expect("credentials serialised")
}

#[test]
fn parses_service_account_credentials() {
    let credentials = ServiceAccountCredentials::from_json(&credentials_json("not a real key"))
        .expect("credentials parsed");

    assert_eq!(
        credentials.client_email,
        "uploader@catalog-project.iam.gserviceaccount.com"
    );
    assert_eq!(credentials.private_key_id.as_deref(), Some("key-1"));
    assert_eq!(credentials.token_uri, "https://oauth2.googleapis.com/token");
    assert!(!format!("{credentials:?}").contains("not a real key"));
}

#[test]
fn incomplete_credentials_are_an_auth_failure() {
    let documents: [&[u8]; 3] = [
        b"{",
        br#"{"private_key": "key"}"#,
        br#"{"client_email": "a@b.c", "private_key": ""}"#,
    ];

    for document in documents {
        let error = ServiceAccountCredentials::from_json(document).expect_err("unusable document");
        assert!(
            matches!(error, CatalogError::AuthFailure(_)),
            "unexpected error: {error}"
        );
    }
}

#[test]
fn unusable_private_key_fails_authorisation() {
    let credentials = ServiceAccountCredentials::from_json(&credentials_json("garbage"))
        .expect("credentials parsed");

    let error = GoogleSheetsClient::authorize(&credentials, &ClientConfig::default())
        .err()
        .expect("authorisation fails");

    assert!(
        matches!(error, CatalogError::AuthFailure(_)),
        "unexpected error: {error}"
    );
}

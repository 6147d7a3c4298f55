//! Google Sheets v4 implementation of [`SheetsApi`].

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::aideon::catalog::error::{CatalogError, Result};
use crate::aideon::catalog::publish::credentials::ServiceAccountCredentials;
use crate::aideon::catalog::publish::{SCOPES, SheetsApi};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME: Duration = Duration::from_secs(3600);

/// Transport settings for [`GoogleSheetsClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Base URL of the Sheets REST API, without trailing slash.
    pub sheets_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            sheets_base_url: SHEETS_API_BASE.to_string(),
        }
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

/// Blocking Sheets client authorised as a service account.
pub struct GoogleSheetsClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl GoogleSheetsClient {
    /// Exchanges a signed assertion for an access token and returns a client
    /// using it.
    #[instrument(level = "info", skip_all, fields(client_email = %credentials.client_email))]
    pub fn authorize(credentials: &ServiceAccountCredentials, config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(remote_failure)?;
        let base_url = Url::parse(&config.sheets_base_url).map_err(|err| {
            CatalogError::RemoteWriteFailure(format!(
                "invalid Sheets API URL '{}': {err}",
                config.sheets_base_url
            ))
        })?;

        let assertion = sign_assertion(credentials)?;
        let response = client
            .post(&credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(remote_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CatalogError::AuthFailure(format!(
                "token request returned {status}: {}",
                summarize_body(&body)
            )));
        }
        let token: TokenResponse = response
            .json()
            .map_err(|err| CatalogError::AuthFailure(format!("invalid token response: {err}")))?;
        debug!("access token obtained");

        Ok(Self {
            client,
            base_url,
            access_token: token.access_token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::RemoteWriteFailure(format!(
                    "Sheets API URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .map_err(remote_failure)?;
        check_status(response, action)
    }
}

impl SheetsApi for GoogleSheetsClient {
    fn first_worksheet(&self, sheet_id: &str) -> Result<Option<String>> {
        let mut url = self.endpoint(&["spreadsheets", sheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(title,index)");

        let response = self.send(self.client.get(url), "opening spreadsheet")?;
        let spreadsheet: SpreadsheetResponse = response.json().map_err(remote_failure)?;

        Ok(spreadsheet
            .sheets
            .into_iter()
            .min_by_key(|sheet| sheet.properties.index)
            .map(|sheet| sheet.properties.title))
    }

    fn add_worksheet(
        &self,
        sheet_id: &str,
        title: &str,
        rows: u32,
        columns: u32,
    ) -> Result<String> {
        let url = self.endpoint(&["spreadsheets", &format!("{sheet_id}:batchUpdate")])?;
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": columns }
                    }
                }
            }]
        });

        self.send(self.client.post(url).json(&body), "adding worksheet")?;
        Ok(title.to_string())
    }

    fn clear_worksheet(&self, sheet_id: &str, worksheet: &str) -> Result<()> {
        let range = format!("{}:clear", quote_sheet_title(worksheet));
        let url = self.endpoint(&["spreadsheets", sheet_id, "values", &range])?;

        self.send(self.client.post(url).json(&json!({})), "clearing worksheet")?;
        Ok(())
    }

    fn update_worksheet(
        &self,
        sheet_id: &str,
        worksheet: &str,
        values: &[Vec<Value>],
    ) -> Result<()> {
        let range = format!("{}!A1", quote_sheet_title(worksheet));
        let mut url = self.endpoint(&["spreadsheets", sheet_id, "values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        self.send(self.client.put(url).json(&body), "writing values")?;
        Ok(())
    }
}

fn sign_assertion(credentials: &ServiceAccountCredentials) -> Result<String> {
    let issued_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CatalogError::AuthFailure(format!("system clock error: {err}")))?
        .as_secs();
    let claims = AssertionClaims {
        iss: &credentials.client_email,
        scope: SCOPES.join(" "),
        aud: &credentials.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME.as_secs(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = credentials.private_key_id.clone();
    let key = EncodingKey::from_rsa_pem(credentials.private_key_pem())
        .map_err(|err| CatalogError::AuthFailure(format!("unusable private key: {err}")))?;

    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|err| CatalogError::AuthFailure(format!("failed to sign assertion: {err}")))
}

fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = format!("{action} returned {status}: {}", summarize_body(&body));
    Err(classify(status, message))
}

/// Maps a failed HTTP status onto the publish error taxonomy.
fn classify(status: StatusCode, message: String) -> CatalogError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::AuthFailure(message),
        StatusCode::NOT_FOUND => CatalogError::InvalidTarget(message),
        _ => CatalogError::RemoteWriteFailure(message),
    }
}

/// Reduces an error body to one line, preferring the API's `error.message`.
fn summarize_body(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error_description").and_then(Value::as_str))
            .or_else(|| error.as_str())
    });

    match message {
        Some(message) => message.to_string(),
        None => body.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Quotes a worksheet title for use in A1 notation.
fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn remote_failure(err: reqwest::Error) -> CatalogError {
    CatalogError::RemoteWriteFailure(err.to_string())
}

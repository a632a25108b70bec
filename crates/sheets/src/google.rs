//! Google Sheets values API client.
//!
//! Reads the whole worksheet with `values.get` and writes cells with `values.batchUpdate`
//! using `valueInputOption=RAW`, one range per cell.

use crate::{rowcol_to_a1, SheetsError, SheetsResult, TabularSink};
use intake_core::{CellUpdate, CellValue, IntakeConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Blocking client for one worksheet of one spreadsheet.
pub struct GoogleSheetsClient {
    http: reqwest::blocking::Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    access_token: String,
}

impl GoogleSheetsClient {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> SheetsResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("referral-intake/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            access_token: access_token.into(),
        })
    }

    /// Client for the spreadsheet and worksheet named in `config`.
    pub fn from_config(config: &IntakeConfig, access_token: impl Into<String>) -> SheetsResult<Self> {
        Self::new(
            config.spreadsheet_id(),
            config.worksheet(),
            access_token,
            config.request_timeout(),
        )
    }

    /// Point the client at another API root, e.g. a local emulator.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id)
        )
    }

    /// Range covering a single cell of this worksheet.
    fn cell_range(&self, row: u32, col: u32) -> SheetsResult<String> {
        Ok(format!(
            "{}!{}",
            quote_sheet_name(&self.worksheet),
            rowcol_to_a1(row, col)?
        ))
    }

    fn check(response: reqwest::blocking::Response) -> SheetsResult<reqwest::blocking::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(SheetsError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

impl TabularSink for GoogleSheetsClient {
    fn all_values(&self) -> SheetsResult<Vec<Vec<String>>> {
        let url = format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(&quote_sheet_name(&self.worksheet))
        );
        tracing::debug!(worksheet = %self.worksheet, "reading sheet values");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()?;
        let range: ValueRange = Self::check(response)?.json()?;
        Ok(range.values.into_iter().map(row_text).collect())
    }

    fn batch_update(&self, updates: &[CellUpdate]) -> SheetsResult<()> {
        let data = updates
            .iter()
            .map(|update| {
                Ok(CellRange {
                    range: self.cell_range(update.row, update.col)?,
                    values: [[update.value.clone()]],
                })
            })
            .collect::<SheetsResult<Vec<_>>>()?;

        let request = BatchUpdateRequest {
            value_input_option: "RAW",
            data,
        };
        tracing::debug!(cells = updates.len(), "sending batch update");

        let response = self
            .http
            .post(format!("{}/values:batchUpdate", self.spreadsheet_url()))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

/// Quote a worksheet name for use in a range (`Sheet 1` → `'Sheet 1'`).
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

/// Cells come back as strings, numbers or booleans depending on the sheet.
fn row_text(row: Vec<serde_json::Value>) -> Vec<String> {
    row.into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            serde_json::Value::Bool(true) => "TRUE".to_string(),
            serde_json::Value::Bool(false) => "FALSE".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest {
    value_input_option: &'static str,
    data: Vec<CellRange>,
}

#[derive(Serialize)]
struct CellRange {
    range: String,
    values: [[CellValue; 1]; 1],
}

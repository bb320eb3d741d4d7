use crate::error::{LookupError, Result};
use crate::sheets::types::*;
use crate::source::TableSource;
use log::debug;
use reqwest::{Client, Url};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Read-only client for one spreadsheet over the Sheets v4 REST API.
#[derive(Clone)]
pub struct GoogleSheetsClient {
    client: Client,
    credentials: SheetsCredentials,
    spreadsheet_id: String,
    base_url: String,
}

impl GoogleSheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, credentials: SheetsCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: SHEETS_BASE_URL.to_string(),
        }
    }

    /// Builds a client from [`LookupConfig`](crate::config::LookupConfig),
    /// preferring an access token over an API key.
    pub fn from_config(config: &crate::config::LookupConfig) -> Result<Self> {
        config.validate()?;

        let credentials = match (&config.access_token, &config.api_key) {
            (Some(token), _) => SheetsCredentials::AccessToken(token.clone()),
            (None, Some(key)) => SheetsCredentials::ApiKey(key.clone()),
            (None, None) => {
                return Err(LookupError::Authentication(
                    "no API key or access token configured".to_string(),
                ))
            }
        };

        Ok(Self::new(config.spreadsheet_id.clone(), credentials))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `.../spreadsheets/{id}/values/{'sheet'}` with the sheet quoted as an A1 range.
    pub fn values_url(&self, sheet: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/spreadsheets/{}/values",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id
        ))
        .map_err(|e| LookupError::Config(format!("Invalid Sheets API URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| LookupError::Config("Sheets API URL cannot carry a path".to_string()))?
            .push(&a1_sheet_range(sheet));

        Ok(url)
    }

    pub async fn get_all_values(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(sheet)?;
        debug!("Fetching worksheet '{}' from {}", sheet, url.path());

        let request = self.client.get(url).query(&[
            ("majorDimension", "ROWS"),
            ("valueRenderOption", "FORMATTED_VALUE"),
        ]);
        let request = match &self.credentials {
            SheetsCredentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            SheetsCredentials::AccessToken(token) => request.bearer_auth(token),
        };

        let res = request.send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(classify_api_error(sheet, status.as_u16(), &err_text));
        }

        let body: ValueRange = res.json().await?;
        Ok(body.into_rows())
    }
}

impl TableSource for GoogleSheetsClient {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.get_all_values(sheet).await
    }
}

/// Quotes a worksheet name as a whole-sheet A1 range, doubling inner quotes.
pub fn a1_sheet_range(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// Maps a failed Sheets API response onto [`LookupError`].
///
/// The API answers a missing worksheet with `400 Unable to parse range`.
pub fn classify_api_error(sheet: &str, status: u16, body: &str) -> LookupError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        404 => LookupError::WorksheetNotFound(sheet.to_string()),
        400 if message.contains("Unable to parse range") => {
            LookupError::WorksheetNotFound(sheet.to_string())
        }
        401 | 403 => LookupError::Authentication(message),
        _ => LookupError::Api { status, message },
    }
}

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, info};

use super::{SheetSource, SourceError};
use crate::config::SmartsheetConfig;
use crate::models::SheetData;

/// Blocking client for the Smartsheet REST API.
pub struct SmartsheetClient {
    http: Client,
    base_url: String,
}

impl SmartsheetClient {
    pub fn new(config: &SmartsheetConfig) -> Result<Self, SourceError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(
            |error| SourceError::Connection {
                target: config.base_url.clone(),
                detail: format!("api key is not a valid header value: {error}"),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|error| SourceError::Connection {
                target: config.base_url.clone(),
                detail: error.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    #[must_use]
    pub fn sheet_url(&self, sheet_id: &str) -> String {
        format!("{}/sheets/{sheet_id}", self.base_url)
    }
}

impl SheetSource for SmartsheetClient {
    fn fetch_sheet(&self, sheet_id: &str) -> Result<SheetData, SourceError> {
        let url = self.sheet_url(sheet_id);
        let resource = format!("sheet {sheet_id}");
        info!(sheet_id, "fetching sheet");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|error| SourceError::Transport {
                resource: resource.clone(),
                detail: error.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Api {
                resource,
                status: status.as_u16(),
                body,
            });
        }

        let sheet = response
            .json::<SheetData>()
            .map_err(|error| SourceError::Decode {
                resource,
                detail: error.to_string(),
            })?;
        debug!(
            sheet_id,
            columns = sheet.columns.len(),
            rows = sheet.rows.len(),
            "sheet decoded"
        );
        Ok(sheet)
    }
}

//! Spreadsheet values API client.

use super::{ClientError, RsvpSource, check_status, send};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// `GET {base}/v4/spreadsheets/{id}/values/{range}` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads the RSVP sheet through the spreadsheet values API.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    token: Option<String>,
}

impl SheetsClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            token,
        }
    }

    fn values_url(&self) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::NotConfigured(format!("spreadsheet base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::NotConfigured("spreadsheet base_url".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }
}

/// Cells come back as strings, but numbers and booleans are tolerated.
fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RsvpSource for SheetsClient {
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, ClientError> {
        let url = self.values_url()?;
        let mut req = self.http.get(url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = check_status(send(req, &self.base_url).await?).await?;
        let body: ValueRange = resp
            .json()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        tracing::debug!("Fetched {} spreadsheet rows", body.values.len());
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

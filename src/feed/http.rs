use async_trait::async_trait;
use std::time::Duration;

use super::FilingSource;
use crate::domain::Filing;
use crate::error::{FilingcastError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches a JSON array of filings from a URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("filingcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FilingcastError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }
}

pub fn parse_filings(body: &str) -> Result<Vec<Filing>> {
    serde_json::from_str(body)
        .map_err(|e| FilingcastError::FilingSource(format!("invalid filing list: {}", e)))
}

#[async_trait]
impl FilingSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Filing>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FilingcastError::FilingSource(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FilingcastError::FilingSource(format!(
                "feed returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FilingcastError::FilingSource(e.to_string()))?;
        let filings = parse_filings(&body)?;
        tracing::debug!(url = %self.url, count = filings.len(), "fetched filings");
        Ok(filings)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

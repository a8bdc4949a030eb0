//! Fetching the report page over HTTP.
//!
//! The IGP main page is a SPA; this URL serves the static table.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Page carrying the static reported-earthquakes table.
pub const REPORT_URL: &str =
    "https://www.igp.gob.pe/servicios/centro-sismologico-nacional/ultimo-sismo/sismos-reportados";

/// Browser-like User-Agent to avoid simple bot blocking.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Request timeout. The run has no other duration bound.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the raw report page body.
///
/// A trait seam so the handler can be driven by canned markup in tests.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    /// Perform one GET and return the body on a success status.
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// HTTP fetcher with a spoofed browser identity and a bounded timeout.
///
/// No retries: a failed fetch is terminal for the run.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    /// Create a fetcher for the given URL.
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a fetcher for the fixed report page.
    pub fn for_report_page() -> Result<Self, FetchError> {
        Self::new(REPORT_URL)
    }
}

#[async_trait]
impl ReportFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching report page");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "HTTP request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(url = %self.url, content_length = body.len(), "report page fetched");
        Ok(body)
    }
}

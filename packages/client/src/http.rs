//! `reqwest`-backed [`OpsApi`] implementation.

use rlis_ops_models::{ClassificationResult, Incident, Location, LogSubmission};
use serde::de::DeserializeOwned;

use crate::{ClientError, OpsApi};

/// Base URL used when `RLIS_API_BASE_URL` is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "RLIS_API_BASE_URL";

/// HTTP client for the analysis service.
#[derive(Debug, Clone)]
pub struct OpsClient {
    base_url: String,
    client: reqwest::Client,
}

impl OpsClient {
    /// Creates a client rooted at `base_url` (e.g.
    /// `"http://localhost:8000/api/v1"`). Trailing slashes are ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from the `RLIS_API_BASE_URL` environment variable,
    /// falling back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(resolve_base_url(std::env::var(BASE_URL_ENV).ok()))
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }
}

/// Picks the configured base URL, ignoring blank values.
fn resolve_base_url(configured: Option<String>) -> String {
    configured
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Checks the status and parses the body of a service response.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait::async_trait]
impl OpsApi for OpsClient {
    async fn fetch_locations(&self) -> Result<Vec<Location>, ClientError> {
        self.get_json("/locations").await
    }

    async fn fetch_incidents(&self) -> Result<Vec<Incident>, ClientError> {
        self.get_json("/incidents").await
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClientError> {
        let url = self.url("/predict");
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .json(&LogSubmission {
                raw_text: text.to_string(),
            })
            .send()
            .await?;

        decode(resp).await
    }
}

//! The fetch primitive and its reqwest-backed implementation.

use async_trait::async_trait;
use remote_content_core::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Issues GET requests and parses JSON bodies.
///
/// A non-success status must surface as [`FetchError::Status`] so callers can
/// react to "not found" responses.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> FetchResult<Value>;
}

/// HTTP client settings shared by the fetcher and the image probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("remote-content/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Build the shared reqwest client.
pub fn build_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.api+json, application/json;q=0.9"),
    );
    Client::builder()
        .timeout(settings.request_timeout)
        .user_agent(settings.user_agent.clone())
        .default_headers(headers)
        .build()
}

/// [`ResourceFetcher`] over HTTP.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> FetchResult<Value> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, url));
        }

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Reason phrase used for codes without a canonical one.
const UNKNOWN_STATUS: &str = "Unknown Status";

/// [`FetchError::Status`] carrying the canonical reason phrase for `status`.
pub fn status_error(status: StatusCode, url: impl Into<String>) -> FetchError {
    FetchError::status(
        status.as_u16(),
        status.canonical_reason().unwrap_or(UNKNOWN_STATUS),
        url,
    )
}

/// As [`status_error`], from a raw code. Codes outside `100..=999` keep the
/// fallback phrase.
pub fn status_code_error(status: u16, url: impl Into<String>) -> FetchError {
    match StatusCode::from_u16(status) {
        Ok(code) => status_error(code, url),
        Err(_) => FetchError::status(status, UNKNOWN_STATUS, url),
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

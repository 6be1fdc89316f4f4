//! Steam storefront API client
//!
//! This module fetches raw app details from the storefront `appdetails`
//! endpoint. The response body is kept as opaque JSON; nothing here knows or
//! cares about its shape beyond it being parseable.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::AppId;

/// Base URL for the storefront app details endpoint
pub const STEAM_APPDETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

/// Default upstream request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_REFERER: &str = "https://store.steampowered.com/";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Errors that can occur when fetching app details
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport failure, including timeouts
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The storefront answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The body parsed but was JSON `null`
    #[error("Upstream returned an empty body")]
    EmptyBody,
}

impl UpstreamError {
    /// Whether the request gave up waiting on the upstream
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::RequestFailed(e) if e.is_timeout())
    }
}

/// Client for fetching app details from the Steam storefront
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a client against the given app details endpoint
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch the raw app details payload for `id`
    ///
    /// # Returns
    /// * `Ok(Value)` - The upstream body, unmodified
    /// * `Err(UpstreamError)` - On transport error, timeout, non-2xx status or a malformed body
    pub async fn fetch_app_details(&self, id: &AppId) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("appids", id.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let text = response.text().await?;
        let payload: Value = serde_json::from_str(&text)?;
        if payload.is_null() {
            return Err(UpstreamError::EmptyBody);
        }

        Ok(payload)
    }
}

/// Headers that make requests look like they come from a browser on the store page
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(REFERER, HeaderValue::from_static(BROWSER_REFERER));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers
}

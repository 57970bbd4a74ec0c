//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the shared identity headers
//! - Pacing each request through the rate limiter
//! - Enforcing the per-request timeout
//! - Error classification into [`SourceError`] kinds
//!
//! The fetcher never retries; retrying is a decision of the orchestrator.

use crate::config::IdentityConfig;
use crate::harvest::rate_limiter::RateLimiter;
use crate::SourceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// How the response body of a source should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// Markup, kept as text for the DOM parser
    Html,

    /// JSON, parsed during the fetch
    Json,
}

/// A successfully read response body
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Html(String),
    Json(serde_json::Value),
}

/// Outcome of a single fetch
///
/// Either a body or an error is present, never both.
#[derive(Debug)]
pub struct FetchResult {
    /// The requested URL
    pub url: String,

    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,

    body: Option<RawBody>,
    error: Option<SourceError>,
}

impl FetchResult {
    fn success(url: &str, status_code: u16, body: RawBody) -> Self {
        Self {
            url: url.to_string(),
            status_code: Some(status_code),
            body: Some(body),
            error: None,
        }
    }

    fn failure(url: &str, error: SourceError) -> Self {
        let status_code = match &error {
            SourceError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        };

        Self {
            url: url.to_string(),
            status_code,
            body: None,
            error: Some(error),
        }
    }

    /// Returns true for a 2xx response with a readable body
    pub fn status_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn raw_body(&self) -> Option<&RawBody> {
        self.body.as_ref()
    }

    pub fn error(&self) -> Option<&SourceError> {
        self.error.as_ref()
    }

    /// Converts into the body or the error
    pub fn into_result(self) -> Result<RawBody, SourceError> {
        match (self.body, self.error) {
            (_, Some(error)) => Err(error),
            (Some(body), None) => Ok(body),
            (None, None) => Err(SourceError::Connection {
                url: self.url,
                message: "empty fetch result".to_string(),
            }),
        }
    }
}

/// Builds an HTTP client carrying the configured identity
///
/// # Arguments
///
/// * `identity` - User agent and extra default headers
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::IdentityConfig;
/// use site_harvest::harvest::build_http_client;
///
/// let client = build_http_client(&IdentityConfig::default()).unwrap();
/// ```
pub fn build_http_client(identity: &IdentityConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in &identity.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!("Ignoring invalid identity header '{}'", name),
        }
    }

    Client::builder()
        .user_agent(identity.user_agent.as_str())
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited HTTP GET with error normalization
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
}

impl Fetcher {
    /// Creates a fetcher with a client built from `identity`
    pub fn new(identity: &IdentityConfig, limiter: RateLimiter) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(identity)?, limiter))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, limiter: RateLimiter) -> Self {
        Self { client, limiter }
    }

    /// Fetches a URL
    ///
    /// # Request Flow
    ///
    /// 1. Wait once on the rate limiter
    /// 2. Send a GET request; `timeout` bounds the whole exchange, connecting included
    /// 3. Classify the outcome
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx, readable body | `status_ok`, body set |
    /// | Non-2xx | `HttpStatus` |
    /// | Exceeded `timeout` | `Timeout` |
    /// | Connection refused/reset, DNS failure | `Connection` |
    /// | Body not JSON for [`BodyFormat::Json`] | `Parse` |
    pub async fn fetch(&self, url: &str, timeout: Duration, format: BodyFormat) -> FetchResult {
        self.limiter.wait().await;

        match self.request(url, timeout, format).await {
            Ok((status_code, body)) => {
                tracing::debug!("Fetched {} (HTTP {})", url, status_code);
                FetchResult::success(url, status_code, body)
            }
            Err(error) => {
                tracing::debug!("Fetch of {} failed: {}", url, error);
                FetchResult::failure(url, error)
            }
        }
    }

    async fn request(
        &self,
        url: &str,
        timeout: Duration,
        format: BodyFormat,
    ) -> Result<(u16, RawBody), SourceError> {
        let parsed = url::Url::parse(url).map_err(|e| SourceError::Connection {
            url: url.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = match format {
            BodyFormat::Html => RawBody::Html(
                response
                    .text()
                    .await
                    .map_err(|e| classify_error(url, timeout, e))?,
            ),
            BodyFormat::Json => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| classify_error(url, timeout, e))?;
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| SourceError::parse(url, format!("malformed JSON: {}", e)))?;
                RawBody::Json(value)
            }
        };

        Ok((status.as_u16(), body))
    }
}

/// Maps a transport error to a source error kind
fn classify_error(url: &str, timeout: Duration, error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else if error.is_decode() {
        SourceError::parse(url, error.to_string())
    } else {
        SourceError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

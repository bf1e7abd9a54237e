//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with a descriptive user agent
//! - GET requests for HTML pages
//! - Chunked GET requests for binary documents
//! - Error classification
//!
//! There is no retry logic. A failed request is reported once and the URL is
//! not revisited during the run.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Timeout used for HTML pages unless configured otherwise
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout used for document downloads unless configured otherwise
pub const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A successfully retrieved HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Page body decoded as text
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use portal_harvest::config::UserAgentConfig;
/// use portal_harvest::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "PortalHarvest".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.org/about".to_string(),
///     contact_email: "ops@example.org".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches an HTML page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | any other status | `FetchError::Status` |
/// | timeout | `FetchError::Timeout` |
/// | connection / TLS / body error | `FetchError::Network` |
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    let response = send(client, url, timeout).await?;

    let final_url = response.url().clone();
    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}

/// Downloads a binary document chunk by chunk
///
/// Peak memory is bounded by `max_bytes`: the download is abandoned with
/// `FetchError::TooLarge` as soon as the body grows past it.
pub async fn fetch_binary(
    client: &Client,
    url: &Url,
    timeout: Duration,
    max_bytes: u64,
) -> Result<Vec<u8>, FetchError> {
    let mut response = send(client, url, timeout).await?;

    if let Some(length) = response.content_length() {
        if length > max_bytes {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit: max_bytes,
            });
        }
    }

    let mut buffer = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?
    {
        if buffer.len() as u64 + chunk.len() as u64 > max_bytes {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                limit: max_bytes,
            });
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer)
}

/// Sends a GET request and rejects non-success statuses
async fn send(client: &Client, url: &Url, timeout: Duration) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::types::{Category, ListingResponse, Opportunity};

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading a listing.
///
/// An empty listing is not an error; it comes back as `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request never completed (DNS, connection refused, TLS, reset)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Server answered with a non-2xx status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// No response within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Body exceeded the 5MB limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Body was not a valid listing document
    #[error("Invalid listing response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Base URL could not be parsed or cannot carry a path
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// HTTP client for the opportunities listing endpoint.
///
/// Cloning is cheap: `reqwest::Client` is reference counted internally.
#[derive(Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    api_token: Option<SecretString>,
}

impl std::fmt::Debug for ListingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ListingClient {
    /// Create a client for the service rooted at `base_url`
    /// (e.g. `http://localhost:8000`).
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(base_url.to_string()));
        }
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(FetchError::InvalidBaseUrl(format!(
                    "unsupported scheme '{scheme}'"
                )))
            }
        }
        // Normalize so path segments append instead of replacing the last one
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            timeout: DEFAULT_TIMEOUT,
            api_token: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_token(mut self, token: Option<SecretString>) -> Self {
        self.api_token = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/api/opportunities/{category}[?search=query]`.
    pub fn listing_url(&self, category: Category, query: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "opportunities", category.as_str()]);

        let query = query.trim();
        if !query.is_empty() {
            url.query_pairs_mut().append_pair("search", query);
        }
        Ok(url)
    }

    /// Fetch the full listing for a category.
    ///
    /// A non-empty `query` is forwarded as a `search` hint. The server's
    /// interpretation is not trusted; callers re-filter locally.
    pub async fn fetch(
        &self,
        category: Category,
        query: &str,
    ) -> Result<Vec<Opportunity>, FetchError> {
        let url = self.listing_url(category, query)?;
        tracing::debug!(url = %url, "Fetching opportunities");

        let mut request = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            tracing::trace!("Listing API authentication configured");
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))?
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Listing request failed");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let body: ListingResponse = serde_json::from_slice(&bytes)?;

        tracing::debug!(
            category = %category,
            count = body.opportunities.len(),
            "Fetched opportunities"
        );
        Ok(body.opportunities)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

//! Upstream Module
//!
//! HTTP client for the API the proxy fronts.

use axum::body::Bytes;
use tracing::warn;

use crate::error::{ProxyError, Result};

// == Upstream ==
/// Shared client for the upstream API.
///
/// Every fetch is a single GET attempt: no retries and no timeout beyond the
/// transport defaults.
#[derive(Debug, Clone)]
pub struct Upstream {
    /// Pooled HTTP client
    client: reqwest::Client,
    /// Base URL the identifier is appended to
    base_url: String,
}

impl Upstream {
    // == Constructor ==
    /// Creates an Upstream with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the upstream URL by plain concatenation of base and identifier.
    pub fn url_for(&self, identifier: &str) -> String {
        format!("{}{}", self.base_url, identifier)
    }

    // == Fetch ==
    /// GETs `<base><identifier>` and returns the full response body.
    ///
    /// Any HTTP status counts as success; only transport and body read
    /// failures are errors.
    pub async fn fetch(&self, identifier: &str) -> Result<Bytes> {
        let url = self.url_for(identifier);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProxyError::Request)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "upstream returned non-success status");
        }

        response.bytes().await.map_err(ProxyError::Body)
    }
}

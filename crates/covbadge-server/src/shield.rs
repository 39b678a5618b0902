//! Client for the shields-style badge rendering service

use crate::error::{ServerError, ServerResult};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use std::time::Duration;

/// Content type assumed when the service sends none
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// A rendered badge image
#[derive(Debug, Clone)]
pub struct RenderedBadge {
    /// Upstream `Content-Type`
    pub content_type: HeaderValue,
    /// Image bytes
    pub body: Bytes,
}

impl RenderedBadge {
    /// An SVG badge
    #[must_use]
    pub fn svg(body: impl Into<Bytes>) -> Self {
        Self {
            content_type: HeaderValue::from_static(SVG_CONTENT_TYPE),
            body: body.into(),
        }
    }
}

/// Fetches badge images by URL
#[async_trait]
pub trait BadgeRenderer: Send + Sync {
    /// Fetch the badge at `url`
    async fn render(&self, url: &str) -> ServerResult<RenderedBadge>;
}

/// HTTP client for a shields-compatible service
#[derive(Debug, Clone)]
pub struct ShieldClient {
    client: reqwest::Client,
}

impl ShieldClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> ServerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("covbadge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServerError::config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BadgeRenderer for ShieldClient {
    async fn render(&self, url: &str) -> ServerResult<RenderedBadge> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServerError::shield(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::ShieldStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(SVG_CONTENT_TYPE));
        let body = response
            .bytes()
            .await
            .map_err(|e| ServerError::shield(url, e.to_string()))?;

        tracing::debug!(url, bytes = body.len(), "fetched badge");
        Ok(RenderedBadge { content_type, body })
    }
}

// ABOUTME: Transport port for fetching remote notification content over HTTP

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return its body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// Transport used when none is configured. Every fetch fails, so the
/// resolver always falls back to generated content.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTransport;

#[async_trait]
impl Transport for NoTransport {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        Err(TransportError::Request(format!("no transport configured for {}", url)))
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Transport whose requests are abandoned after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        debug!("Fetching notification content from {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

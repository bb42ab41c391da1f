// ABOUTME: Error types for the notification engine and the single degradation policy
// Every port failure is recoverable; the recovery rules live in `recovery` below

use thiserror::Error;

/// Failure reading or writing the key-value store that backs throttling.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure fetching or decoding remote notification content.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// The rendering backend refused to materialize a notification.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Renderer rejected notification: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Degradation rules for every recoverable failure in the engine.
///
/// A notification widget must never break its host, so nothing here returns an
/// error: persistence reads fail open, persistence writes are dropped, and remote
/// content falls back to whatever the caller generates.
pub mod recovery {
    use super::{StoreError, TransportError};
    use crate::models::NotificationPayload;
    use tracing::warn;

    /// `PersistenceUnavailable` on read is treated as "no record".
    pub fn read_or_absent(key: &str, result: Result<Option<String>, StoreError>) -> Option<String> {
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read '{}' from storage, treating as absent: {}", key, e);
                None
            }
        }
    }

    /// `PersistenceUnavailable` on write is logged and dropped.
    pub fn swallow_write(key: &str, result: Result<(), StoreError>) {
        if let Err(e) = result {
            warn!("Failed to save '{}' to storage: {}", key, e);
        }
    }

    /// `TransportFailure` degrades to locally generated content.
    pub fn payload_or_fallback<F>(
        url: &str,
        result: Result<NotificationPayload, TransportError>,
        fallback: F,
    ) -> NotificationPayload
    where
        F: FnOnce() -> NotificationPayload,
    {
        match result {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to fetch notification from {}: {}", url, e);
                fallback()
            }
        }
    }
}

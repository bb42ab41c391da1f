// ABOUTME: Notification payload produced by content resolution and consumed by renderers

use serde::{Deserialize, Serialize};

/// Timestamp label attached to generated notifications.
pub const JUST_NOW: &str = "Just now";

/// Text shown in one notification. Remote endpoints return this shape verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NotificationPayload {
    pub fn new(message: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            message: message.into(),
            timestamp,
        }
    }

    pub fn just_now(message: impl Into<String>) -> Self {
        Self::new(message, Some(JUST_NOW.to_string()))
    }
}

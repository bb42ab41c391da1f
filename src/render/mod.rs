// ABOUTME: Rendering backend port consumed by the lifecycle controller
// The controller only ever holds an opaque handle; markup details stay behind this trait

pub mod markup;
pub mod theme;

use crate::config::NotificationConfig;
use crate::error::RenderError;
use crate::models::NotificationPayload;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

pub use markup::{HtmlRenderer, RenderedNotification};
pub use theme::{theme_markup, ThemeClasses, ThemeMarkup};

/// Opaque reference to one materialized notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(Uuid);

impl RenderHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RenderHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User interaction with a displayed notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    CloseRequested,
    PointerEnter,
    PointerLeave,
}

pub type InteractionSender = mpsc::UnboundedSender<Interaction>;

pub trait Renderer: Send + Sync {
    /// Build the notification and attach it to the page.
    fn materialize(
        &self,
        payload: &NotificationPayload,
        config: &NotificationConfig,
    ) -> Result<RenderHandle, RenderError>;

    /// Start the exit transition. The element stays attached until `detach`.
    fn play_exit(&self, handle: &RenderHandle);

    fn detach(&self, handle: &RenderHandle);

    /// Deliver close-button and pointer events for `handle` to `events`.
    fn subscribe(&self, handle: &RenderHandle, events: InteractionSender);
}

// ABOUTME: In-memory HTML rendering backend used by the CLI and by tests
// Keeps attached notifications on a page model and routes host interactions to subscribers

use super::theme::{theme_markup, ThemeMarkup};
use super::{Interaction, InteractionSender, RenderHandle, Renderer};
use crate::config::{NotificationConfig, Theme};
use crate::error::RenderError;
use crate::models::NotificationPayload;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Snapshot of a notification currently attached to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub handle: RenderHandle,
    pub markup: String,
    pub hiding: bool,
}

struct Attached {
    rendered: RenderedNotification,
    subscribers: Vec<InteractionSender>,
}

pub struct HtmlRenderer {
    theme: Box<dyn ThemeMarkup>,
    page: Mutex<Vec<Attached>>,
}

impl HtmlRenderer {
    pub fn new(theme: &Theme) -> Self {
        Self {
            theme: theme_markup(theme),
            page: Mutex::new(Vec::new()),
        }
    }

    fn page(&self) -> MutexGuard<'_, Vec<Attached>> {
        self.page.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Notifications currently attached, oldest first.
    pub fn attached(&self) -> Vec<RenderedNotification> {
        self.page().iter().map(|a| a.rendered.clone()).collect()
    }

    pub fn get(&self, handle: &RenderHandle) -> Option<RenderedNotification> {
        self.page()
            .iter()
            .find(|a| &a.rendered.handle == handle)
            .map(|a| a.rendered.clone())
    }

    /// Forward a host event for `handle`. Returns false when nothing is attached
    /// under that handle.
    pub fn interact(&self, handle: &RenderHandle, interaction: Interaction) -> bool {
        let mut page = self.page();
        let Some(attached) = page.iter_mut().find(|a| &a.rendered.handle == handle) else {
            return false;
        };
        attached
            .subscribers
            .retain(|tx| tx.send(interaction).is_ok());
        true
    }

    pub fn build_markup(&self, payload: &NotificationPayload, config: &NotificationConfig) -> String {
        let classes = self.theme.classes();

        let mut notification_class = classes.container.clone();
        for class in self.theme.enter_classes(config) {
            notification_class.push(' ');
            notification_class.push_str(class);
        }

        let icon = if config.show_icon {
            self.theme.icon_section(config.icon_type)
        } else {
            String::new()
        };

        let timestamp = payload
            .timestamp
            .as_deref()
            .map(|ts| format!(r#"<p class="{}">{}</p>"#, classes.timestamp, escape(ts)))
            .unwrap_or_default();

        let close = if config.close_button {
            format!(
                r#"<button class="{}" aria-label="Close notification"{}>{}</button>"#,
                classes.close_button,
                self.theme.close_button_attrs(),
                self.theme.close_button_body()
            )
        } else {
            String::new()
        };

        format!(
            concat!(
                r#"<div class="spn-container position-{}">"#,
                r#"<div class="{}"><div class="{}">{}"#,
                r#"<div class="{}"><p class="{}">{}</p>{}</div>"#,
                "{}</div></div></div>"
            ),
            config.position.as_str(),
            escape(&notification_class),
            classes.wrapper,
            icon,
            classes.content,
            classes.message,
            escape(&payload.message),
            timestamp,
            close
        )
    }
}

impl Renderer for HtmlRenderer {
    fn materialize(
        &self,
        payload: &NotificationPayload,
        config: &NotificationConfig,
    ) -> Result<RenderHandle, RenderError> {
        if payload.message.trim().is_empty() {
            return Err(RenderError::Rejected("notification message is empty".to_string()));
        }

        let handle = RenderHandle::new();
        let markup = self.build_markup(payload, config);
        self.page().push(Attached {
            rendered: RenderedNotification {
                handle,
                markup,
                hiding: false,
            },
            subscribers: Vec::new(),
        });
        debug!("Attached notification {}", handle);
        Ok(handle)
    }

    fn play_exit(&self, handle: &RenderHandle) {
        let Some(exit_class) = self.theme.exit_class() else {
            return;
        };
        let mut page = self.page();
        if let Some(attached) = page.iter_mut().find(|a| &a.rendered.handle == handle) {
            attached.rendered.hiding = true;
            let container = escape(&self.theme.classes().container);
            attached.rendered.markup = attached
                .rendered
                .markup
                .replacen(&format!(r#"class="{}"#, container), &format!(r#"class="{} {}"#, container, exit_class), 1);
        }
    }

    fn detach(&self, handle: &RenderHandle) {
        let mut page = self.page();
        let before = page.len();
        page.retain(|a| &a.rendered.handle != handle);
        if page.len() == before {
            warn!("Detach requested for unknown notification {}", handle);
        } else {
            debug!("Detached notification {}", handle);
        }
    }

    fn subscribe(&self, handle: &RenderHandle, events: InteractionSender) {
        if let Some(attached) = self.page().iter_mut().find(|a| &a.rendered.handle == handle) {
            attached.subscribers.push(events);
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ABOUTME: Theme variants for the HTML renderer: class sets, icon markup and exit styling

use crate::config::{IconType, NotificationConfig, Theme};

/// CSS classes applied to each part of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeClasses {
    pub container: String,
    pub wrapper: &'static str,
    pub icon_wrapper: &'static str,
    pub icon: &'static str,
    pub content: &'static str,
    pub message: &'static str,
    pub timestamp: &'static str,
    pub close_button: &'static str,
}

impl ThemeClasses {
    pub fn default_set() -> Self {
        Self {
            container: "spn-notification".to_string(),
            wrapper: "spn-wrapper",
            icon_wrapper: "spn-icon-wrapper",
            icon: "spn-icon",
            content: "spn-content",
            message: "spn-message",
            timestamp: "spn-timestamp",
            close_button: "spn-close",
        }
    }

    pub fn bootstrap() -> Self {
        Self {
            container: "toast show".to_string(),
            wrapper: "d-flex align-items-start gap-3 px-3 py-2",
            icon_wrapper: "flex-shrink-0",
            icon: "bi bi-check-circle-fill text-success fs-4",
            content: "flex-grow-1",
            message: "mb-1 fw-semibold",
            timestamp: "text-muted small",
            close_button: "btn-close ms-auto",
        }
    }

    pub fn tailwind() -> Self {
        Self {
            container: "bg-white border border-gray-200 rounded-lg shadow-lg p-4".to_string(),
            wrapper: "flex items-start justify-between",
            icon_wrapper: "flex-shrink-0",
            icon: "w-5 h-5 text-green-600",
            content: "flex-1 min-w-0 ml-3",
            message: "text-sm text-gray-600",
            timestamp: "text-xs text-gray-400 mt-1",
            close_button: "flex-shrink-0 ml-2 text-gray-400 hover:text-gray-600 transition-colors",
        }
    }
}

pub fn icon_svg(icon: IconType) -> &'static str {
    match icon {
        IconType::Checkmark => r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 13l4 4L19 7"></path></svg>"#,
        IconType::Fire => r#"<svg fill="currentColor" viewBox="0 0 24 24"><path d="M12 23a7.5 7.5 0 0 1-5.138-12.963C8.204 8.774 11.5 6.5 11 1.5c6 4 9 8 3 14 1 0 2.5 0 5-2.47.27.773.5 1.604.5 2.47A7.5 7.5 0 0 1 12 23z"></path></svg>"#,
        IconType::Star => r#"<svg fill="currentColor" viewBox="0 0 24 24"><path d="M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z"></path></svg>"#,
    }
}

pub const CLOSE_SVG: &str = r#"<svg fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12"></path></svg>"#;

/// Markup differences between themes. The HTML renderer picks one variant at
/// construction and never branches on theme names afterwards.
pub trait ThemeMarkup: Send + Sync {
    fn classes(&self) -> &ThemeClasses;

    /// Icon markup placed at the start of the wrapper.
    fn icon_section(&self, icon: IconType) -> String;

    /// Inner markup of the close button.
    fn close_button_body(&self) -> &'static str {
        CLOSE_SVG
    }

    fn close_button_attrs(&self) -> &'static str {
        ""
    }

    /// Extra classes on the notification element when it enters.
    fn enter_classes(&self, _config: &NotificationConfig) -> Vec<&'static str> {
        Vec::new()
    }

    /// Class added to the notification element when the exit transition starts.
    fn exit_class(&self) -> Option<&'static str> {
        None
    }
}

struct DefaultTheme {
    classes: ThemeClasses,
    animated: bool,
}

impl ThemeMarkup for DefaultTheme {
    fn classes(&self) -> &ThemeClasses {
        &self.classes
    }

    fn icon_section(&self, icon: IconType) -> String {
        format!(
            r#"<div class="{}"><div class="spn-icon-circle"><div class="{}">{}</div></div></div>"#,
            self.classes.icon_wrapper,
            self.classes.icon,
            icon_svg(icon)
        )
    }

    fn enter_classes(&self, config: &NotificationConfig) -> Vec<&'static str> {
        if !self.animated {
            return Vec::new();
        }
        config.animation.class_name().into_iter().collect()
    }

    fn exit_class(&self) -> Option<&'static str> {
        self.animated.then_some("hiding")
    }
}

struct BootstrapTheme {
    classes: ThemeClasses,
}

impl ThemeMarkup for BootstrapTheme {
    fn classes(&self) -> &ThemeClasses {
        &self.classes
    }

    // Bootstrap Icons use a glyph font, so the icon kind is not rendered as SVG
    fn icon_section(&self, _icon: IconType) -> String {
        format!(
            r#"<div class="{}"><i class="{}" style="font-size: 24px"></i></div>"#,
            self.classes.icon_wrapper, self.classes.icon
        )
    }

    fn close_button_body(&self) -> &'static str {
        ""
    }

    fn close_button_attrs(&self) -> &'static str {
        r#" type="button""#
    }
}

struct TailwindTheme {
    classes: ThemeClasses,
}

impl ThemeMarkup for TailwindTheme {
    fn classes(&self) -> &ThemeClasses {
        &self.classes
    }

    fn icon_section(&self, icon: IconType) -> String {
        format!(
            r#"<div class="{} w-8 h-8 bg-green-100 rounded-full flex items-center justify-center"><div class="{}">{}</div></div>"#,
            self.classes.icon_wrapper,
            self.classes.icon,
            icon_svg(icon)
        )
    }
}

/// Select the markup variant for `theme`. Custom themes reuse the default
/// layout with their name added to the container class list.
pub fn theme_markup(theme: &Theme) -> Box<dyn ThemeMarkup> {
    match theme {
        Theme::Default => Box::new(DefaultTheme {
            classes: ThemeClasses::default_set(),
            animated: true,
        }),
        Theme::Bootstrap => Box::new(BootstrapTheme {
            classes: ThemeClasses::bootstrap(),
        }),
        Theme::Tailwind => Box::new(TailwindTheme {
            classes: ThemeClasses::tailwind(),
        }),
        Theme::Custom(name) => {
            let mut classes = ThemeClasses::default_set();
            classes.container = format!("{} {}", classes.container, name);
            Box::new(DefaultTheme {
                classes,
                animated: false,
            })
        }
    }
}

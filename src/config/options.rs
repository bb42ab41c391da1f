// ABOUTME: Enumerated configuration options for placement, content source and appearance

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    #[default]
    BottomRight,
    BottomCenter,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::TopRight => "top-right",
            Position::TopCenter => "top-center",
            Position::BottomLeft => "bottom-left",
            Position::BottomRight => "bottom-right",
            Position::BottomCenter => "bottom-center",
        }
    }
}

/// Where notification text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The configured `localData` list, or generated text when it is empty.
    #[default]
    Local,
    /// A JSON endpoint at `apiUrl`.
    Api,
}

/// Visual theme handed to the renderer. Names other than the built-in ones are
/// treated as a custom container class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Default,
    Bootstrap,
    Tailwind,
    Custom(String),
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        match name.as_str() {
            "default" => Theme::Default,
            "bootstrap" => Theme::Bootstrap,
            "tailwind" => Theme::Tailwind,
            _ => Theme::Custom(name),
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Default => f.write_str("default"),
            Theme::Bootstrap => f.write_str("bootstrap"),
            Theme::Tailwind => f.write_str("tailwind"),
            Theme::Custom(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconType {
    #[default]
    Checkmark,
    Fire,
    Star,
}

impl From<String> for IconType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "fire" => IconType::Fire,
            "star" => IconType::Star,
            // unknown icons render as a checkmark
            _ => IconType::Checkmark,
        }
    }
}

impl From<IconType> for String {
    fn from(icon: IconType) -> Self {
        match icon {
            IconType::Checkmark => "checkmark",
            IconType::Fire => "fire",
            IconType::Star => "star",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    Slide,
    Fade,
    Bounce,
    None,
}

impl Animation {
    /// CSS modifier class, or `None` when animation is disabled.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Animation::Slide => Some("animate-slide"),
            Animation::Fade => Some("animate-fade"),
            Animation::Bounce => Some("animate-bounce"),
            Animation::None => None,
        }
    }
}

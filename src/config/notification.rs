// ABOUTME: Immutable notification configuration with defaults, file loading and validation
// Field names follow the public option names (camelCase) so config files match them 1:1

use super::options::{Animation, DataSource, IconType, Position, Theme};
use crate::error::ConfigError;
use crate::models::NotificationPayload;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default message template. Placeholders: `{count}`, `{action}`, `{timeframe}`.
pub const DEFAULT_MESSAGE_FORMAT: &str = "{count} people {action} {timeframe}!";

/// Hours between displays when nothing (or nothing usable) is configured.
pub const DEFAULT_MIN_TIME_BETWEEN: f64 = 9.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationConfig {
    pub position: Position,
    pub auto_close: bool,
    /// Milliseconds a notification stays up before closing itself.
    pub auto_close_timeout: u64,
    /// Milliseconds between `init` and the first display.
    pub initial_delay: u64,
    pub data_source: DataSource,
    pub api_url: Option<String>,
    pub local_data: Vec<NotificationPayload>,
    pub save_to_storage: bool,
    /// Minimum hours between two displays when `save_to_storage` is on.
    pub min_time_between: f64,
    pub theme: Theme,
    pub show_icon: bool,
    pub icon_type: IconType,
    pub animation: Animation,
    /// Milliseconds of the exit transition before the element is detached.
    pub animation_duration: u64,
    pub close_button: bool,
    pub pause_on_hover: bool,
    pub max_notifications: u32,
    pub message_format: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            position: Position::BottomRight,
            auto_close: true,
            auto_close_timeout: 8000,
            initial_delay: 10000,
            data_source: DataSource::Local,
            api_url: None,
            local_data: Vec::new(),
            save_to_storage: true,
            min_time_between: DEFAULT_MIN_TIME_BETWEEN,
            theme: Theme::Default,
            show_icon: true,
            icon_type: IconType::Checkmark,
            animation: Animation::Slide,
            animation_duration: 300,
            close_button: true,
            pause_on_hover: false,
            max_notifications: 1,
            message_format: DEFAULT_MESSAGE_FORMAT.to_string(),
        }
    }
}

impl NotificationConfig {
    /// Load and validate a configuration file. `.json` files are parsed as JSON,
    /// everything else as TOML. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        debug!("Loaded notification config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_time_between.is_finite() || self.min_time_between < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minTimeBetween must be a non-negative number of hours, got {}",
                self.min_time_between
            )));
        }
        if self.message_format.trim().is_empty() {
            return Err(ConfigError::Invalid("messageFormat must not be empty".to_string()));
        }

        // A bad endpoint degrades to generated content instead of failing.
        if self.data_source == DataSource::Api {
            match self.api_url.as_deref() {
                None => warn!("dataSource is 'api' but no apiUrl is set; generated content will be used"),
                Some(url) if reqwest::Url::parse(url).is_err() => {
                    warn!("apiUrl '{}' is not a valid URL; fetches will fall back to generated content", url);
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Endpoint to fetch from, present only when the api source is selected.
    pub fn remote_endpoint(&self) -> Option<&str> {
        match self.data_source {
            DataSource::Api => self.api_url.as_deref().filter(|url| !url.is_empty()),
            DataSource::Local => None,
        }
    }

    pub fn auto_close_after(&self) -> Duration {
        Duration::from_millis(self.auto_close_timeout)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay)
    }

    pub fn exit_animation(&self) -> Duration {
        Duration::from_millis(self.animation_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_match_published_options() {
        let config = NotificationConfig::default();
        assert_eq!(config.auto_close_after(), Duration::from_secs(8));
        assert_eq!(config.initial_delay(), Duration::from_secs(10));
        assert_eq!(config.exit_animation(), Duration::from_millis(300));
        assert_eq!(config.min_time_between, 9.0);
        assert_eq!(config.max_notifications, 1);
        assert!(config.save_to_storage);
        assert!(!config.pause_on_hover);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: NotificationConfig = serde_json::from_str(
            r#"{"autoCloseTimeout": 4000, "dataSource": "api", "apiUrl": "https://example.com/feed",
                "localData": [{"message": "Hi"}], "theme": "tailwind"}"#,
        )
        .unwrap();
        assert_eq!(config.auto_close_timeout, 4000);
        assert_eq!(config.initial_delay, 10000);
        assert_eq!(config.theme, Theme::Tailwind);
        assert_eq!(config.local_data, vec![NotificationPayload::new("Hi", None)]);
        assert_eq!(config.remote_endpoint(), Some("https://example.com/feed"));
    }

    #[test]
    fn test_local_source_has_no_remote_endpoint() {
        let config = NotificationConfig {
            api_url: Some("https://example.com/feed".to_string()),
            ..Default::default()
        };
        assert_eq!(config.remote_endpoint(), None);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "position = \"top-left\"\nminTimeBetween = 0.5\npauseOnHover = true\nmessageFormat = \"{{count}} folks {{action}}\""
        )
        .unwrap();

        let config = NotificationConfig::load(file.path()).unwrap();
        assert_eq!(config.position, Position::TopLeft);
        assert_eq!(config.min_time_between, 0.5);
        assert!(config.pause_on_hover);
        assert_eq!(config.message_format, "{count} folks {action}");
    }

    #[test]
    fn test_negative_interval_is_rejected() {
        let config = NotificationConfig {
            min_time_between: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_template_is_rejected() {
        let config = NotificationConfig {
            message_format: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

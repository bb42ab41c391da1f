// ABOUTME: Configuration snapshot for a notification instance

pub mod notification;
pub mod options;

pub use notification::{NotificationConfig, DEFAULT_MESSAGE_FORMAT, DEFAULT_MIN_TIME_BETWEEN};
pub use options::{Animation, DataSource, IconType, Position, Theme};

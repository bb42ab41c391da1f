// ABOUTME: Library crate for the social-proof notification engine
// Throttled, scheduled display of short "others did this recently" notifications

pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod render;
pub mod throttle;

pub use config::NotificationConfig;
pub use lifecycle::{NotificationController, Phase, ShowOutcome};
pub use models::NotificationPayload;

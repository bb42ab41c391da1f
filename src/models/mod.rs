// ABOUTME: Core data models shared by content resolution, rendering and the lifecycle

pub mod payload;

pub use payload::{NotificationPayload, JUST_NOW};

// ABOUTME: Notification lifecycle: scheduling, display state machine and timers

pub mod controller;
pub mod session;
pub mod timer;

pub use controller::{ControllerBuilder, NotificationController};
pub use session::{DisplaySession, Phase, ShowOutcome};
pub use timer::{ScheduledTask, TimerId};

// ABOUTME: Ephemeral display state owned by the lifecycle controller

use super::timer::{ScheduledTask, TimerId};
use crate::render::RenderHandle;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting for the initial delay to elapse.
    Scheduled,
    /// Content is being resolved; a second `show` is rejected.
    Resolving,
    Visible,
    /// Exit transition running; the element is detached when it ends.
    Dismissing,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Scheduled => "scheduled",
            Phase::Resolving => "resolving",
            Phase::Visible => "visible",
            Phase::Dismissing => "dismissing",
        }
    }
}

/// Why `show` did or did not put a notification on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown,
    /// Already visible, or another `show` is resolving content.
    AlreadyVisible,
    LimitReached,
    /// The instance was destroyed while content was being resolved.
    Superseded,
    RenderFailed,
}

#[derive(Debug)]
pub struct DisplaySession {
    pub shown_count: u32,
    pub visible: bool,
    pub phase: Phase,
    /// Bumped by `destroy` so in-flight resolutions can tell they are stale.
    pub epoch: u64,
    pub handle: Option<RenderHandle>,
    pub initial_delay: Option<ScheduledTask>,
    pub auto_close: Option<ScheduledTask>,
    pub exit: Option<ScheduledTask>,
    pub listener: Option<JoinHandle<()>>,
}

impl DisplaySession {
    pub fn new() -> Self {
        Self {
            shown_count: 0,
            visible: false,
            phase: Phase::Idle,
            epoch: 0,
            handle: None,
            initial_delay: None,
            auto_close: None,
            exit: None,
            listener: None,
        }
    }

    /// Admission checks for a new display, in order: count ceiling, then visibility.
    pub fn admit(&self, max_notifications: u32) -> Result<(), ShowOutcome> {
        if self.shown_count >= max_notifications {
            return Err(ShowOutcome::LimitReached);
        }
        if self.visible || self.phase == Phase::Resolving {
            return Err(ShowOutcome::AlreadyVisible);
        }
        Ok(())
    }

    pub fn cancel_auto_close(&mut self) {
        if let Some(task) = self.auto_close.take() {
            task.cancel();
        }
    }

    pub fn cancel_initial_delay(&mut self) {
        if let Some(task) = self.initial_delay.take() {
            task.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel_initial_delay();
        self.cancel_auto_close();
        if let Some(task) = self.exit.take() {
            task.cancel();
        }
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }

    /// Take `slot` out if it still holds the timer `id`.
    pub fn claim(slot: &mut Option<ScheduledTask>, id: TimerId) -> bool {
        if slot.as_ref().map(ScheduledTask::id) != Some(id) {
            return false;
        }
        if let Some(task) = slot.take() {
            task.release();
        }
        true
    }

    pub fn pending_timers(&self) -> usize {
        [&self.initial_delay, &self.auto_close, &self.exit]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

impl Default for DisplaySession {
    fn default() -> Self {
        Self::new()
    }
}

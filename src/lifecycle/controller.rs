// ABOUTME: Lifecycle controller orchestrating throttling, scheduling, display and teardown
// State machine: Idle -> Scheduled -> (Resolving) -> Visible -> Dismissing -> Idle

use super::session::{DisplaySession, Phase, ShowOutcome};
use super::timer::{ScheduledTask, TimerId};
use crate::config::NotificationConfig;
use crate::content::{ContentResolver, NoTransport, Transport};
use crate::render::{HtmlRenderer, Interaction, RenderHandle, Renderer};
use crate::throttle::{Clock, KeyValueStore, MemoryStore, SystemClock, ThrottleGate};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drives one notification instance. Cheap to clone; clones share state.
///
/// Timer-driven methods (`init`, `show`, `hide`) spawn tokio tasks and must be
/// called from inside a tokio runtime.
#[derive(Clone)]
pub struct NotificationController {
    inner: Arc<Inner>,
}

struct Inner {
    config: Arc<NotificationConfig>,
    gate: ThrottleGate,
    resolver: ContentResolver,
    renderer: Arc<dyn Renderer>,
    session: Mutex<DisplaySession>,
}

pub struct ControllerBuilder {
    config: NotificationConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    transport: Option<Arc<dyn Transport>>,
    renderer: Option<Arc<dyn Renderer>>,
    rng: Option<Box<dyn RngCore + Send>>,
}

impl ControllerBuilder {
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> NotificationController {
        if let Err(e) = self.config.validate() {
            warn!("Building controller with an invalid configuration: {}", e);
        }
        let config = Arc::new(self.config);
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let transport = self.transport.unwrap_or_else(|| Arc::new(NoTransport));
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(HtmlRenderer::new(&config.theme)));
        let rng = self.rng.unwrap_or_else(|| Box::new(StdRng::from_entropy()));

        NotificationController {
            inner: Arc::new(Inner {
                gate: ThrottleGate::new(&config, store, clock),
                resolver: ContentResolver::new(config.clone(), transport, rng),
                renderer,
                session: Mutex::new(DisplaySession::new()),
                config,
            }),
        }
    }
}

impl NotificationController {
    pub fn builder(config: NotificationConfig) -> ControllerBuilder {
        ControllerBuilder {
            config,
            store: None,
            clock: None,
            transport: None,
            renderer: None,
            rng: None,
        }
    }

    pub fn new(config: NotificationConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> Phase {
        self.session().phase
    }

    pub fn is_visible(&self) -> bool {
        self.session().visible
    }

    pub fn shown_count(&self) -> u32 {
        self.session().shown_count
    }

    pub fn pending_timers(&self) -> usize {
        self.session().pending_timers()
    }

    /// Handle of the notification currently on the page, if any.
    pub fn current_handle(&self) -> Option<RenderHandle> {
        self.session().handle
    }

    pub fn gate(&self) -> &ThrottleGate {
        &self.inner.gate
    }

    fn session(&self) -> MutexGuard<'_, DisplaySession> {
        self.inner.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn weak(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Consult the throttle gate and, if allowed, schedule the first display
    /// after the initial delay. Returns whether a display was scheduled.
    pub fn init(&self) -> bool {
        if !self.inner.gate.may_show() {
            info!("Notification throttled; nothing scheduled");
            return false;
        }

        let delay = self.inner.config.initial_delay();
        let weak = self.weak();
        let task = ScheduledTask::spawn("initial-delay", delay, move |id| async move {
            if let Some(controller) = Self::from_weak(&weak) {
                controller.fire_initial_delay(id).await;
            }
        });

        let mut session = self.session();
        session.cancel_initial_delay();
        session.initial_delay = Some(task);
        if session.phase == Phase::Idle {
            session.phase = Phase::Scheduled;
        }
        info!("Notification scheduled in {:?}", delay);
        true
    }

    async fn fire_initial_delay(&self, id: TimerId) {
        {
            let mut session = self.session();
            if !DisplaySession::claim(&mut session.initial_delay, id) {
                return;
            }
        }

        // Phase stays Scheduled until show() moves it on
        let outcome = self.show().await;
        if outcome != ShowOutcome::Shown {
            let mut session = self.session();
            if session.phase == Phase::Scheduled && session.initial_delay.is_none() {
                session.phase = Phase::Idle;
            }
        }
    }

    /// Resolve content and put a notification on the page, unless one is
    /// already visible or the display ceiling is reached.
    pub async fn show(&self) -> ShowOutcome {
        let epoch = {
            let mut session = self.session();
            if let Err(outcome) = session.admit(self.inner.config.max_notifications) {
                debug!("Show skipped: {:?}", outcome);
                return outcome;
            }
            // A direct show consumes the pending initial delay
            session.cancel_initial_delay();
            session.phase = Phase::Resolving;
            session.epoch
        };

        let mut guard = ResolvingGuard {
            session: &self.inner.session,
            epoch,
            armed: true,
        };
        let payload = self.inner.resolver.resolve().await;
        guard.disarm();

        let mut session = self.session();
        if session.epoch != epoch {
            debug!("Discarding notification resolved for a destroyed instance");
            return ShowOutcome::Superseded;
        }

        let handle = match self.inner.renderer.materialize(&payload, &self.inner.config) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Failed to render notification: {}", e);
                session.phase = Phase::Idle;
                return ShowOutcome::RenderFailed;
            }
        };

        session.handle = Some(handle);
        session.shown_count += 1;
        session.visible = true;
        session.phase = Phase::Visible;
        self.inner.gate.mark_shown();

        if self.inner.config.close_button || self.inner.config.pause_on_hover {
            let (tx, rx) = mpsc::unbounded_channel();
            self.inner.renderer.subscribe(&handle, tx);
            session.listener = Some(tokio::spawn(Self::listen(self.weak(), handle, rx)));
        }

        if self.inner.config.auto_close {
            session.auto_close = Some(self.arm_auto_close());
        }

        info!(
            "Showing notification {} ({}/{}): {}",
            handle, session.shown_count, self.inner.config.max_notifications, payload.message
        );
        ShowOutcome::Shown
    }

    fn arm_auto_close(&self) -> ScheduledTask {
        let weak = self.weak();
        ScheduledTask::spawn("auto-close", self.inner.config.auto_close_after(), move |id| async move {
            if let Some(controller) = Self::from_weak(&weak) {
                controller.fire_auto_close(id);
            }
        })
    }

    fn fire_auto_close(&self, id: TimerId) {
        let mut session = self.session();
        if !DisplaySession::claim(&mut session.auto_close, id) || !session.visible {
            return;
        }
        self.hide_locked(&mut session);
    }

    /// Start dismissing the visible notification. No-op when nothing is visible
    /// or a dismissal is already running.
    pub fn hide(&self) {
        let mut session = self.session();
        self.hide_locked(&mut session);
    }

    fn hide_locked(&self, session: &mut DisplaySession) {
        if !session.visible || session.phase != Phase::Visible {
            return;
        }

        session.cancel_auto_close();
        if let Some(handle) = session.handle {
            self.inner.renderer.play_exit(&handle);
        }
        session.phase = Phase::Dismissing;

        let weak = self.weak();
        session.exit = Some(ScheduledTask::spawn(
            "exit-animation",
            self.inner.config.exit_animation(),
            move |id| async move {
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.fire_exit(id);
                }
            },
        ));
        debug!("Dismissing notification");
    }

    fn fire_exit(&self, id: TimerId) {
        let mut session = self.session();
        if !DisplaySession::claim(&mut session.exit, id) {
            return;
        }
        if let Some(handle) = session.handle.take() {
            self.inner.renderer.detach(&handle);
            info!("Notification {} dismissed", handle);
        }
        if let Some(listener) = session.listener.take() {
            listener.abort();
        }
        session.visible = false;
        session.phase = Phase::Idle;
    }

    async fn listen(weak: Weak<Inner>, handle: RenderHandle, mut events: mpsc::UnboundedReceiver<Interaction>) {
        while let Some(interaction) = events.recv().await {
            let Some(controller) = Self::from_weak(&weak) else {
                break;
            };
            controller.handle_interaction(handle, interaction);
        }
    }

    fn handle_interaction(&self, handle: RenderHandle, interaction: Interaction) {
        let mut session = self.session();
        if session.handle != Some(handle) {
            return;
        }

        let config = &self.inner.config;
        match interaction {
            Interaction::CloseRequested => {
                if config.close_button {
                    self.hide_locked(&mut session);
                }
            }
            Interaction::PointerEnter => {
                if config.pause_on_hover && session.auto_close.is_some() {
                    debug!("Pointer entered, pausing auto-close");
                    session.cancel_auto_close();
                }
            }
            Interaction::PointerLeave => {
                if config.pause_on_hover
                    && config.auto_close
                    && session.visible
                    && session.phase == Phase::Visible
                {
                    debug!("Pointer left, restarting auto-close");
                    session.cancel_auto_close();
                    session.auto_close = Some(self.arm_auto_close());
                }
            }
        }
    }

    /// Tear down immediately: cancel every timer, detach any element, and reset
    /// the display count. Persisted throttle state is left untouched.
    pub fn destroy(&self) {
        let mut session = self.session();
        session.cancel_all();
        if let Some(handle) = session.handle.take() {
            self.inner.renderer.detach(&handle);
        }
        session.visible = false;
        session.phase = Phase::Idle;
        session.shown_count = 0;
        session.epoch += 1;
        info!("Notification instance destroyed");
    }
}

/// Returns the session to idle when a `show` future is dropped while its
/// content is still resolving.
struct ResolvingGuard<'a> {
    session: &'a Mutex<DisplaySession>,
    epoch: u64,
    armed: bool,
}

impl ResolvingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if session.epoch == self.epoch && session.phase == Phase::Resolving {
            debug!("Show abandoned while resolving content");
            session.phase = Phase::Idle;
        }
    }
}

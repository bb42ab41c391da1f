// ABOUTME: Integration tests for the notification lifecycle state machine
// Timers run on a paused tokio clock so delays and auto-close are deterministic

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use rand::rngs::mock::StepRng;
use serde_json::{json, Value};
use social_proof::config::{DataSource, NotificationConfig, Theme};
use social_proof::content::Transport;
use social_proof::error::TransportError;
use social_proof::models::NotificationPayload;
use social_proof::render::{HtmlRenderer, Interaction};
use social_proof::throttle::{KeyValueStore, ManualClock, MemoryStore, LAST_SHOWN_KEY};
use social_proof::{NotificationController, Phase, ShowOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Harness {
    controller: NotificationController,
    renderer: Arc<HtmlRenderer>,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
}

fn harness(config: NotificationConfig) -> Harness {
    harness_with_store(config, Arc::new(MemoryStore::new()))
}

fn harness_with_store(config: NotificationConfig, store: Arc<MemoryStore>) -> Harness {
    let renderer = Arc::new(HtmlRenderer::new(&config.theme));
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()));
    let controller = NotificationController::builder(config)
        .with_store(store.clone())
        .with_clock(clock.clone())
        .with_renderer(renderer.clone())
        .with_rng(Box::new(StepRng::new(0, 0)))
        .build();
    Harness {
        controller,
        renderer,
        store,
        clock,
    }
}

fn config() -> NotificationConfig {
    NotificationConfig {
        initial_delay: 1000,
        auto_close_timeout: 8000,
        animation_duration: 300,
        ..Default::default()
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn test_init_shows_after_initial_delay() {
    let h = harness(config());

    assert!(h.controller.init());
    assert_eq!(h.controller.phase(), Phase::Scheduled);
    assert_eq!(h.controller.pending_timers(), 1);

    sleep(ms(999)).await;
    assert!(!h.controller.is_visible());
    assert!(h.renderer.attached().is_empty());

    sleep(ms(2)).await;
    assert!(h.controller.is_visible());
    assert_eq!(h.controller.phase(), Phase::Visible);
    assert_eq!(h.controller.shown_count(), 1);

    let attached = h.renderer.attached();
    assert_eq!(attached.len(), 1);
    assert!(attached[0].markup.contains("Two people bought this in the last hour!"));
    assert_eq!(
        h.store.get(LAST_SHOWN_KEY).unwrap().as_deref(),
        Some("2024-06-01T09:00:00.000Z")
    );
}

#[tokio::test(start_paused = true)]
async fn test_throttled_instance_stays_idle() {
    let store = Arc::new(MemoryStore::with_value(LAST_SHOWN_KEY, "2024-06-01T08:00:00.000Z"));
    let h = harness_with_store(config(), store);

    assert!(!h.controller.init());
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert_eq!(h.controller.pending_timers(), 0);

    sleep(Duration::from_secs(60)).await;
    assert!(h.renderer.attached().is_empty());
    assert_eq!(h.controller.shown_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_second_show_while_visible_is_noop() {
    // Room for a second display, so only visibility can reject it
    let h = harness(NotificationConfig {
        max_notifications: 2,
        ..config()
    });

    assert_eq!(h.controller.show().await, ShowOutcome::Shown);
    h.clock.advance(ChronoDuration::hours(1));
    assert_eq!(h.controller.show().await, ShowOutcome::AlreadyVisible);

    assert_eq!(h.renderer.attached().len(), 1);
    assert_eq!(h.controller.shown_count(), 1);
    // markShown ran only for the first display
    assert_eq!(
        h.store.get(LAST_SHOWN_KEY).unwrap().as_deref(),
        Some("2024-06-01T09:00:00.000Z")
    );
}

#[tokio::test(start_paused = true)]
async fn test_shown_count_never_exceeds_ceiling() {
    let h = harness(NotificationConfig {
        max_notifications: 2,
        auto_close_timeout: 1000,
        ..config()
    });

    let mut outcomes = Vec::new();
    for _ in 0..5 {
        outcomes.push(h.controller.show().await);
        assert!(h.controller.shown_count() <= 2);
        sleep(Duration::from_secs(2)).await;
    }

    assert_eq!(
        outcomes,
        vec![
            ShowOutcome::Shown,
            ShowOutcome::Shown,
            ShowOutcome::LimitReached,
            ShowOutcome::LimitReached,
            ShowOutcome::LimitReached,
        ]
    );
    assert_eq!(h.controller.shown_count(), 2);
    assert!(h.renderer.attached().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_auto_close_then_exit_animation() {
    let h = harness(config());
    h.controller.show().await;

    sleep(ms(7999)).await;
    assert_eq!(h.controller.phase(), Phase::Visible);

    sleep(ms(2)).await;
    assert_eq!(h.controller.phase(), Phase::Dismissing);
    assert!(h.controller.is_visible());
    assert!(h.renderer.attached()[0].hiding);
    assert_eq!(h.controller.pending_timers(), 1);

    sleep(ms(300)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert!(!h.controller.is_visible());
    assert!(h.renderer.attached().is_empty());
    assert_eq!(h.controller.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_auto_close_disabled_keeps_notification() {
    let h = harness(NotificationConfig {
        auto_close: false,
        ..config()
    });
    h.controller.show().await;
    assert_eq!(h.controller.pending_timers(), 0);

    sleep(Duration::from_secs(3600)).await;
    assert!(h.controller.is_visible());
}

#[tokio::test(start_paused = true)]
async fn test_hover_resets_auto_close_to_full_timeout() {
    let h = harness(NotificationConfig {
        pause_on_hover: true,
        ..config()
    });
    h.controller.show().await;
    let handle = h.controller.current_handle().unwrap();

    sleep(Duration::from_secs(5)).await;
    assert!(h.renderer.interact(&handle, Interaction::PointerEnter));
    sleep(ms(1)).await;
    assert_eq!(h.controller.pending_timers(), 0);

    // Paused: well past the original deadline
    sleep(Duration::from_secs(10)).await;
    assert_eq!(h.controller.phase(), Phase::Visible);

    assert!(h.renderer.interact(&handle, Interaction::PointerLeave));
    sleep(ms(1)).await;
    assert_eq!(h.controller.pending_timers(), 1);

    // Fresh full timeout, not the 3s that were left
    sleep(ms(7900)).await;
    assert_eq!(h.controller.phase(), Phase::Visible);

    sleep(ms(200)).await;
    assert_eq!(h.controller.phase(), Phase::Dismissing);
}

#[tokio::test(start_paused = true)]
async fn test_hover_ignored_without_pause_on_hover() {
    let h = harness(config());
    h.controller.show().await;
    let handle = h.controller.current_handle().unwrap();

    sleep(Duration::from_secs(5)).await;
    h.renderer.interact(&handle, Interaction::PointerEnter);
    sleep(ms(3100)).await;
    assert_eq!(h.controller.phase(), Phase::Dismissing);
}

#[tokio::test(start_paused = true)]
async fn test_close_button_dismisses() {
    let h = harness(config());
    h.controller.show().await;
    let handle = h.controller.current_handle().unwrap();

    assert!(h.renderer.interact(&handle, Interaction::CloseRequested));
    sleep(ms(1)).await;
    assert_eq!(h.controller.phase(), Phase::Dismissing);
    // auto-close was cancelled immediately, only the exit timer remains
    assert_eq!(h.controller.pending_timers(), 1);

    sleep(ms(300)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert!(h.renderer.attached().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_hide_when_idle_is_noop() {
    let h = harness(config());
    h.controller.hide();
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert_eq!(h.controller.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_double_hide_schedules_one_exit() {
    let h = harness(config());
    h.controller.show().await;

    h.controller.hide();
    h.controller.hide();
    assert_eq!(h.controller.pending_timers(), 1);

    sleep(ms(301)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_hide_then_destroy_resets_everything() {
    let h = harness(NotificationConfig {
        max_notifications: 1,
        ..config()
    });
    assert_eq!(h.controller.show().await, ShowOutcome::Shown);

    h.controller.hide();
    h.controller.destroy();

    assert_eq!(h.controller.shown_count(), 0);
    assert_eq!(h.controller.pending_timers(), 0);
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert!(h.renderer.attached().is_empty());

    // No stale callbacks fire afterwards
    sleep(Duration::from_secs(30)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);

    // Reusable as if newly constructed
    assert_eq!(h.controller.show().await, ShowOutcome::Shown);
    assert_eq!(h.controller.shown_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_destroy_cancels_pending_initial_delay() {
    let h = harness(config());
    h.controller.init();
    h.controller.destroy();

    sleep(Duration::from_secs(5)).await;
    assert!(h.renderer.attached().is_empty());
    assert_eq!(h.controller.shown_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_direct_show_consumes_initial_delay() {
    let h = harness(NotificationConfig {
        initial_delay: 10_000,
        ..config()
    });
    h.controller.init();
    assert_eq!(h.controller.show().await, ShowOutcome::Shown);
    // Only the auto-close timer is pending
    assert_eq!(h.controller.pending_timers(), 1);

    sleep(Duration::from_secs(20)).await;
    assert_eq!(h.controller.shown_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_render_failure_does_not_mark_shown() {
    let h = harness(NotificationConfig {
        local_data: vec![NotificationPayload::new("   ", None)],
        ..config()
    });

    assert_eq!(h.controller.show().await, ShowOutcome::RenderFailed);
    assert_eq!(h.controller.shown_count(), 0);
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert!(h.store.get(LAST_SHOWN_KEY).unwrap().is_none());
}

struct SlowTransport;

#[async_trait]
impl Transport for SlowTransport {
    async fn fetch_json(&self, _url: &str) -> Result<Value, TransportError> {
        sleep(Duration::from_secs(5)).await;
        Ok(json!({"message": "Fetched slowly", "timestamp": "today"}))
    }
}

fn slow_harness() -> Harness {
    let config = NotificationConfig {
        data_source: DataSource::Api,
        api_url: Some("https://proof.example.com/feed".to_string()),
        theme: Theme::Bootstrap,
        ..config()
    };
    let renderer = Arc::new(HtmlRenderer::new(&config.theme));
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()));
    let controller = NotificationController::builder(config)
        .with_store(store.clone())
        .with_clock(clock.clone())
        .with_renderer(renderer.clone())
        .with_transport(Arc::new(SlowTransport))
        .build();
    Harness {
        controller,
        renderer,
        store,
        clock,
    }
}

#[tokio::test(start_paused = true)]
async fn test_remote_content_is_rendered() {
    let h = slow_harness();
    assert_eq!(h.controller.show().await, ShowOutcome::Shown);

    let attached = h.renderer.attached();
    assert!(attached[0].markup.contains("Fetched slowly"));
    assert!(attached[0].markup.contains("toast show"));
}

#[tokio::test(start_paused = true)]
async fn test_show_during_resolution_is_rejected() {
    let h = slow_harness();
    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.show().await });

    sleep(Duration::from_secs(1)).await;
    assert_eq!(h.controller.phase(), Phase::Resolving);
    assert_eq!(h.controller.show().await, ShowOutcome::AlreadyVisible);

    assert_eq!(first.await.unwrap(), ShowOutcome::Shown);
    assert_eq!(h.renderer.attached().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_destroy_during_resolution_discards_content() {
    let h = slow_harness();
    let controller = h.controller.clone();
    let first = tokio::spawn(async move { controller.show().await });

    sleep(Duration::from_secs(1)).await;
    h.controller.destroy();

    assert_eq!(first.await.unwrap(), ShowOutcome::Superseded);
    assert!(h.renderer.attached().is_empty());
    assert!(h.store.get(LAST_SHOWN_KEY).unwrap().is_none());
    assert_eq!(h.controller.shown_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_show_leaves_instance_reusable() {
    let h = slow_harness();

    let abandoned = tokio::time::timeout(Duration::from_secs(1), h.controller.show()).await;
    assert!(abandoned.is_err());
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert_eq!(h.controller.shown_count(), 0);

    sleep(Duration::from_secs(60)).await;
    assert!(h.renderer.attached().is_empty());

    assert_eq!(h.controller.show().await, ShowOutcome::Shown);
    assert_eq!(h.controller.shown_count(), 1);
    assert_eq!(h.renderer.attached().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_delayed_display_never_reports_idle_while_starting() {
    let h = slow_harness();
    assert!(h.controller.init());

    sleep(ms(1001)).await;
    assert_eq!(h.controller.phase(), Phase::Resolving);
    assert_eq!(h.controller.pending_timers(), 0);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(h.controller.phase(), Phase::Visible);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_delayed_display_returns_to_idle() {
    let h = harness(NotificationConfig {
        save_to_storage: false,
        auto_close_timeout: 1000,
        ..config()
    });

    assert_eq!(h.controller.show().await, ShowOutcome::Shown);
    sleep(Duration::from_secs(2)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);

    // Ceiling already reached, so the delayed display is turned away
    assert!(h.controller.init());
    sleep(Duration::from_secs(2)).await;
    assert_eq!(h.controller.phase(), Phase::Idle);
    assert_eq!(h.controller.pending_timers(), 0);
    assert_eq!(h.controller.shown_count(), 1);
}

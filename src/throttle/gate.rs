// ABOUTME: Throttle gate deciding whether a notification may be shown at all
// Reads and writes the last-shown timestamp; every storage failure fails open

use super::clock::Clock;
use super::store::KeyValueStore;
use crate::config::{NotificationConfig, DEFAULT_MIN_TIME_BETWEEN};
use crate::error::recovery;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key holding the ISO-8601 time of the last successful display.
pub const LAST_SHOWN_KEY: &str = "spn_last_shown";

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

pub struct ThrottleGate {
    enabled: bool,
    min_interval_hours: f64,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ThrottleGate {
    pub fn new(config: &NotificationConfig, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let configured = config.min_time_between;
        let min_interval_hours = if configured.is_finite() && configured >= 0.0 {
            configured
        } else {
            warn!(
                "Invalid minTimeBetween {}, falling back to {}h",
                configured, DEFAULT_MIN_TIME_BETWEEN
            );
            DEFAULT_MIN_TIME_BETWEEN
        };

        Self {
            enabled: config.save_to_storage,
            min_interval_hours,
            store,
            clock,
        }
    }

    /// True when enough time has passed since the last display, or when there
    /// is no usable record of one.
    pub fn may_show(&self) -> bool {
        if !self.enabled {
            return true;
        }

        let Some(last_shown) = self.last_shown() else {
            debug!("No previous display recorded, allowing notification");
            return true;
        };

        let elapsed = self.clock.now().signed_duration_since(last_shown);
        let elapsed_hours = elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR;
        let allowed = elapsed_hours >= self.min_interval_hours;
        info!(
            "Last notification {:.2}h ago (minimum {}h): {}",
            elapsed_hours,
            self.min_interval_hours,
            if allowed { "allowed" } else { "throttled" }
        );
        allowed
    }

    /// Parsed last-shown time. Unreadable or malformed records read as absent.
    pub fn last_shown(&self) -> Option<DateTime<Utc>> {
        let raw = recovery::read_or_absent(LAST_SHOWN_KEY, self.store.get(LAST_SHOWN_KEY))?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(time) => Some(time.with_timezone(&Utc)),
            Err(e) => {
                debug!("Ignoring malformed last-shown record '{}': {}", raw, e);
                None
            }
        }
    }

    /// Record a successful display. Write failures are logged and dropped.
    pub fn mark_shown(&self) {
        if !self.enabled {
            return;
        }
        let stamp = self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true);
        recovery::swallow_write(LAST_SHOWN_KEY, self.store.set(LAST_SHOWN_KEY, &stamp));
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

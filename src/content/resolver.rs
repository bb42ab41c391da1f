// ABOUTME: Content resolver producing one notification payload per display attempt
// Picks from the configured list, fetches from a remote endpoint, or synthesizes text

use super::transport::Transport;
use super::vocabulary::{ACTIONS, COUNTS, NUMBER_PLACEHOLDER, NUMBER_RANGE, TIMEFRAMES};
use crate::config::{DataSource, NotificationConfig};
use crate::error::{recovery, TransportError};
use crate::models::NotificationPayload;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub type SharedRng = Mutex<Box<dyn RngCore + Send>>;

pub struct ContentResolver {
    config: Arc<NotificationConfig>,
    transport: Arc<dyn Transport>,
    rng: SharedRng,
}

impl ContentResolver {
    pub fn new(
        config: Arc<NotificationConfig>,
        transport: Arc<dyn Transport>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            config,
            transport,
            rng: Mutex::new(rng),
        }
    }

    /// Resolve the payload for one display. Never fails: remote errors fall
    /// back to generated content.
    pub async fn resolve(&self) -> NotificationPayload {
        match self.config.data_source {
            DataSource::Local => {
                if let Some(payload) = self.pick_local() {
                    return payload;
                }
            }
            DataSource::Api => {
                if let Some(url) = self.config.remote_endpoint() {
                    let fetched = self.fetch_remote(url).await;
                    return recovery::payload_or_fallback(url, fetched, || self.generate());
                }
            }
        }
        self.generate()
    }

    fn pick_local(&self) -> Option<NotificationPayload> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.config.local_data.choose(&mut **rng).cloned()
    }

    async fn fetch_remote(&self, url: &str) -> Result<NotificationPayload, TransportError> {
        let body = self.transport.fetch_json(url).await?;
        serde_json::from_value(body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// Build a message from the word lists and the configured template.
    pub fn generate(&self) -> NotificationPayload {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let rng = &mut **rng;

        let action = ACTIONS.choose(rng).copied().unwrap_or_default();
        let timeframe = TIMEFRAMES.choose(rng).copied().unwrap_or_default();
        let count = COUNTS.choose(rng).copied().unwrap_or_default();

        let timeframe = if timeframe.contains(NUMBER_PLACEHOLDER) {
            let n = rng.gen_range(NUMBER_RANGE);
            timeframe.replacen(NUMBER_PLACEHOLDER, &n.to_string(), 1)
        } else {
            timeframe.to_string()
        };

        let message = fill_template(&self.config.message_format, count, action, &timeframe);
        debug!("Generated notification: {}", message);
        NotificationPayload::just_now(message)
    }
}

fn fill_template(template: &str, count: &str, action: &str, timeframe: &str) -> String {
    template
        .replace("{count}", count)
        .replace("{action}", action)
        .replace("{timeframe}", timeframe)
}

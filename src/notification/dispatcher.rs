//! The notification dispatcher fans a single failure out to every channel
//! that is both enabled in the registry and validly configured.

use crate::core::{Failure, NotificationChannel};
use crate::notification::{NotificationRegistry, SendError};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Sends failure notifications to the registered channels, in order.
pub struct NotificationDispatcher {
    registry: Arc<NotificationRegistry>,
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    /// Creates a new `NotificationDispatcher`.
    pub fn new(
        registry: Arc<NotificationRegistry>,
        channels: Vec<Arc<dyn NotificationChannel>>,
    ) -> Self {
        Self { registry, channels }
    }

    /// Appends a channel; it is tried after the existing ones.
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn registry(&self) -> &Arc<NotificationRegistry> {
        &self.registry
    }

    /// Sends `failure` to every enabled, configured channel.
    ///
    /// Disabled and unconfigured channels are skipped without an error. A
    /// channel that fails does not stop the remaining ones; every error is
    /// logged and returned to the caller.
    #[instrument(skip_all, fields(kind = %failure.kind))]
    pub async fn notify(&self, failure: &Failure) -> Vec<SendError> {
        let mut errors = Vec::new();

        for channel in &self.channels {
            let name = channel.name();
            if !self.registry.is_enabled(name) {
                debug!(channel = name, "Skipping notification: channel disabled");
                continue;
            }
            if !channel.is_configured() {
                debug!(channel = name, "Skipping notification: channel not configured");
                continue;
            }

            match channel.send(failure).await {
                Ok(()) => {
                    info!(channel = name, "Notification sent");
                    metrics::counter!("notifications_sent_total", "channel" => name.to_string())
                        .increment(1);
                }
                Err(e) => {
                    error!(channel = name, error = %e, "Notification failed");
                    metrics::counter!("notifications_failed_total", "channel" => name.to_string())
                        .increment(1);
                    errors.push(e);
                }
            }
        }

        errors
    }
}

//! Per-channel enabled flags.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Maps channel names to whether notifications should go to them.
///
/// Unknown names are disabled. The registry is shared behind an `Arc` so
/// channels can be toggled while the supervisor is running; readers always
/// see the latest value.
#[derive(Debug, Default)]
pub struct NotificationRegistry {
    flags: RwLock<HashMap<String, bool>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables notifications for `channel`, creating the entry if needed.
    pub fn enable(&self, channel: &str) {
        info!(channel, "Enabling notifications");
        self.set(channel, true);
    }

    /// Disables notifications for `channel`.
    pub fn disable(&self, channel: &str) {
        info!(channel, "Disabling notifications");
        self.set(channel, false);
    }

    pub fn is_enabled(&self, channel: &str) -> bool {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .copied()
            .unwrap_or(false)
    }

    /// Returns a sorted copy of every known flag.
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.flags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, enabled)| (name.clone(), *enabled))
            .collect()
    }

    fn set(&self, channel: &str, enabled: bool) {
        self.flags
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.to_string(), enabled);
    }
}

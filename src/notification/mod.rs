//! Delivery of failure notifications to the enabled channels.
//!
//! The registry records which channels the operator wants to hear from, each
//! channel knows whether its own credentials are usable, and the dispatcher
//! only sends where both agree.
pub mod dispatcher;
pub mod email;
pub mod pushover;
pub mod registry;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use thiserror::Error;

pub use crate::core::NotificationChannel;
pub use dispatcher::NotificationDispatcher;
pub use email::{EmailChannel, MailConfig, MailMessage, MailTransport, UnimplementedMailTransport};
pub use pushover::{PushIdentity, PushoverChannel};
pub use registry::NotificationRegistry;

/// Errors produced when a channel tries to deliver a notification.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("{channel} channel is not configured")]
    NotConfigured { channel: String },

    #[error("failed to send {channel} notification: {reason}")]
    Failed { channel: String, reason: String },

    #[error("{channel} delivery is not implemented")]
    Unimplemented { channel: String },

    #[error("notification request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl SendError {
    pub fn not_configured(channel: impl Into<String>) -> Self {
        SendError::NotConfigured {
            channel: channel.into(),
        }
    }

    pub fn failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        SendError::Failed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

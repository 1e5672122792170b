//! Email notification channel.

use crate::core::{Failure, NotificationChannel, ALERT_TITLE};
use crate::notification::SendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, instrument};

pub const EMAIL_CHANNEL: &str = "email";

/// Mail server credentials and the destination address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailConfig {
    pub server: String,
    pub user: String,
    pub pass: String,
    /// Where notifications are delivered.
    pub address: String,
}

impl MailConfig {
    /// All four fields are required; an empty one makes the config unusable.
    pub fn is_complete(&self) -> bool {
        !self.server.is_empty()
            && !self.user.is_empty()
            && !self.pass.is_empty()
            && !self.address.is_empty()
    }
}

/// A composed email, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    fn for_failure(config: &MailConfig, failure: &Failure) -> Self {
        Self {
            from: config.user.clone(),
            to: config.address.clone(),
            subject: ALERT_TITLE.to_string(),
            body: format!(
                "{}\n\nkind: {}\ntime: {}",
                failure.message,
                failure.kind,
                failure.occurred_at.to_rfc3339()
            ),
        }
    }
}

/// Hands a composed message to a mail server.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, config: &MailConfig, message: &MailMessage) -> Result<(), SendError>;
}

/// The transport used when no SMTP integration has been plugged in.
///
/// Every delivery fails with `SendError::Unimplemented`, so an enabled email
/// channel shows up as a failed notification instead of silently dropping it.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnimplementedMailTransport;

#[async_trait]
impl MailTransport for UnimplementedMailTransport {
    async fn deliver(&self, config: &MailConfig, message: &MailMessage) -> Result<(), SendError> {
        debug!(
            server = %config.server,
            to = %message.to,
            subject = %message.subject,
            "No mail transport installed"
        );
        Err(SendError::Unimplemented {
            channel: EMAIL_CHANNEL.to_string(),
        })
    }
}

/// Sends failure notifications by email through a `MailTransport`.
pub struct EmailChannel {
    config: RwLock<Option<MailConfig>>,
    transport: Arc<dyn MailTransport>,
}

impl EmailChannel {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            config: RwLock::new(None),
            transport,
        }
    }

    /// Records the mail settings. No connection is attempted here.
    pub fn configure(&self, config: MailConfig) {
        info!(server = %config.server, address = %config.address, "Configuring email channel");
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    fn current_config(&self) -> Option<MailConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for EmailChannel {
    fn default() -> Self {
        Self::new(Arc::new(UnimplementedMailTransport))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        EMAIL_CHANNEL
    }

    fn is_configured(&self) -> bool {
        self.current_config()
            .is_some_and(|config| config.is_complete())
    }

    #[instrument(skip_all, fields(channel = EMAIL_CHANNEL))]
    async fn send(&self, failure: &Failure) -> Result<(), SendError> {
        let config = match self.current_config() {
            Some(config) if config.is_complete() => config,
            _ => return Err(SendError::not_configured(EMAIL_CHANNEL)),
        };

        let message = MailMessage::for_failure(&config, failure);
        self.transport.deliver(&config, &message).await?;
        info!(to = %message.to, "Sent email notification");
        Ok(())
    }
}

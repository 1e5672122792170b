//! Wiring of the registry, channels, dispatcher and supervisor from a `Config`.

use crate::{
    config::Config,
    core::NotificationChannel,
    notification::{
        email::EMAIL_CHANNEL, pushover::PUSHOVER_CHANNEL, EmailChannel, MailTransport,
        NotificationDispatcher, NotificationRegistry, PushoverChannel,
        UnimplementedMailTransport,
    },
    supervisor::Supervisor,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// A fully wired supervisor together with handles to its channels.
///
/// The registry and channels stay reachable so the embedding process can
/// toggle or reconfigure them while the supervisor is running.
pub struct App {
    registry: Arc<NotificationRegistry>,
    email: Arc<EmailChannel>,
    pushover: Arc<PushoverChannel>,
    supervisor: Supervisor,
}

impl App {
    /// Creates a new `AppBuilder` to construct an `App`.
    pub fn builder(config: Config) -> AppBuilder {
        AppBuilder::new(config)
    }

    pub fn registry(&self) -> &Arc<NotificationRegistry> {
        &self.registry
    }

    pub fn email(&self) -> &Arc<EmailChannel> {
        &self.email
    }

    pub fn pushover(&self) -> &Arc<PushoverChannel> {
        &self.pushover
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }
}

/// Builder for the main application.
///
/// Components that talk to the outside world can be overridden for testing.
pub struct AppBuilder {
    config: Config,
    mail_transport_override: Option<Arc<dyn MailTransport>>,
    extra_channels: Vec<Arc<dyn NotificationChannel>>,
}

impl AppBuilder {
    /// Creates a new `AppBuilder` with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mail_transport_override: None,
            extra_channels: Vec::new(),
        }
    }

    /// Overrides the mail transport used by the email channel.
    pub fn mail_transport_override(mut self, transport: Arc<dyn MailTransport>) -> Self {
        self.mail_transport_override = Some(transport);
        self
    }

    /// Registers an additional channel after email and Pushover.
    ///
    /// It is only used once enabled in the registry under its own name.
    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.extra_channels.push(channel);
        self
    }

    pub fn build(self) -> Result<App> {
        let config = self.config;

        let registry = Arc::new(NotificationRegistry::new());
        set_flag(&registry, EMAIL_CHANNEL, config.email.enabled);
        set_flag(&registry, PUSHOVER_CHANNEL, config.pushover.enabled);

        let transport = self
            .mail_transport_override
            .unwrap_or_else(|| Arc::new(UnimplementedMailTransport));
        let email = Arc::new(EmailChannel::new(transport));
        email.configure(config.email.mail_config());
        if config.email.enabled && !email.is_configured() {
            warn!("Email notifications enabled but server, user, pass or address is missing");
        }

        let pushover = Arc::new(PushoverChannel::with_api_url(config.pushover.api_url.clone())?);
        let identity = config.pushover.identity();
        if !pushover.validate(Some(&identity)) && config.pushover.enabled {
            warn!("Pushover notifications enabled but token or user is missing");
        }

        let mut dispatcher = NotificationDispatcher::new(
            registry.clone(),
            vec![
                email.clone() as Arc<dyn NotificationChannel>,
                pushover.clone() as Arc<dyn NotificationChannel>,
            ],
        );
        for channel in self.extra_channels {
            dispatcher = dispatcher.with_channel(channel);
        }

        info!(channels = ?registry.snapshot(), "Notification channels ready");

        Ok(App {
            registry,
            email,
            pushover,
            supervisor: Supervisor::new(Arc::new(dispatcher)),
        })
    }
}

fn set_flag(registry: &NotificationRegistry, channel: &str, enabled: bool) {
    if enabled {
        registry.enable(channel);
    } else {
        registry.disable(channel);
    }
}

//! A client for sending push notifications through Pushover.

use crate::core::{Failure, NotificationChannel, ALERT_TITLE};
use crate::notification::SendError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{error, info, instrument, warn};

pub const PUSHOVER_CHANNEL: &str = "pushover";
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Application token and user key for the Pushover API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PushIdentity {
    pub token: String,
    pub user: String,
}

/// An identity that passed validation, bound to the client it sends through.
#[derive(Debug)]
struct PushoverSession {
    token: String,
    user: String,
    api_url: String,
    client: reqwest::Client,
}

impl PushoverSession {
    fn authenticate(identity: &PushIdentity, api_url: &str, client: reqwest::Client) -> Self {
        Self {
            token: identity.token.clone(),
            user: identity.user.clone(),
            api_url: api_url.to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    errors: Vec<String>,
}

/// Sends failure notifications as titled Pushover messages.
pub struct PushoverChannel {
    api_url: String,
    client: reqwest::Client,
    session: RwLock<Option<Arc<PushoverSession>>>,
}

impl PushoverChannel {
    /// Creates a channel posting to the public Pushover API.
    pub fn new() -> Result<Self, SendError> {
        Self::with_api_url(PUSHOVER_API_URL)
    }

    /// Creates a channel posting to `api_url` instead of the public API.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_url: api_url.into(),
            client,
            session: RwLock::new(None),
        })
    }

    /// Checks `identity` and caches a session for it.
    ///
    /// Returns `false` and drops any previously cached session when the
    /// identity is missing or has an empty token or user, so a stale session
    /// is never reused after the credentials change.
    pub fn validate(&self, identity: Option<&PushIdentity>) -> bool {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        match identity {
            Some(identity) if !identity.token.is_empty() && !identity.user.is_empty() => {
                *session = Some(Arc::new(PushoverSession::authenticate(
                    identity,
                    &self.api_url,
                    self.client.clone(),
                )));
                info!("Pushover credentials validated");
                true
            }
            _ => {
                if session.take().is_some() {
                    warn!("Pushover credentials invalid, discarding cached session");
                }
                false
            }
        }
    }

    fn current_session(&self) -> Option<Arc<PushoverSession>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn post(session: &PushoverSession, message: &str) -> Result<(), SendError> {
        let form = [
            ("token", session.token.as_str()),
            ("user", session.user.as_str()),
            ("title", ALERT_TITLE),
            ("message", message),
        ];
        let response = session
            .client
            .post(&session.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request to Pushover failed");
                SendError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            error!(status = %status, body = %body, "Pushover rejected the notification");
            return Err(SendError::failed(
                PUSHOVER_CHANNEL,
                format!("status {}, body: {}", status, body),
            ));
        }

        match serde_json::from_str::<PushoverResponse>(&body) {
            Ok(parsed) if parsed.status == 1 => Ok(()),
            Ok(parsed) => Err(SendError::failed(
                PUSHOVER_CHANNEL,
                format!("provider status {}: {}", parsed.status, parsed.errors.join("; ")),
            )),
            Err(e) => Err(SendError::failed(
                PUSHOVER_CHANNEL,
                format!("unreadable response: {}", e),
            )),
        }
    }
}

#[async_trait]
impl NotificationChannel for PushoverChannel {
    fn name(&self) -> &str {
        PUSHOVER_CHANNEL
    }

    fn is_configured(&self) -> bool {
        self.current_session().is_some()
    }

    #[instrument(skip_all, fields(channel = PUSHOVER_CHANNEL))]
    async fn send(&self, failure: &Failure) -> Result<(), SendError> {
        let session = self
            .current_session()
            .ok_or_else(|| SendError::not_configured(PUSHOVER_CHANNEL))?;

        Self::post(&session, &failure.message).await?;
        info!("Sent Pushover notification");
        Ok(())
    }
}

//! Core domain types and service traits for JobWatch
//!
//! This module defines the values that flow between the supervisor and the
//! notification channels, and the trait contract every channel implements.

use crate::notification::SendError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;

/// The title (push) and subject (email) used for every failure notification.
pub const ALERT_TITLE: &str = "monitor alert";

/// What kind of failure the supervised work produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The work returned an error.
    Error,
    /// The work panicked and the supervisor recovered.
    Panic,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Error => "error",
            FailureKind::Panic => "panic",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized failure of one invocation of the supervised work.
///
/// Both plain errors and recovered panics end up here, so channels never
/// need to know how the failure was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable description, used verbatim as the notification body.
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl Failure {
    /// Builds a failure from an error returned by the work.
    ///
    /// The full error chain is rendered with `{:#}` so context added with
    /// `anyhow::Context` is not lost.
    pub fn error(err: &anyhow::Error) -> Self {
        Self::new(FailureKind::Error, format!("{:#}", err))
    }

    /// Builds a failure from the payload of a caught panic.
    pub fn panic(payload: Box<dyn Any + Send>) -> Self {
        Self::new(FailureKind::Panic, panic_message(payload.as_ref()))
    }

    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Extracts the message from a panic payload.
///
/// `panic!` with a literal produces `&'static str`, with format arguments a
/// `String`. Anything else (e.g. `std::panic::panic_any`) has no readable text.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "panic with non-string payload".to_string()
}

/// Whether the supervision loop should keep going after an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// The result of a single invocation of the supervised work.
#[derive(Debug)]
pub struct Iteration {
    pub result: anyhow::Result<()>,
    pub flow: Flow,
}

impl Iteration {
    /// The work succeeded and the loop should continue.
    pub fn ok() -> Self {
        Self {
            result: Ok(()),
            flow: Flow::Continue,
        }
    }

    /// The work failed; the failure is reported and the loop continues.
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        Self {
            result: Err(err.into()),
            flow: Flow::Continue,
        }
    }

    /// There is nothing left to run.
    pub fn stop() -> Self {
        Self {
            result: Ok(()),
            flow: Flow::Stop,
        }
    }

    /// Marks this iteration as the last one, keeping its result.
    pub fn then_stop(mut self) -> Self {
        self.flow = Flow::Stop;
        self
    }

    pub fn should_stop(&self) -> bool {
        self.flow == Flow::Stop
    }
}

impl From<anyhow::Result<()>> for Iteration {
    fn from(result: anyhow::Result<()>) -> Self {
        Self {
            result,
            flow: Flow::Continue,
        }
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// A destination for failure notifications (email, push, ...).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// The registry key for this channel (e.g., "email", "pushover").
    fn name(&self) -> &str;

    /// Whether the channel holds a complete, valid configuration.
    ///
    /// The dispatcher skips channels that return `false` here even when they
    /// are enabled in the registry.
    fn is_configured(&self) -> bool;

    /// Delivers a notification about `failure`.
    ///
    /// # Returns
    /// * `Ok(())` if the provider accepted the notification
    /// * `Err(SendError::NotConfigured)` if called without a valid configuration
    /// * `Err` for any transport or provider failure
    async fn send(&self, failure: &Failure) -> Result<(), SendError>;
}

use crate::{
    core::{Failure, NotificationChannel},
    notification::{MailConfig, MailMessage, MailTransport, SendError},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Fake channel that records every failure it is asked to send.
#[derive(Clone, Debug)]
pub struct FakeChannel {
    name: String,
    configured: Arc<AtomicBool>,
    fail_on_send: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<Failure>>>,
}

impl FakeChannel {
    /// A configured channel that accepts every send.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            configured: Arc::new(AtomicBool::new(true)),
            fail_on_send: Arc::new(AtomicBool::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail_on_send.store(fail, Ordering::SeqCst);
    }

    /// Number of times `send` was called, including failed attempts.
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_failures(&self) -> Vec<Failure> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for FakeChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn send(&self, failure: &Failure) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(failure.clone());
        if self.fail_on_send.load(Ordering::SeqCst) {
            return Err(SendError::failed(&self.name, "fake channel configured to fail"));
        }
        Ok(())
    }
}

/// Mail transport that keeps delivered messages in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingMailTransport {
    fail_on_send: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail_on_send.store(fail, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn deliver(&self, _config: &MailConfig, message: &MailMessage) -> Result<(), SendError> {
        if self.fail_on_send.load(Ordering::SeqCst) {
            return Err(SendError::failed("email", "mail server rejected the message"));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

//! Integration tests for fanning failures out to channels.

use jobwatch::notification::test_utils::FakeChannel;
use jobwatch::notification::{
    NotificationChannel, NotificationDispatcher, NotificationRegistry, PushIdentity,
    PushoverChannel, SendError,
};
use jobwatch::{Failure, FailureKind};
use std::sync::Arc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn failure() -> Failure {
    Failure::new(FailureKind::Error, "something bad has happened!")
}

#[tokio::test]
async fn test_disabled_channel_skipped_enabled_channel_sent_once() {
    // Arrange
    let registry = Arc::new(NotificationRegistry::new());
    let disabled = FakeChannel::new("email");
    let enabled = FakeChannel::new("pushover");
    registry.disable("email");
    registry.enable("pushover");

    let dispatcher = NotificationDispatcher::new(
        registry,
        vec![
            Arc::new(disabled.clone()) as Arc<dyn NotificationChannel>,
            Arc::new(enabled.clone()),
        ],
    );

    // Act
    let errors = dispatcher.notify(&failure()).await;

    // Assert
    assert!(errors.is_empty());
    assert_eq!(disabled.send_count(), 0);
    assert_eq!(enabled.send_count(), 1);
}

#[tokio::test]
async fn test_first_failure_does_not_block_second_channel() {
    let registry = Arc::new(NotificationRegistry::new());
    let failing = FakeChannel::new("email");
    let healthy = FakeChannel::new("pushover");
    failing.set_fail_on_send(true);
    registry.enable("email");
    registry.enable("pushover");

    let dispatcher = NotificationDispatcher::new(
        registry,
        vec![
            Arc::new(failing.clone()) as Arc<dyn NotificationChannel>,
            Arc::new(healthy.clone()),
        ],
    );

    let errors = dispatcher.notify(&failure()).await;

    assert_eq!(failing.send_count(), 1);
    assert_eq!(healthy.send_count(), 1);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], SendError::Failed { channel, .. } if channel == "email"));
}

#[tokio::test]
async fn test_unknown_channel_name_is_never_sent_to() {
    let registry = Arc::new(NotificationRegistry::new());
    let sms = FakeChannel::new("sms");

    let dispatcher = NotificationDispatcher::new(registry.clone(), Vec::new())
        .with_channel(Arc::new(sms.clone()));

    dispatcher.notify(&failure()).await;
    assert_eq!(sms.send_count(), 0);

    registry.enable("sms");
    dispatcher.notify(&failure()).await;
    assert_eq!(sms.send_count(), 1);
}

#[tokio::test]
async fn test_pushover_invalidated_mid_run_is_skipped() {
    // Any request reaching the server would fail the `expect(0)` on drop.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = Arc::new(NotificationRegistry::new());
    registry.enable("pushover");
    let pushover = Arc::new(PushoverChannel::with_api_url(server.uri()).unwrap());
    assert!(pushover.validate(Some(&PushIdentity {
        token: "app-token".to_string(),
        user: "user-key".to_string(),
    })));
    let dispatcher = NotificationDispatcher::new(
        registry,
        vec![pushover.clone() as Arc<dyn NotificationChannel>],
    );

    assert!(!pushover.validate(Some(&PushIdentity {
        token: "app-token".to_string(),
        user: String::new(),
    })));
    let errors = dispatcher.notify(&failure()).await;

    assert!(errors.is_empty());
}

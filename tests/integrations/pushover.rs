//! Integration tests for the Pushover channel against a mock API.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::{mount_pushover_ok, panic_then_stop, pushover_config, PUSHOVER_PATH};
use jobwatch::app::App;
use jobwatch::notification::{NotificationChannel, PushIdentity, PushoverChannel, SendError};
use jobwatch::{Failure, FailureKind};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity() -> PushIdentity {
    PushIdentity {
        token: "app-token".to_string(),
        user: "user-key".to_string(),
    }
}

#[tokio::test]
async fn test_send_before_validate_makes_no_request() {
    // Arrange
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;
    let channel =
        PushoverChannel::with_api_url(format!("{}{}", server.uri(), PUSHOVER_PATH)).unwrap();

    // Act
    let result = channel
        .send(&Failure::new(FailureKind::Error, "boom"))
        .await;

    // Assert
    assert!(matches!(result, Err(SendError::NotConfigured { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revalidation_with_empty_user_is_not_sticky() {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;
    let channel =
        PushoverChannel::with_api_url(format!("{}{}", server.uri(), PUSHOVER_PATH)).unwrap();

    assert!(channel.validate(Some(&identity())));
    assert!(!channel.validate(Some(&PushIdentity {
        user: String::new(),
        ..identity()
    })));

    let result = channel
        .send(&Failure::new(FailureKind::Error, "boom"))
        .await;
    assert!(matches!(result, Err(SendError::NotConfigured { .. })));
}

#[tokio::test]
async fn test_sends_credentials_title_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSHOVER_PATH))
        .and(body_string_contains("token=app-token"))
        .and(body_string_contains("user=user-key"))
        .and(body_string_contains("title=monitor+alert"))
        .and(body_string_contains("message=this+is+really+happening%21"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = App::builder(pushover_config(&server)).build().unwrap();
    assert!(app.pushover().is_configured());

    let summary = app.supervisor().run(panic_then_stop()).await;

    assert_eq!(summary.recovered_panics, 1);
    assert_eq!(summary.send_errors, 0);
}

#[tokio::test]
async fn test_provider_failure_is_counted_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::builder(pushover_config(&server)).build().unwrap();

    let summary = app.supervisor().run(panic_then_stop()).await;

    assert_eq!(summary.iterations, 2);
    assert_eq!(summary.send_errors, 1);
}

#[tokio::test]
async fn test_disabled_pushover_sends_nothing() {
    let server = MockServer::start().await;
    mount_pushover_ok(&server, 0).await;

    let mut config = pushover_config(&server);
    config.pushover.enabled = false;
    let app = App::builder(config).build().unwrap();

    let summary = app.supervisor().run(panic_then_stop()).await;

    assert_eq!(summary.failures, 1);
    assert_eq!(summary.send_errors, 0);
}

//! Tests for `SlackNotifier`.

use super::*;
use crate::notify::{HttpError, HttpResponse};
use crate::time::InstantSleeper;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn ok() -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(http::StatusCode::OK, b"ok".to_vec()))
    }

    fn status(code: u16, body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(
            http::StatusCode::from_u16(code).unwrap(),
            body.as_bytes().to_vec(),
        ))
    }

    fn success() -> Self {
        Self::new(vec![Self::ok()])
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn captured_payload(&self) -> serde_json::Value {
        let requests = self.captured_requests();
        let body = requests[0].body.as_deref().unwrap();
        serde_json::from_slice(body).unwrap()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

fn receiver() -> SlackReceiver {
    SlackReceiver {
        url: url::Url::parse("https://hooks.slack.com/services/T000/B000/XXX").unwrap(),
        channel: "#ops".to_string(),
        username: "ipbot".to_string(),
        icon: ":satellite:".to_string(),
    }
}

fn notification() -> Notification {
    Notification {
        interface: "eth0".to_string(),
        addresses: vec!["192.168.1.10".to_string(), "fe80::1".to_string()],
        reason: "first run".to_string(),
    }
}

fn notifier(client: MockClient) -> SlackNotifier<MockClient, InstantSleeper> {
    SlackNotifier::new(client, receiver())
        .with_retry_policy(
            RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::ZERO,
                ..RetryPolicy::default()
            },
        )
        .with_sleeper(InstantSleeper)
}

mod payload {
    use super::*;

    #[tokio::test]
    async fn posts_json_to_webhook_url() {
        let slack = notifier(MockClient::success());

        slack.notify(&notification()).await.unwrap();

        let requests = slack.client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(
            requests[0].url.as_str(),
            "https://hooks.slack.com/services/T000/B000/XXX"
        );
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn carries_channel_username_and_text() {
        let slack = notifier(MockClient::success());

        slack.notify(&notification()).await.unwrap();

        let payload = slack.client.captured_payload();
        assert_eq!(payload["channel"], "#ops");
        assert_eq!(payload["username"], "ipbot");
        assert_eq!(
            payload["text"],
            "Interface eth0 addresses: 192.168.1.10, fe80::1"
        );
    }

    #[tokio::test]
    async fn colon_icon_is_emoji() {
        let slack = notifier(MockClient::success());

        slack.notify(&notification()).await.unwrap();

        let payload = slack.client.captured_payload();
        assert_eq!(payload["icon_emoji"], ":satellite:");
        assert!(payload.get("icon_url").is_none());
    }

    #[tokio::test]
    async fn other_icon_is_url() {
        let mut settings = receiver();
        settings.icon = "https://example.com/bot.png".to_string();
        let slack = SlackNotifier::new(MockClient::success(), settings).with_sleeper(InstantSleeper);

        slack.notify(&notification()).await.unwrap();

        let payload = slack.client.captured_payload();
        assert_eq!(payload["icon_url"], "https://example.com/bot.png");
        assert!(payload.get("icon_emoji").is_none());
    }

    #[tokio::test]
    async fn empty_settings_are_omitted() {
        let mut settings = receiver();
        settings.channel.clear();
        settings.username.clear();
        settings.icon.clear();
        let slack = SlackNotifier::new(MockClient::success(), settings).with_sleeper(InstantSleeper);

        slack.notify(&notification()).await.unwrap();

        let payload = slack.client.captured_payload();
        let object = payload.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("text"));
    }

    #[tokio::test]
    async fn custom_renderer_shapes_text() {
        let slack = notifier(MockClient::success())
            .with_renderer(MessageRenderer::new("{{interface}} changed: {{reason}}"));

        slack.notify(&notification()).await.unwrap();

        assert_eq!(slack.client.captured_payload()["text"], "eth0 changed: first run");
    }

    #[tokio::test]
    async fn broken_template_fails_without_request() {
        let slack = notifier(MockClient::success())
            .with_renderer(MessageRenderer::new("{{#each addresses}}"));

        let result = slack.notify(&notification()).await;

        assert!(matches!(result, Err(NotifyError::Template(_))));
        assert_eq!(slack.client.calls(), 0);
    }
}

mod retry {
    use super::*;

    #[tokio::test]
    async fn retries_timeouts_until_success() {
        let client = MockClient::new(vec![
            Err(HttpError::Timeout),
            Err(HttpError::Timeout),
            MockClient::ok(),
        ]);
        let slack = notifier(client);

        slack.notify(&notification()).await.unwrap();

        assert_eq!(slack.client.calls(), 3);
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let client = MockClient::new(vec![MockClient::status(503, "busy"), MockClient::ok()]);
        let slack = notifier(client);

        slack.notify(&notification()).await.unwrap();

        assert_eq!(slack.client.calls(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let client = MockClient::new(vec![
            Err(HttpError::Timeout),
            Err(HttpError::Timeout),
            Err(HttpError::Timeout),
        ]);
        let slack = notifier(client);

        let result = slack.notify(&notification()).await;

        match result {
            Err(NotifyError::MaxRetriesExceeded { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected MaxRetriesExceeded, got {other:?}"),
        }
        assert_eq!(slack.client.calls(), 3);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let client = MockClient::new(vec![MockClient::status(404, "no_service")]);
        let slack = notifier(client);

        let result = slack.notify(&notification()).await;

        match result {
            Err(NotifyError::NonSuccessStatus { status, body }) => {
                assert_eq!(status, http::StatusCode::NOT_FOUND);
                assert_eq!(body.as_deref(), Some("no_service"));
            }
            other => panic!("expected NonSuccessStatus, got {other:?}"),
        }
        assert_eq!(slack.client.calls(), 1);
    }

    #[tokio::test]
    async fn single_attempt_policy_reports_max_retries() {
        let client = MockClient::new(vec![Err(HttpError::Timeout)]);
        let slack = notifier(client).with_retry_policy(RetryPolicy::single_attempt());

        let result = slack.notify(&notification()).await;

        assert!(matches!(
            result,
            Err(NotifyError::MaxRetriesExceeded { attempts: 1, .. })
        ));
    }
}

#[test]
fn describe_includes_channel() {
    assert_eq!(notifier(MockClient::success()).describe(), "slack #ops");

    let mut settings = receiver();
    settings.channel.clear();
    assert_eq!(SlackNotifier::new(MockClient::success(), settings).describe(), "slack");
}

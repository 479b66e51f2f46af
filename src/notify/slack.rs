//! Slack incoming-webhook notifier.

use serde::Serialize;

use crate::config::SlackReceiver;
use crate::time::{Sleeper, TokioSleeper};

use super::{
    HttpClient, HttpRequest, MessageRenderer, Notification, Notifier, NotifyError, RetryPolicy,
};

/// Posts notifications to a Slack incoming webhook, retrying transient
/// failures with exponential backoff.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct SlackNotifier<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    receiver: SlackReceiver,
    renderer: MessageRenderer,
    retry_policy: RetryPolicy,
}

impl<H> SlackNotifier<H, TokioSleeper> {
    /// Creates a notifier with the default template and retry policy.
    #[must_use]
    pub fn new(client: H, receiver: SlackReceiver) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            receiver,
            renderer: MessageRenderer::default(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl<H, S> SlackNotifier<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> SlackNotifier<H, S2> {
        SlackNotifier {
            client: self.client,
            sleeper,
            receiver: self.receiver,
            renderer: self.renderer,
            retry_policy: self.retry_policy,
        }
    }

    /// Sets the message renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: MessageRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the receiver settings.
    #[must_use]
    pub const fn receiver(&self) -> &SlackReceiver {
        &self.receiver
    }
}

/// Incoming-webhook JSON body. Empty settings are left out so the
/// webhook's own defaults apply.
#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_emoji: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
    text: String,
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

impl<'a> SlackPayload<'a> {
    fn new(receiver: &'a SlackReceiver, text: String) -> Self {
        let icon = non_empty(&receiver.icon);
        let is_emoji = icon.is_some_and(|i| i.starts_with(':'));
        Self {
            channel: non_empty(&receiver.channel),
            username: non_empty(&receiver.username),
            icon_emoji: icon.filter(|_| is_emoji),
            icon_url: icon.filter(|_| !is_emoji),
            text,
        }
    }
}

impl<H: HttpClient, S: Sleeper> SlackNotifier<H, S> {
    fn build_request(&self, notification: &Notification) -> Result<HttpRequest, NotifyError> {
        let text = self.renderer.render(notification)?;
        let body = serde_json::to_vec(&SlackPayload::new(&self.receiver, text))?;

        Ok(HttpRequest::post(self.receiver.url.clone())
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body(body))
    }

    async fn execute_request(&self, request: &HttpRequest) -> Result<(), NotifyError> {
        let response = self.client.request(request.clone()).await?;

        if response.is_success() {
            return Ok(());
        }

        Err(NotifyError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }

    async fn send_with_retry(&self, request: &HttpRequest) -> Result<(), NotifyError> {
        let mut attempt = 1;
        loop {
            let error = match self.execute_request(request).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            if !error.is_retryable() {
                return Err(error);
            }

            let Some(delay) = self.retry_policy.backoff_before(attempt + 1) else {
                return Err(NotifyError::MaxRetriesExceeded {
                    attempts: attempt,
                    last_error: Box::new(error),
                });
            };

            tracing::debug!(
                "Slack delivery attempt {attempt} failed ({error}), retrying in {:.1}s",
                delay.as_secs_f64()
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

impl<H: HttpClient, S: Sleeper> Notifier for SlackNotifier<H, S> {
    fn describe(&self) -> String {
        if self.receiver.channel.is_empty() {
            "slack".to_string()
        } else {
            format!("slack {}", self.receiver.channel)
        }
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let request = self.build_request(notification)?;
        self.send_with_retry(&request).await
    }
}

#[cfg(test)]
#[path = "slack_tests.rs"]
mod tests;

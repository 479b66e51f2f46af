//! Fan-out of change events to every configured receiver.

use std::future::Future;
use std::time::Duration;

use crate::config::Receiver;
use crate::detect::ChangeEvent;

use super::{
    EmailNotifier, MessageRenderer, Notification, NotifyError, ReqwestClient, RetryPolicy,
    SlackNotifier, SmtpMailer,
};

/// A destination that can be told about one interface change.
pub trait Notifier: Send + Sync {
    /// Short label for logs, e.g. `slack #ops`.
    fn describe(&self) -> String;

    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if delivery fails after any retries.
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Receivers that accepted the notification.
    pub delivered: usize,
    /// Receivers that failed.
    pub failed: usize,
}

impl DispatchReport {
    /// Adds another report's counts into this one.
    pub const fn merge(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Sends each event to every notifier in order.
///
/// A failing receiver is logged and skipped; it never stops delivery to
/// the others or aborts the run.
#[derive(Debug)]
pub struct Dispatcher<N> {
    notifiers: Vec<N>,
}

impl<N: Notifier> Dispatcher<N> {
    /// Creates a dispatcher over the given notifiers.
    #[must_use]
    pub const fn new(notifiers: Vec<N>) -> Self {
        Self { notifiers }
    }

    /// Number of receivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Returns true if there are no receivers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// The notifiers in dispatch order.
    #[must_use]
    pub fn notifiers(&self) -> &[N] {
        &self.notifiers
    }

    /// Notifies every receiver about `event`.
    pub async fn dispatch(&self, event: &ChangeEvent) -> DispatchReport {
        let notification = Notification::from(event);
        let mut report = DispatchReport::default();

        for notifier in &self.notifiers {
            match notifier.notify(&notification).await {
                Ok(()) => {
                    tracing::debug!(
                        "Notified {} about {}",
                        notifier.describe(),
                        notification.interface
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to notify {} about {}: {e}",
                        notifier.describe(),
                        notification.interface
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Delivery settings shared by every receiver.
#[derive(Debug, Clone)]
pub struct DeliverySettings {
    /// Per-request network timeout.
    pub timeout: Duration,
    /// Backoff for transient Slack failures.
    pub retry_policy: RetryPolicy,
    /// Handlebars template for message text.
    pub message_template: String,
}

/// Production notifier for a configured [`Receiver`].
#[derive(Debug)]
pub enum ReceiverNotifier {
    /// Slack incoming webhook.
    Slack(SlackNotifier<ReqwestClient>),
    /// SMTP email.
    Email(EmailNotifier<SmtpMailer>),
}

impl ReceiverNotifier {
    /// Builds the notifier for one receiver.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be created.
    pub fn from_receiver(
        receiver: &Receiver,
        settings: &DeliverySettings,
    ) -> Result<Self, NotifyError> {
        let renderer = MessageRenderer::new(settings.message_template.as_str());
        match receiver {
            Receiver::Slack(slack) => {
                let client = ReqwestClient::with_timeout(settings.timeout)?;
                Ok(Self::Slack(
                    SlackNotifier::new(client, slack.clone())
                        .with_renderer(renderer)
                        .with_retry_policy(settings.retry_policy.clone()),
                ))
            }
            Receiver::Email(email) => {
                let mailer = SmtpMailer::new(email, settings.timeout);
                Ok(Self::Email(
                    EmailNotifier::new(mailer, email).with_renderer(renderer),
                ))
            }
        }
    }
}

impl Notifier for ReceiverNotifier {
    fn describe(&self) -> String {
        match self {
            Self::Slack(n) => n.describe(),
            Self::Email(n) => n.describe(),
        }
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match self {
            Self::Slack(n) => n.notify(notification).await,
            Self::Email(n) => n.notify(notification).await,
        }
    }
}

//! SMTP email notifier.

use std::future::Future;
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::EmailReceiver;

use super::{MessageRenderer, Notification, Notifier, NotifyError};

/// A plain-text message ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender address.
    pub from: String,
    /// Recipient address(es), comma separated.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl OutgoingMail {
    /// Builds the RFC 5322 message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] if an address does not parse, or
    /// [`NotifyError::Message`] if there are no recipients.
    pub fn to_message(&self) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.trim().parse::<Mailbox>()?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        for recipient in self.to.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        Ok(builder.body(self.body.clone())?)
    }
}

/// Sends an [`OutgoingMail`].
///
/// Abstracts the SMTP transport so email delivery can be tested without
/// a server.
pub trait Mailer: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the message cannot be built or sent.
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// [`Mailer`] backed by lettre's async SMTP transport.
///
/// The connection is opened per send; the tool delivers at most a handful
/// of messages per run.
#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    require_tls: bool,
    timeout: Duration,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("authenticated", &self.credentials.is_some())
            .field("require_tls", &self.require_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SmtpMailer {
    /// Creates a mailer for the receiver's smarthost.
    #[must_use]
    pub fn new(receiver: &EmailReceiver, timeout: Duration) -> Self {
        Self {
            host: receiver.host.clone(),
            port: receiver.port,
            credentials: receiver
                .credentials()
                .map(|(user, pass)| (user.to_string(), pass.to_string())),
            require_tls: receiver.require_tls,
            timeout,
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let parameters = TlsParameters::new(self.host.clone())?;
        let tls = if self.require_tls {
            Tls::Required(parameters)
        } else {
            Tls::Opportunistic(parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
            .port(self.port)
            .tls(tls)
            .timeout(Some(self.timeout));

        if let Some((user, pass)) = &self.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotifyError> {
        let message = mail.to_message()?;
        let transport = self.transport()?;
        transport.send(message).await?;
        Ok(())
    }
}

/// Sends notifications as plain-text email.
#[derive(Debug)]
pub struct EmailNotifier<M> {
    mailer: M,
    to: String,
    from: String,
    renderer: MessageRenderer,
}

impl<M> EmailNotifier<M> {
    /// Creates a notifier with the default template.
    #[must_use]
    pub fn new(mailer: M, receiver: &EmailReceiver) -> Self {
        Self {
            mailer,
            to: receiver.to.clone(),
            from: receiver.from.clone(),
            renderer: MessageRenderer::default(),
        }
    }

    /// Sets the message renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: MessageRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Returns the underlying mailer.
    #[must_use]
    pub const fn mailer(&self) -> &M {
        &self.mailer
    }
}

impl<M: Mailer> Notifier for EmailNotifier<M> {
    fn describe(&self) -> String {
        format!("email {}", self.to)
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mail = OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: notification.subject(),
            body: self.renderer.render(notification)?,
        };
        self.mailer.send(mail).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<(), NotifyError> {
            mail.to_message()?;
            self.sent.lock().unwrap().push(mail);
            Ok(())
        }
    }

    fn receiver() -> EmailReceiver {
        EmailReceiver {
            to: "ops@example.com, noc@example.com".to_string(),
            from: "notifier@example.com".to_string(),
            host: "smtp.example.com".to_string(),
            port: 587,
            auth_username: "notifier".to_string(),
            auth_password: "hunter2".to_string(),
            require_tls: true,
        }
    }

    fn notification() -> Notification {
        Notification {
            interface: "eth0".to_string(),
            addresses: vec!["192.168.1.10".to_string()],
            reason: "interface appeared".to_string(),
        }
    }

    fn mail(to: &str, from: &str) -> OutgoingMail {
        OutgoingMail {
            from: from.to_string(),
            to: to.to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
        }
    }

    mod outgoing_mail {
        use super::*;

        #[test]
        fn splits_comma_separated_recipients() {
            let message = mail("a@example.com, b@example.com", "n@example.com")
                .to_message()
                .unwrap();

            assert_eq!(message.envelope().to().len(), 2);
        }

        #[test]
        fn ignores_empty_recipient_segments() {
            let message = mail("a@example.com,,", "n@example.com").to_message().unwrap();

            assert_eq!(message.envelope().to().len(), 1);
        }

        #[test]
        fn headers_include_subject_and_plain_text() {
            let message = mail("a@example.com", "n@example.com").to_message().unwrap();
            let formatted = String::from_utf8(message.formatted()).unwrap();

            assert!(formatted.contains("Subject: subject"));
            assert!(formatted.contains("text/plain"));
        }

        #[test]
        fn invalid_recipient_is_address_error() {
            let result = mail("not an address", "n@example.com").to_message();

            assert!(matches!(result, Err(NotifyError::Address(_))));
        }

        #[test]
        fn invalid_sender_is_address_error() {
            let result = mail("a@example.com", "nobody").to_message();

            assert!(matches!(result, Err(NotifyError::Address(_))));
        }

        #[test]
        fn no_recipients_is_message_error() {
            let result = mail(" , ", "n@example.com").to_message();

            assert!(matches!(result, Err(NotifyError::Message(_))));
        }
    }

    mod notifier {
        use super::*;

        #[tokio::test]
        async fn sends_rendered_body_with_subject() {
            let email = EmailNotifier::new(RecordingMailer::default(), &receiver());

            email.notify(&notification()).await.unwrap();

            let sent = email.mailer().sent.lock().unwrap().clone();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].subject, "IP address change on eth0");
            assert_eq!(sent[0].body, "Interface eth0 addresses: 192.168.1.10");
            assert_eq!(sent[0].from, "notifier@example.com");
            assert_eq!(sent[0].to, "ops@example.com, noc@example.com");
        }

        #[tokio::test]
        async fn template_error_skips_send() {
            let email = EmailNotifier::new(RecordingMailer::default(), &receiver())
                .with_renderer(MessageRenderer::new("{{#each addresses}}"));

            let result = email.notify(&notification()).await;

            assert!(matches!(result, Err(NotifyError::Template(_))));
            assert!(email.mailer().sent.lock().unwrap().is_empty());
        }

        #[test]
        fn describe_names_recipients() {
            let email = EmailNotifier::new(RecordingMailer::default(), &receiver());

            assert_eq!(email.describe(), "email ops@example.com, noc@example.com");
        }
    }

    mod smtp_mailer {
        use super::*;

        #[test]
        fn debug_hides_credentials() {
            let mailer = SmtpMailer::new(&receiver(), Duration::from_secs(5));
            let debug = format!("{mailer:?}");

            assert!(!debug.contains("hunter2"));
            assert!(debug.contains("authenticated: true"));
        }

        #[test]
        fn no_username_means_no_credentials() {
            let mut settings = receiver();
            settings.auth_username.clear();

            let mailer = SmtpMailer::new(&settings, Duration::from_secs(5));

            assert!(mailer.credentials.is_none());
        }

        #[tokio::test]
        async fn unreachable_server_fails() {
            let mut settings = receiver();
            settings.host = "127.0.0.1".to_string();
            settings.port = 1;
            settings.auth_username.clear();
            settings.require_tls = false;
            let mailer = SmtpMailer::new(&settings, Duration::from_secs(2));

            let result = mailer.send(mail("a@example.com", "n@example.com")).await;

            assert!(matches!(result, Err(NotifyError::Smtp(_))));
        }
    }
}

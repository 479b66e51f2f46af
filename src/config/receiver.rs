//! Validated notification receivers.

use std::fmt;

use url::Url;

/// Default SMTP port when the smarthost has none.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Smarthost used when the config leaves it empty.
pub const DEFAULT_SMTP_HOST: &str = "localhost";

/// A configured notification destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// Slack incoming webhook.
    Slack(SlackReceiver),
    /// Email over SMTP.
    Email(EmailReceiver),
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slack(slack) => {
                write!(f, "slack")?;
                if !slack.channel.is_empty() {
                    write!(f, " {}", slack.channel)?;
                }
                Ok(())
            }
            Self::Email(email) => write!(f, "email {}", email.to),
        }
    }
}

/// Slack incoming-webhook settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackReceiver {
    /// Webhook URL.
    pub url: Url,
    /// Channel override (empty = webhook default).
    pub channel: String,
    /// Username override (empty = webhook default).
    pub username: String,
    /// `:emoji:` name or image URL (empty = webhook default).
    pub icon: String,
}

/// SMTP email settings.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailReceiver {
    /// Recipient address(es), comma separated.
    pub to: String,
    /// Sender address.
    pub from: String,
    /// SMTP server host.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username (empty = no authentication).
    pub auth_username: String,
    /// SMTP password.
    pub auth_password: String,
    /// Refuse to send without TLS.
    pub require_tls: bool,
}

impl EmailReceiver {
    /// Returns the `(username, password)` pair if authentication is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.auth_username.is_empty() {
            None
        } else {
            Some((&self.auth_username, &self.auth_password))
        }
    }
}

impl fmt::Debug for EmailReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailReceiver")
            .field("to", &self.to)
            .field("from", &self.from)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"<redacted>")
            .field("require_tls", &self.require_tls)
            .finish()
    }
}

/// Splits a `host[:port]` smarthost string.
///
/// Empty input yields the default host and port. Bracketed IPv6 literals
/// (`[::1]:587`) are supported.
pub(super) fn parse_smarthost(value: &str) -> Option<(String, u16)> {
    let value = value.trim();
    if value.is_empty() {
        return Some((DEFAULT_SMTP_HOST.to_string(), DEFAULT_SMTP_PORT));
    }

    if let Some(rest) = value.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        let port = match tail.strip_prefix(':') {
            Some(port) => port.parse().ok()?,
            None if tail.is_empty() => DEFAULT_SMTP_PORT,
            None => return None,
        };
        return Some((host.to_string(), port));
    }

    match value.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !host.contains(':') => {
            Some((host.to_string(), port.parse().ok()?))
        }
        Some(_) => None,
        None => Some((value.to_string(), DEFAULT_SMTP_PORT)),
    }
}

//! Error types for notification delivery.

use thiserror::Error;

use super::HttpError;

/// Error type for a single receiver's delivery.
///
/// Delivery errors never abort a run; the dispatcher logs them and moves
/// on to the next receiver.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP transport failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Server returned a non-2xx status code.
    #[error("HTTP {status}: {}", body.as_deref().unwrap_or("<no body>"))]
    NonSuccessStatus {
        /// The HTTP status code
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },

    /// Every retry attempt failed.
    #[error("Failed after {attempts} attempt(s): {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made
        attempts: u32,
        /// The error from the final attempt
        #[source]
        last_error: Box<NotifyError>,
    },

    /// The message template failed to render.
    #[error("Template rendering failed: {0}")]
    Template(String),

    /// The Slack payload could not be encoded.
    #[error("Failed to encode payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// An email address could not be parsed.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The email message could not be built.
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP exchange failed.
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl NotifyError {
    /// Returns true if the error is potentially transient and worth retrying.
    ///
    /// Connection failures, timeouts, 5xx, 408 and 429 are retryable.
    /// Everything else is a configuration or content problem.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => matches!(e, HttpError::Connection(_) | HttpError::Timeout),
            Self::NonSuccessStatus { status, .. } => {
                status.is_server_error()
                    || *status == http::StatusCode::TOO_MANY_REQUESTS
                    || *status == http::StatusCode::REQUEST_TIMEOUT
            }
            Self::Smtp(e) => e.is_transient() || e.is_timeout(),
            Self::MaxRetriesExceeded { .. }
            | Self::Template(_)
            | Self::Payload(_)
            | Self::Address(_)
            | Self::Message(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> NotifyError {
        NotifyError::NonSuccessStatus {
            status: http::StatusCode::from_u16(code).unwrap(),
            body: None,
        }
    }

    #[test]
    fn transport_failures_are_retryable() {
        assert!(NotifyError::Http(HttpError::Timeout).is_retryable());
        assert!(NotifyError::Http(HttpError::Connection("reset".into())).is_retryable());
        assert!(!NotifyError::Http(HttpError::InvalidRequest("bad".into())).is_retryable());
    }

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        assert!(status(500).is_retryable());
        assert!(status(503).is_retryable());
        assert!(status(429).is_retryable());
        assert!(status(408).is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!status(400).is_retryable());
        assert!(!status(403).is_retryable());
        assert!(!status(404).is_retryable());
    }

    #[test]
    fn template_errors_are_not_retryable() {
        assert!(!NotifyError::Template("oops".into()).is_retryable());
    }

    #[test]
    fn non_success_status_displays_body() {
        let error = NotifyError::NonSuccessStatus {
            status: http::StatusCode::FORBIDDEN,
            body: Some("invalid_token".to_string()),
        };

        let message = error.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("invalid_token"));
    }

    #[test]
    fn max_retries_displays_last_error() {
        let error = NotifyError::MaxRetriesExceeded {
            attempts: 3,
            last_error: Box::new(NotifyError::Http(HttpError::Timeout)),
        };

        let message = error.to_string();
        assert!(message.contains("3 attempt"));
        assert!(message.contains("timed out"));
    }
}

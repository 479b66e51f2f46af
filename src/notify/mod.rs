//! Notification delivery.
//!
//! This module provides types and traits for:
//! - Rendering message text from a change ([`Notification`], [`MessageRenderer`])
//! - Abstracting HTTP clients ([`HttpClient`], [`ReqwestClient`])
//! - Slack webhook delivery with retries ([`SlackNotifier`], [`RetryPolicy`])
//! - SMTP delivery ([`EmailNotifier`], [`SmtpMailer`])
//! - Fan-out to every receiver ([`Dispatcher`])

mod client;
mod dispatch;
mod email;
mod error;
mod http;
mod message;
mod retry;
mod slack;

pub use client::ReqwestClient;
pub use dispatch::{DeliverySettings, DispatchReport, Dispatcher, Notifier, ReceiverNotifier};
pub use email::{EmailNotifier, Mailer, OutgoingMail, SmtpMailer};
pub use error::NotifyError;
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse};
pub use message::{DEFAULT_TEMPLATE, MessageRenderer, Notification};
pub use retry::RetryPolicy;
pub use slack::SlackNotifier;

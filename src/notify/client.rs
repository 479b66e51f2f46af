//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// Thin wrapper around `reqwest::Client` implementing [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the TLS backend cannot be
    /// initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidRequest(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, body))
    }
}

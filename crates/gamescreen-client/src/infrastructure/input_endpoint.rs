//! HTTP input endpoint.
//!
//! Every button transition is delivered as one `GET /event?<polarity>=<bitmask>`
//! against the peer's HTTP server.  The peer answers `204 No Content`; any
//! other status, or no answer at all, is reported back to the controller as
//! a failed request.  Failed requests are not retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use gamescreen_core::controller::RequestOutcome;
use gamescreen_core::domain::input::OutboundEvent;
use gamescreen_core::protocol::event_path;

#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection, timeout or protocol failure.
    #[error("input request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The peer answered, but not with `204 No Content`.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
}

/// Converts the result of [`InputEndpoint::send`] into what the controller
/// needs to know.
pub fn request_outcome(result: Result<(), RequestError>) -> RequestOutcome {
    match result {
        Ok(()) => RequestOutcome::Acknowledged,
        Err(RequestError::UnexpectedStatus(status)) => {
            RequestOutcome::UnexpectedStatus(status.as_u16())
        }
        Err(e) => RequestOutcome::Failed(e.to_string()),
    }
}

/// Delivers one input event to the peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InputEndpoint: Send + Sync {
    /// Sends `event` and waits for the peer's answer.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] if the request fails or is not answered with
    /// `204 No Content`.
    async fn send(&self, event: OutboundEvent) -> Result<(), RequestError>;
}

/// [`InputEndpoint`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpInputEndpoint {
    http: Client,
    base_url: String,
}

impl HttpInputEndpoint {
    /// Creates an endpoint rooted at `base_url` (for example
    /// `http://10.0.0.2:8282/`).  A missing trailing slash is added.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RequestError> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Full URL for `event`.
    pub fn url_for(&self, event: &OutboundEvent) -> String {
        format!("{}{}", self.base_url, event_path(event))
    }
}

#[async_trait]
impl InputEndpoint for HttpInputEndpoint {
    async fn send(&self, event: OutboundEvent) -> Result<(), RequestError> {
        let res = self.http.get(self.url_for(&event)).send().await?;
        match res.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(RequestError::UnexpectedStatus(status)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

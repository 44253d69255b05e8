//! HTTP fetch utilities for tocdex.
//!
//! Provides a small blocking client used to download documentation pages,
//! post them to a markup normalization service, and mirror stylesheets.
//!
//! Redirects are never followed. A 3xx response surfaces as
//! [`FetchError::Redirected`] so the caller can log it and give up on that
//! resource.
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use thiserror::Error;

/// User-Agent header sent with all requests.
const DEFAULT_USER_AGENT: &str = concat!("tocdex/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while talking to a remote server.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a redirect, which we do not follow.
    #[error("got redirected from {url} to {}, not following", .location.as_deref().unwrap_or("<no location>"))]
    Redirected {
        /// Requested URL.
        url: String,
        /// Value of the `Location` header, if any.
        location: Option<String>,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The response body could not be read.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether this error is a redirect we refused to follow.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }
}

/// Blocking HTTP client with a fixed timeout and no redirect handling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Build a client with [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Build a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { inner })
    }

    /// `GET url` and return the body as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server redirects, the
    /// response has a non-success status, or the body cannot be read.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::info!("GET {url}");
        let response = self
            .inner
            .get(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        read_body(url, response)
    }

    /// `POST url` with an HTML body and return the response body as raw bytes.
    ///
    /// The request declares `Content-Type: text/html`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server redirects, the
    /// response has a non-success status, or the body cannot be read.
    pub fn post_html(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, FetchError> {
        log::info!("POST {url} ({} bytes)", body.len());
        let response = self
            .inner
            .post(url)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .header(CONTENT_TYPE, "text/html")
            .body(body)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        read_body(url, response)
    }
}

/// Check the status of `response` and read its body.
fn read_body(url: &str, response: Response) -> Result<Vec<u8>, FetchError> {
    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        return Err(FetchError::Redirected {
            url: url.to_string(),
            location,
        });
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
}

//! Shared HTTP plumbing for talking to the tracking service.
//!
//! Both nutrition sources are reached through the tracking service's proxy
//! endpoints, so they share one authenticated [`ServiceConnection`].

use std::time::Duration;

use reqwest::{Client, Response, header};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;

use crate::providers::errors::{ClientBuildSnafu, InvalidApiKeySnafu, ProviderInitError};

/// Longest slice of an upstream error body kept for logs.
pub const MAX_ERROR_BODY: usize = 200;

/// Fixed connect and total-request timeouts for one remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl HttpTimeouts {
    /// Timeouts for the tracking service and the sources proxied through it.
    pub const SERVICE: HttpTimeouts = HttpTimeouts {
        connect: Duration::from_secs(5),
        request: Duration::from_secs(15),
    };

    /// Short timeouts for local devices on the LAN.
    pub const DEVICE: HttpTimeouts = HttpTimeouts {
        connect: Duration::from_secs(2),
        request: Duration::from_secs(5),
    };
}

/// An authenticated client bound to one service base URL.
///
/// Cloning is cheap; the inner [`Client`] is reference counted.
#[derive(Debug, Clone)]
pub struct ServiceConnection {
    base_url: String,
    client: Client,
}

impl ServiceConnection {
    /// Builds a client that sends `X-API-Key` and a JSON content type on every
    /// request.
    pub fn new(
        base_url: &str,
        api_key: &SecretString,
        timeouts: HttpTimeouts,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let mut key = header::HeaderValue::from_str(api_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        key.set_sensitive(true);
        headers.insert("X-API-Key", key);

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Joins `path` (which should start with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Builds an unauthenticated client with the given timeouts.
pub fn plain_client(timeouts: HttpTimeouts) -> Result<Client, ProviderInitError> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.request)
        .build()
        .context(ClientBuildSnafu)
}

/// Cuts `body` to at most `max` characters on a char boundary.
pub fn truncate_body(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

/// Reads the body of a failed response for logging, truncated to
/// [`MAX_ERROR_BODY`] characters.
pub async fn error_body(response: Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    truncate_body(&text, MAX_ERROR_BODY)
}

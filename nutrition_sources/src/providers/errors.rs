use reqwest::StatusCode;
use snafu::{Backtrace, Snafu};

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains characters that cannot be sent in a header.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// Provider id contains characters that cannot be sent in a header.
    #[snafu(display("Invalid provider id format: {source}"))]
    InvalidProviderId {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a source implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (network failure, timeout, bad JSON).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The upstream answered with a non-success status.
    #[snafu(display("API error ({status}): {body}"))]
    Api {
        status: StatusCode,
        body: String,
        backtrace: Backtrace,
    },

    /// The per-process request budget for this source is used up.
    #[snafu(display("Request budget exhausted for {source_name}"))]
    RateLimited {
        source_name: &'static str,
        backtrace: Backtrace,
    },
}

use reqwest::StatusCode;
use snafu::{Backtrace, Snafu};

/// Errors from a tracking-service call. None of them are retried.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TrackerError {
    /// Network failure, timeout, or a body that is not the expected JSON.
    #[snafu(display("{endpoint} request failed: {source}"))]
    Request {
        endpoint: &'static str,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The service answered with a status other than 200/201.
    #[snafu(display("{endpoint} failed ({status}): {body}"))]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
        backtrace: Backtrace,
    },
}

impl TrackerError {
    /// The HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TrackerError::Status { status, .. } => Some(*status),
            TrackerError::Request { source, .. } => source.status(),
        }
    }
}

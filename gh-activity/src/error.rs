use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Event is not recognized: {0}")]
    UnknownEventKind(String),
    #[error("API rate limit exhausted ({remaining} calls left), resets at {reset_at}")]
    QuotaExhausted {
        remaining: i64,
        reset_at: DateTime<Utc>,
    },
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Failures talking to the API. Any of them aborts the whole fetch.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Rate limit exceeded (HTTP 403) for {url}")]
    RateLimitExceeded { url: String },
    #[error("Request to {url} exited with status {status}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

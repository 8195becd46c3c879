//! Fetch error definitions.

use thiserror::Error;

/// Errors that can end a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connect refused, DNS, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every allowed attempt answered with a status other than 200.
    #[error("gave up on {url} after {attempts} attempts, last status {last_status}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_status: u16,
    },

    /// The body was not the JSON document the caller asked for.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body was valid JSON but not the shape the caller asked for.
    #[error("document at {target} has an unexpected shape: {source}")]
    UnexpectedShape {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// The task running the fetch ended before producing a result.
    #[error("fetch for {suffix} was interrupted before it settled")]
    Interrupted { suffix: String },
}

impl FetchError {
    /// Label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Client(_) => "client_error",
            FetchError::Transport { .. } => "transport_error",
            FetchError::Exhausted { .. } => "exhausted",
            FetchError::Decode { .. } => "decode_error",
            FetchError::UnexpectedShape { .. } => "shape_error",
            FetchError::Interrupted { .. } => "interrupted",
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the content API.
///
/// Every variant is a transport-level problem from the caller's point of view:
/// none of them are retried, and the search controller folds all of them into
/// its `Error` state.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("content API base URL is not configured")]
    NotConfigured,

    #[error("building http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status code {status}")]
    Status { url: String, status: StatusCode },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } | ApiError::Decode { source, .. } => source.status(),
            _ => None,
        }
    }
}

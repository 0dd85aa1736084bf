//! Client error taxonomy

use thiserror::Error;

/// Errors raised by the API clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status
    #[error("request to {url} failed with HTTP {status}")]
    Http { status: u16, url: String },

    /// The request never produced a response (DNS, TLS, connection reset, ...)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not what the endpoint promises
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A required setting (token, username, ...) is absent, nothing was sent
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// Position lookup was refused, timed out or returned garbage
    #[error("location unavailable: {0}")]
    Geolocation(String),
}

impl ClientError {
    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

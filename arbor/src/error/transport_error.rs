//! Transport-level errors.

use thiserror::Error;

/// Errors raised while sending a request or receiving its response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header name or value was rejected.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    /// Failed to establish connection to the server.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Returns `true` if retrying the request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::InvalidUrl(_) | Self::InvalidHeader { .. } => false,
        }
    }
}

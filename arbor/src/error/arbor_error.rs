//! Top-level runtime error type.

use super::{CodecError, ServerFault, TransportError};
use thiserror::Error;

/// Top-level error type for all client operations.
///
/// No variant is swallowed on the way up: faults, routing failures and
/// transport errors reach the caller unchanged.
///
/// ## Examples
///
/// ```
/// use arbor::ArborError;
///
/// fn describe(err: &ArborError) -> &'static str {
///     match err {
///         ArborError::Fault(_) => "server rejected the request",
///         ArborError::NoSuchService { .. } => "bad path",
///         ArborError::Transport(_) => "network problem",
///         _ => "client error",
///     }
/// }
///
/// let err = ArborError::NoSuchService { path: "z".to_string() };
/// assert_eq!(describe(&err), "bad path");
/// ```
#[derive(Debug, Error)]
pub enum ArborError {
    /// The server answered with a status outside the success codes.
    #[error(transparent)]
    Fault(#[from] ServerFault),

    /// No locator matched while resolving a path.
    #[error("The path '{path}' doesn't correspond to any service")]
    NoSuchService {
        /// The unresolved remainder of the path.
        path: String,
    },

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An option value cannot be used where it was supplied.
    #[error("Invalid value for option '{name}': {message}")]
    InvalidOption { name: String, message: String },

    /// A required argument was not supplied.
    #[error("Method '{method}' requires the '{argument}' argument")]
    MissingArgument { method: String, argument: String },

    /// The service has no method with this name.
    #[error("Service '{service}' has no method '{method}'")]
    UnknownMethod { service: String, method: String },

    /// The service has no locator with this name.
    #[error("Service '{service}' has no locator '{locator}'")]
    UnknownLocator { service: String, locator: String },
}

impl ArborError {
    /// Returns the HTTP status code if this error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Fault(fault) => Some(fault.status),
            _ => None,
        }
    }

    /// Returns `true` for a server fault.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_server_fault() {
        let err: ArborError = ServerFault::new(404).into();
        assert!(err.is_fault());
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn from_transport_error() {
        let err: ArborError = TransportError::Connection("refused".to_string()).into();
        assert!(matches!(err, ArborError::Transport(_)));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn routing_error_carries_path() {
        let err = ArborError::NoSuchService {
            path: "z/y".to_string(),
        };
        assert!(err.to_string().contains("'z/y'"));
    }
}

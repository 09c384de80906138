//! Structured faults produced from non-success responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fault reported by the server.
///
/// `reason` and `detail` come from the response body when it can be decoded
/// as a fault document; otherwise only the status is known.
///
/// ## Examples
///
/// ```
/// use arbor::ServerFault;
///
/// let fault = ServerFault::new(409).with_reason("Conflict").with_detail("Item is locked");
/// assert_eq!(
///     fault.to_string(),
///     "Fault reason is \"Conflict\". Fault detail is \"Item is locked\". HTTP response code is 409."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFault {
    pub status: u16,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

impl ServerFault {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            detail: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ServerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = &self.reason {
            write!(f, "Fault reason is \"{reason}\". ")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "Fault detail is \"{detail}\". ")?;
        }
        write!(f, "HTTP response code is {}.", self.status)
    }
}

impl std::error::Error for ServerFault {}

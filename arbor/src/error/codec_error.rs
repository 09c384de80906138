//! Body encoding and decoding errors.

use thiserror::Error;

/// Errors raised by a [`Codec`](crate::Codec).
#[derive(Debug, Error)]
pub enum CodecError {
    /// The body is not valid JSON, or a value could not be written.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded document does not have the expected shape.
    #[error("Expected {expected} for type '{type_name}', found {found}")]
    UnexpectedShape {
        type_name: String,
        expected: String,
        found: String,
    },
}

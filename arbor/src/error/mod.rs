//! Layered error types for the runtime crate.
//!
//! The error hierarchy is structured for actionable diagnostics:
//! - [`ArborError`] - Top-level error type for every client operation
//! - [`ServerFault`] - A response outside an operation's success codes
//! - [`TransportError`] - Connectivity, URL and header errors
//! - [`CodecError`] - Body encoding and decoding errors

mod arbor_error;
mod codec_error;
mod fault;
mod transport_error;

pub use arbor_error::ArborError;
pub use codec_error::CodecError;
pub use fault::ServerFault;
pub use transport_error::TransportError;

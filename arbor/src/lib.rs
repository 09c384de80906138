//! Runtime support for arbor-generated REST clients.
//!
//! Generated service types, and the dynamic interpreter in `arbor-gen`, are
//! thin layers over the pieces in this crate.
//!
//! ## Features
//!
//! - **Connection**: a [`Transport`] plus a [`Codec`], shared as `Arc<Connection>`
//! - **Values**: [`Value`] with typed and loosely-typed structural forms
//! - **Coercion**: bare mappings and sequences upgraded to model types
//! - **Query rendering**: type-specific literal text for query parameters
//! - **Fault checking**: non-success responses become [`ServerFault`]s
//! - **Blocking HTTP**: [`HttpTransport`] built on `reqwest`
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use arbor::mock::RecordingTransport;
//! use arbor::{Connection, HttpResponse};
//!
//! let transport = RecordingTransport::new();
//! transport.respond(HttpResponse::new(404).with_body(r#"{"reason":"Not Found"}"#));
//!
//! let connection = Arc::new(Connection::new(transport));
//! let response = connection.send(arbor::HttpRequest::new(arbor::Verb::Get, "books/1")).unwrap();
//! let err = connection.check_fault(&response);
//! assert_eq!(err.status_code(), Some(404));
//! ```

pub mod codec;
pub mod coerce;
pub mod connection;
pub mod error;
pub mod http;
pub mod mock;
pub mod options;
pub mod render;
pub mod request;
pub mod value;

// Re-exports for convenience
pub use codec::{BodyShape, Codec, JsonCodec};
pub use coerce::{coerce, coerce_list, coerce_struct};
pub use connection::{ACTION_TYPE, Connection, FAULT_TYPE, Transport};
pub use error::{ArborError, CodecError, ServerFault, TransportError};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use options::Options;
pub use render::render_query_value;
pub use request::{HttpRequest, HttpResponse, Verb, join_path};
pub use value::{ListValue, StructValue, Value};

pub use arbor_define::PrimitiveKind;

//! Client for the lending library model.
//!
//! The build script runs `arbor-gen` over
//! `arbor_definitions::define_library_model`, so this crate always holds
//! exactly what the generator currently emits.
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use arbor::mock::RecordingTransport;
//! use arbor::{Connection, HttpResponse, Options, Verb};
//!
//! let transport = RecordingTransport::new();
//! let library = arbor_library::root(Arc::new(Connection::new(transport.clone())));
//!
//! transport.respond(HttpResponse::new(200));
//! library.books_service().book_service("42").remove(&Options::new()).unwrap();
//!
//! let request = transport.last_request().unwrap();
//! assert_eq!(request.verb, Verb::Delete);
//! assert_eq!(request.path, "books/42");
//! ```

include!(concat!(env!("OUT_DIR"), "/library.rs"));

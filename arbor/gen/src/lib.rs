//! Arbor client generator library.
//!
//! This crate turns a service model defined with `arbor-define` into a client
//! for the service tree it describes. A model is compiled once into a
//! [`plan::ClientPlan`], which can then be:
//!
//! - emitted as Rust source for a client crate built on the `arbor` runtime
//! - interpreted directly with [`dynamic::DynamicService`]
//! - serialized as JSON
//!
//! ## Modules
//!
//! - [`ordering`] - Base-first ordering of services
//! - [`classify`] - Method strategies and parameter roles
//! - [`naming`] - Identifier, URL segment and type name derivation
//! - [`plan`] - Compilation of a model into a client plan
//! - [`dynamic`] - Plan interpreter with the generated clients' semantics
//! - [`codegen`] - Code generation for individual components
//! - [`output`] - Final assembly, validation, and file writing
//! - [`cargo_gen`] - Cargo.toml generation for the output package
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use arbor_definitions::define_library_model;
//! use arbor_gen::output::{EmitKind, generate_and_write};
//!
//! let model = define_library_model();
//! let code = generate_and_write(&model, Path::new("client/src"), EmitKind::Rust, true).unwrap();
//! println!("{}", code);
//! ```
//!
//! ## Generated Code Structure
//!
//! For a root `Library` with a `books` locator:
//!
//! ```text
//! pub fn root(connection: Arc<arbor::Connection>) -> LibraryService;
//!
//! pub struct LibraryService { connection, path }
//!
//! impl LibraryService {
//!     pub fn books_service(&self) -> BooksService;
//!     pub fn resolve(&self, path: &str) -> Result<AnyService, arbor::ArborError>;
//! }
//!
//! pub enum AnyService { Library(LibraryService), Books(BooksService), ... }
//! ```

pub mod cargo_gen;
pub mod classify;
pub mod codegen;
pub mod dynamic;
pub mod errors;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod plan;

#[cfg(test)]
mod test_utils;

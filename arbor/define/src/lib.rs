//! Arbor Model Library
//!
//! This crate provides the types used to describe a hierarchical REST API as a
//! tree of services. A model is consumed by the `arbor-gen` binary to produce
//! a client crate, and by the `arbor-gen` library to drive clients at runtime.
//!
//! ## Core Types
//!
//! - [`Name`] - Structural, spelling-independent identifier
//! - [`PrimitiveKind`] - Boolean, integer, decimal, date and string kinds
//! - [`Type`] - Primitive, struct or list type of a parameter
//! - [`Parameter`] - Method or locator parameter with in/out direction flags
//! - [`Method`] - An operation on a service
//! - [`Locator`] - A named edge to a child service, optionally parameterized
//! - [`Service`] - A node of the resource tree, possibly extending a base
//! - [`Model`] - The complete API with its root service
//! - [`ModelError`] - Load and validation failures
//!
//! ## Examples
//!
//! ```
//! use arbor_define::{Locator, Method, Model, Parameter, Service, Type};
//!
//! let model = Model::new("Library", "Library")
//!     .service(Service::new("Library").locator(Locator::new("Books", "Books")))
//!     .service(
//!         Service::new("Books")
//!             .method(Method::new("List").param(Parameter::output("books", Type::list(Type::structure("Book")))))
//!             .locator(Locator::new("Book", "Book").with_parameter(Parameter::input("id", Type::string()))),
//!     )
//!     .service(Service::new("Book").method(Method::new("Get").param(Parameter::output("book", Type::structure("Book")))));
//!
//! model.validate().unwrap();
//! assert_eq!(model.services.len(), 3);
//! ```
//!
//! ## Model Definitions
//!
//! Sample models live in the separate `arbor-definitions` crate.

pub mod error;
pub mod model;
pub mod name;
pub mod prelude;
pub mod service;
pub mod types;

// Re-export main types at crate root
pub use error::ModelError;
pub use model::Model;
pub use name::Name;
pub use service::{Locator, Method, Parameter, Service};
pub use types::{PrimitiveKind, Type};

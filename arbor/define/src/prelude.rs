//! Convenient re-exports for building models.
//!
//! ## Examples
//!
//! ```
//! use arbor_define::prelude::*;
//!
//! let model = Model::new("Demo", "Root").service(Service::new("Root"));
//! assert!(model.validate().is_ok());
//! ```

pub use crate::error::ModelError;
pub use crate::model::Model;
pub use crate::name::Name;
pub use crate::service::{Locator, Method, Parameter, Service};
pub use crate::types::{PrimitiveKind, Type};

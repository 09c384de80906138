//! Convenient re-exports for working with bundled models.
//!
//! ## Examples
//!
//! ```
//! use arbor_definitions::prelude::*;
//!
//! let model = define_library_model();
//! assert_eq!(model.name.to_string(), "Library");
//! ```

pub use crate::library::define_library_model;
pub use crate::{MODEL_NAMES, model_by_name};

//! Arbor Model Definitions
//!
//! This crate contains service models built from the primitives in
//! `arbor-define`. Each model is organized in its own module.
//!
//! ## Available Models
//!
//! - [`library`] - A lending library: books, authors and loans
//!
//! ## Examples
//!
//! ```
//! use arbor_definitions::library::define_library_model;
//!
//! let model = define_library_model();
//! assert_eq!(model.root.to_string(), "Library");
//! model.validate().unwrap();
//! ```

pub mod library;
pub mod prelude;

// Re-export model definition functions for convenience
pub use library::define_library_model;

/// Looks up a bundled model by its lowercase name.
///
/// ## Examples
///
/// ```
/// use arbor_definitions::model_by_name;
///
/// assert!(model_by_name("library").is_some());
/// assert!(model_by_name("zoo").is_none());
/// ```
pub fn model_by_name(name: &str) -> Option<arbor_define::Model> {
    match name {
        "library" => Some(define_library_model()),
        _ => None,
    }
}

/// Names accepted by [`model_by_name`].
pub const MODEL_NAMES: &[&str] = &["library"];

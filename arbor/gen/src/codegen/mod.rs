//! Code generation modules for arbor.
//!
//! This module turns a [`ClientPlan`] into Rust source for a client crate
//! built on the `arbor` runtime. Each submodule handles one component.
//!
//! ## Submodules
//!
//! - [`service_struct`] - One struct per service with constructor, `path`, `Display` and `Debug`
//! - [`operations`] - One method per operation, by strategy
//! - [`locators`] - Locator accessors and the `resolve` path router
//! - [`any_service`] - The `AnyService` enum returned by `resolve`
//! - [`module_docs`] - Crate-level and per-item documentation
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod any_service;
pub mod locators;
pub mod module_docs;
pub mod operations;
pub mod service_struct;

pub use any_service::generate_any_service;
pub use locators::{generate_locator, generate_resolve};
pub use module_docs::ModuleDocBuilder;
pub use operations::generate_operation;
pub use service_struct::generate_service;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::info;

use crate::errors::GeneratorError;
use crate::plan::ClientPlan;

/// Name of the generated enum; no service may take it.
const ANY_SERVICE: &str = "AnyService";

/// Generates the complete client source, crate docs included.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when a generated name would
/// collide, and `GeneratorError::UnknownService` when the plan's root index
/// names no service.
pub fn generate_client(plan: &ClientPlan) -> Result<TokenStream, GeneratorError> {
    let items = generate_client_items(plan)?;
    let docs = ModuleDocBuilder::new(plan).build();

    Ok(quote! {
        #docs

        #items
    })
}

/// Generates the client items without crate docs.
///
/// Inner doc attributes cannot appear in a file pulled in with `include!`,
/// so this is the form to embed from a build script.
///
/// ## Errors
///
/// Same as [`generate_client`].
pub fn generate_client_items(plan: &ClientPlan) -> Result<TokenStream, GeneratorError> {
    info!(model = %plan.name, services = plan.services.len(), "Generating client code");

    if plan.services.iter().any(|s| s.type_name == ANY_SERVICE) {
        return Err(GeneratorError::CodeGenError(format!(
            "A service may not be named '{}'",
            ANY_SERVICE
        )));
    }

    let root = plan
        .root_service()
        .ok_or_else(|| GeneratorError::UnknownService(format!("root #{}", plan.root)))?;

    let services = plan
        .services
        .iter()
        .map(generate_service)
        .collect::<Result<Vec<_>, _>>()?;
    let any_service = generate_any_service(plan);

    let root_type = format_ident!("{}", root.type_name);
    let root_doc = format!(" Returns the root service of the {} API.", plan.name);

    Ok(quote! {
        pub use arbor::{ArborError, Connection, Options, Value};

        #[doc = #root_doc]
        pub fn root(connection: std::sync::Arc<arbor::Connection>) -> #root_type {
            #root_type::new(connection, "")
        }

        #(#services)*

        #any_service
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::compile;
    use crate::test_utils::{format_generated_code, library_model, validate_generated_code};
    use arbor_define::{Model, Service};

    #[test]
    fn client_is_valid_rust() {
        let plan = compile(&library_model()).unwrap();
        let tokens = generate_client(&plan).unwrap();
        assert!(validate_generated_code(&tokens).is_ok());
    }

    #[test]
    fn client_has_root_helper_and_reexports() {
        let plan = compile(&library_model()).unwrap();
        let code = format_generated_code(&generate_client(&plan).unwrap()).unwrap();

        assert!(code.starts_with("//! Generated client for the Library API."));
        assert!(code.contains("pub use arbor::{ArborError, Connection, Options, Value};"));
        assert!(code.contains("pub fn root(connection: std::sync::Arc<arbor::Connection>) -> LibraryService"));
        assert!(code.contains("pub enum AnyService"));
    }

    #[test]
    fn base_struct_precedes_derived() {
        let plan = compile(&library_model()).unwrap();
        let code = format_generated_code(&generate_client(&plan).unwrap()).unwrap();
        let catalog = code.find("pub struct CatalogService").unwrap();
        let books = code.find("pub struct BooksService").unwrap();
        assert!(catalog < books);
    }

    #[test]
    fn service_named_any_is_rejected() {
        let model = Model::new("Test", "Any").service(Service::new("Any"));
        let plan = compile(&model).unwrap();
        assert!(matches!(
            generate_client(&plan),
            Err(GeneratorError::CodeGenError(_))
        ));
    }

    #[test]
    fn items_carry_no_inner_docs() {
        let plan = compile(&library_model()).unwrap();
        let code = format_generated_code(&generate_client_items(&plan).unwrap()).unwrap();
        assert!(!code.contains("//!"));
        assert!(code.contains("pub fn root(connection: std::sync::Arc<arbor::Connection>) -> LibraryService"));
    }

    #[test]
    fn out_of_range_root_is_rejected() {
        let mut plan = compile(&library_model()).unwrap();
        plan.root = plan.services.len() + 3;
        assert!(matches!(
            generate_client(&plan),
            Err(GeneratorError::UnknownService(_))
        ));
    }
}

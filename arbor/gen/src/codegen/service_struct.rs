//! Service struct generation.
//!
//! Every service becomes a struct holding exactly a shared connection and a
//! path, with one method per operation, one accessor per locator, the path
//! router, and `Display`/`Debug` implementations exposing the type and path.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::debug;

use crate::codegen::locators::{generate_locator, generate_resolve};
use crate::codegen::module_docs::doc_attrs;
use crate::codegen::operations::generate_operation;
use crate::errors::GeneratorError;
use crate::naming::identifier_for;
use crate::plan::ServicePlan;

/// Members every service struct defines.
const FIXED_MEMBERS: &[&str] = &["new", "path", "resolve"];

/// Generates the struct and impls for one service.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if two members of the service would
/// get the same method name.
pub fn generate_service(service: &ServicePlan) -> Result<TokenStream, GeneratorError> {
    check_member_names(service)?;

    let name = format_ident!("{}", service.type_name);
    let docs = doc_attrs(&service_doc(service));
    let display = format!("{}({{}})", service.type_name);
    let debug_name = &service.type_name;

    let operations = service.operations.iter().map(generate_operation);
    let locators = service.locators.iter().map(generate_locator);
    let resolve = generate_resolve(service);

    debug!(service = %service.type_name, "Generated service struct");

    Ok(quote! {
        #docs
        #[derive(Clone)]
        pub struct #name {
            connection: std::sync::Arc<arbor::Connection>,
            path: String,
        }

        impl #name {
            /// Creates the service addressed by `path`.
            pub fn new(connection: std::sync::Arc<arbor::Connection>, path: impl Into<String>) -> Self {
                Self {
                    connection,
                    path: path.into(),
                }
            }

            /// Path of this service relative to the base URL.
            pub fn path(&self) -> &str {
                &self.path
            }

            #(#operations)*

            #(#locators)*

            #resolve
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #display, self.path)
            }
        }

        impl std::fmt::Debug for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(#debug_name)
                    .field("path", &self.path)
                    .finish_non_exhaustive()
            }
        }
    })
}

fn service_doc(service: &ServicePlan) -> String {
    let mut doc = service
        .doc
        .clone()
        .unwrap_or_else(|| format!("Client for the `{}` service.", identifier_for(&service.name)));
    if let Some(base) = &service.base {
        doc.push_str(&format!(
            "\n\nIncludes the members of [`{}Service`].",
            base.to_camel_case()
        ));
    }
    doc
}

fn check_member_names(service: &ServicePlan) -> Result<(), GeneratorError> {
    let mut seen: HashSet<&str> = FIXED_MEMBERS.iter().copied().collect();
    let members = service
        .operations
        .iter()
        .map(|o| o.ident.as_str())
        .chain(service.locators.iter().map(|l| l.accessor.as_str()));

    for member in members {
        if !seen.insert(member) {
            return Err(GeneratorError::CodeGenError(format!(
                "Service '{}' has more than one member named '{}'",
                service.type_name, member
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::compile;
    use crate::test_utils::{format_generated_code, library_model, validate_generated_code};
    use arbor_define::{Method, Model, Name, Service};

    #[test]
    fn struct_holds_connection_and_path() {
        let plan = compile(&library_model()).unwrap();
        let books = plan.service(&Name::parse("Books")).unwrap();
        let code = format_generated_code(&generate_service(books).unwrap()).unwrap();

        assert!(code.contains("pub struct BooksService {"));
        assert!(code.contains("connection: std::sync::Arc<arbor::Connection>,"));
        assert!(code.contains("path: String,"));
        assert!(code.contains("pub fn path(&self) -> &str"));
        assert!(code.contains("pub fn add("));
        assert!(code.contains("pub fn list("));
        assert!(code.contains("pub fn reindex("));
        assert!(code.contains("pub fn book_service(&self, id: &str)"));
        assert!(code.contains("pub fn resolve(&self, path: &str)"));
    }

    #[test]
    fn display_and_debug_expose_path() {
        let plan = compile(&library_model()).unwrap();
        let book = plan.service(&Name::parse("Book")).unwrap();
        let code = format_generated_code(&generate_service(book).unwrap()).unwrap();

        assert!(code.contains("impl std::fmt::Display for BookService"));
        assert!(code.contains("write!(f, \"BookService({})\", self.path)"));
        assert!(code.contains("f.debug_struct(\"BookService\")"));
    }

    #[test]
    fn derived_service_doc_mentions_base() {
        let plan = compile(&library_model()).unwrap();
        let authors = plan.service(&Name::parse("Authors")).unwrap();
        let code = format_generated_code(&generate_service(authors).unwrap()).unwrap();
        assert!(code.contains("/// Client for the `authors` service."));
        assert!(code.contains("/// Includes the members of [`CatalogService`]."));
    }

    #[test]
    fn every_library_service_is_valid_rust() {
        let plan = compile(&library_model()).unwrap();
        for service in &plan.services {
            let tokens = generate_service(service).unwrap();
            assert!(validate_generated_code(&tokens).is_ok(), "{}", service.type_name);
        }
    }

    #[test]
    fn member_name_collision_is_rejected() {
        let model = Model::new("Test", "Root").service(Service::new("Root").method(Method::new("Resolve")));
        let plan = compile(&model).unwrap();
        let err = generate_service(plan.root_service().unwrap()).unwrap_err();
        assert!(matches!(err, GeneratorError::CodeGenError(ref msg) if msg.contains("'resolve'")));
    }
}

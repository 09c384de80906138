//! Locator accessor and path router generation.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::codegen::module_docs::doc_attrs;
use crate::naming::rust_ident;
use crate::plan::{LocatorPlan, ServicePlan};

/// Generates the accessor for one locator.
///
/// Parameterless locators append their URL segment to the service path;
/// parameterized ones append the caller's argument.
pub fn generate_locator(locator: &LocatorPlan) -> TokenStream {
    let accessor = rust_ident(&locator.accessor);
    let target = format_ident!("{}", locator.target_type);
    let docs = doc_attrs(&locator.doc);

    match &locator.argument {
        Some(argument) => {
            let argument = rust_ident(argument);
            quote! {
                #docs
                pub fn #accessor(&self, #argument: &str) -> #target {
                    #target::new(
                        std::sync::Arc::clone(&self.connection),
                        arbor::join_path(&self.path, #argument),
                    )
                }
            }
        }
        None => {
            let segment = &locator.segment;
            quote! {
                #docs
                pub fn #accessor(&self) -> #target {
                    #target::new(
                        std::sync::Arc::clone(&self.connection),
                        arbor::join_path(&self.path, #segment),
                    )
                }
            }
        }
    }
}

/// Generates `resolve(path)` for a service.
///
/// Literal edges are tested in name order against the whole path and then
/// as a `segment/` prefix; the wildcard edge takes the first segment as its
/// argument. A path nothing matches is an `ArborError::NoSuchService`.
pub fn generate_resolve(service: &ServicePlan) -> TokenStream {
    let own_variant = format_ident!("{}", service_variant(service));

    let literals = service.router.literals.iter().filter_map(|edge| {
        let locator = service.locator(&edge.locator)?;
        let accessor = rust_ident(&locator.accessor);
        let whole = &edge.segment;
        let prefix = format!("{}/", edge.segment);
        Some(quote! {
            if path == #whole {
                return Ok(self.#accessor().into());
            }
            if let Some(rest) = path.strip_prefix(#prefix) {
                return self.#accessor().resolve(rest);
            }
        })
    });

    let fallback = match service
        .router
        .wildcard
        .as_ref()
        .and_then(|edge| service.locator(&edge.locator))
    {
        Some(locator) => {
            let accessor = rust_ident(&locator.accessor);
            quote! {
                match path.split_once('/') {
                    None => Ok(self.#accessor(path).into()),
                    Some((argument, rest)) => self.#accessor(argument).resolve(rest),
                }
            }
        }
        None => quote! {
            Err(arbor::ArborError::NoSuchService {
                path: path.to_string(),
            })
        },
    };

    quote! {
        /// Resolves a path relative to this service.
        ///
        /// The empty path is this service itself.
        ///
        /// ## Errors
        ///
        /// Returns `ArborError::NoSuchService` when no locator matches.
        pub fn resolve(&self, path: &str) -> Result<AnyService, arbor::ArborError> {
            if path.is_empty() {
                return Ok(AnyService::#own_variant(self.clone()));
            }
            #(#literals)*
            #fallback
        }
    }
}

/// Variant of `AnyService` wrapping the given service.
pub fn service_variant(service: &ServicePlan) -> String {
    service.name.to_camel_case()
}

//! The `AnyService` enum returned by generated routers.
//!
//! `resolve` can land on any service of the tree, so its return type is an
//! enum with one variant per service. The enum forwards `path`, `Display`
//! and `Debug` to the wrapped service.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::codegen::locators::service_variant;
use crate::plan::ClientPlan;

/// Generates `AnyService` and its `From` conversions.
pub fn generate_any_service(plan: &ClientPlan) -> TokenStream {
    let doc = format!(" Any service of the {} API, as returned by `resolve`.", plan.name);

    let variants: Vec<_> = plan
        .services
        .iter()
        .map(|s| format_ident!("{}", service_variant(s)))
        .collect();
    let types: Vec<_> = plan
        .services
        .iter()
        .map(|s| format_ident!("{}", s.type_name))
        .collect();
    let type_names: Vec<&String> = plan.services.iter().map(|s| &s.type_name).collect();

    quote! {
        #[doc = #doc]
        #[derive(Clone, Debug)]
        pub enum AnyService {
            #( #variants(#types), )*
        }

        impl AnyService {
            /// Path of the wrapped service.
            pub fn path(&self) -> &str {
                match self {
                    #( Self::#variants(service) => service.path(), )*
                }
            }

            /// Name of the wrapped service type.
            pub fn type_name(&self) -> &'static str {
                match self {
                    #( Self::#variants(_) => #type_names, )*
                }
            }
        }

        impl std::fmt::Display for AnyService {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    #( Self::#variants(service) => std::fmt::Display::fmt(service, f), )*
                }
            }
        }

        #(
            impl From<#types> for AnyService {
                fn from(service: #types) -> Self {
                    Self::#variants(service)
                }
            }
        )*
    }
}

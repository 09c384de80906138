//! Shared test utilities for arbor-gen tests.
//!
//! Fixtures for models and helpers for checking generated tokens.

use arbor_define::Model;
use proc_macro2::TokenStream;

/// The bundled library model.
pub fn library_model() -> Model {
    arbor_definitions::define_library_model()
}

/// Validates that generated code parses as a Rust file.
///
/// ## Errors
///
/// Returns an error string if the generated code fails to parse.
pub fn validate_generated_code(tokens: &TokenStream) -> Result<(), String> {
    syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(())
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_fixture_is_valid() {
        library_model().validate().unwrap();
    }

    #[test]
    fn validate_rejects_incomplete_code() {
        let tokens = quote::quote! { let x = };
        assert!(validate_generated_code(&tokens).is_err());
    }
}

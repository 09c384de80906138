//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of generation: validating the client
//! tokens, formatting them, and writing them to disk atomically. It can also
//! emit the compiled [`ClientPlan`] as JSON for tools that interpret plans
//! instead of compiling generated code.
//!
//! ## Output Structure
//!
//! ```text
//! <crate>/src/
//! ├── lib.rs       # Generated client (--emit rust)
//! └── plan.json    # Serialized client plan (--emit plan)
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use arbor_define::Model;
use proc_macro2::TokenStream;
use strum::{Display, EnumString};
use tracing::info;

use crate::codegen::{generate_client, generate_client_items};
use crate::errors::GeneratorError;
use crate::plan::{ClientPlan, compile};

/// What the generator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EmitKind {
    /// Rust client source (`lib.rs`).
    #[default]
    Rust,
    /// The compiled plan as JSON (`plan.json`).
    Plan,
}

impl EmitKind {
    /// File name written for this kind.
    pub fn file_name(&self) -> &'static str {
        match self {
            EmitKind::Rust => "lib.rs",
            EmitKind::Plan => "plan.json",
        }
    }
}

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease.
///
/// Prepends an auto-generated notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by arbor-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// Readers see either the old or the new content, never a partial write.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Renders the formatted client source for a plan.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if generation fails or produces
/// invalid Rust.
pub fn render_client(plan: &ClientPlan) -> Result<String, GeneratorError> {
    let tokens = generate_client(plan)?;
    let file = validate_code(&tokens)?;
    Ok(format_code(&file))
}

/// Renders the formatted client items for embedding with `include!`.
///
/// Unlike [`render_client`] the output has no crate docs and no generated
/// notice, so it can be included into an existing module.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if generation fails or produces
/// invalid Rust.
pub fn render_client_items(plan: &ClientPlan) -> Result<String, GeneratorError> {
    let tokens = generate_client_items(plan)?;
    let file = validate_code(&tokens)?;
    Ok(prettyplease::unparse(&file))
}

/// Renders a plan as pretty-printed JSON.
///
/// ## Errors
///
/// Returns `GeneratorError::Serialization` if the plan cannot be serialized.
pub fn render_plan_json(plan: &ClientPlan) -> Result<String, GeneratorError> {
    let mut json = serde_json::to_string_pretty(plan)?;
    json.push('\n');
    Ok(json)
}

/// Validates, compiles and renders a model, then writes the result.
///
/// With `dry_run` the output is printed instead of written.
///
/// ## Returns
///
/// The rendered content (useful for dry-run mode or testing).
///
/// ## Errors
///
/// Returns an error if:
/// - The model fails validation
/// - Services cannot be ordered
/// - Code generation produces invalid Rust
/// - File writing fails
pub fn generate_and_write(
    model: &Model,
    output_dir: &Path,
    emit: EmitKind,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    model.validate()?;
    let plan = compile(model)?;

    let content = match emit {
        EmitKind::Rust => render_client(&plan)?,
        EmitKind::Plan => render_plan_json(&plan)?,
    };

    let file_name = emit.file_name();
    if dry_run {
        println!("=== {} ===\n{}\n", file_name, content);
    } else {
        let path = output_dir.join(file_name);
        write_atomic(&path, &content)?;
        info!(path = %path.display(), %emit, "Wrote generated output");
    }

    Ok(content)
}

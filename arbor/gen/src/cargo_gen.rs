//! Cargo.toml generation for generated client crates.
//!
//! A generated client depends only on the `arbor` runtime. Inside this
//! workspace the runtime is referenced by path; elsewhere by version.

use std::path::Path;

use tracing::info;

use crate::errors::GeneratorError;
use crate::output::write_atomic;

/// Version of the `arbor` runtime generated clients depend on.
pub const RUNTIME_VERSION: &str = "0.1.0";

/// Renders the Cargo.toml of a generated client crate.
///
/// ## Examples
///
/// ```
/// use arbor_gen::cargo_gen::generate_cargo_toml;
///
/// let manifest = generate_cargo_toml("library-client", Some("../arbor"));
/// assert!(manifest.contains("name = \"library-client\""));
/// assert!(manifest.contains("path = \"../arbor\""));
/// ```
pub fn generate_cargo_toml(crate_name: &str, runtime_path: Option<&str>) -> String {
    let runtime = match runtime_path {
        Some(path) => format!(
            "arbor = {{ version = \"{}\", path = \"{}\" }}",
            RUNTIME_VERSION,
            path.replace('\\', "/")
        ),
        None => format!("arbor = \"{}\"", RUNTIME_VERSION),
    };

    format!(
        r#"# This file was automatically generated by arbor-gen.
# Do not edit manually - changes will be overwritten.

[package]
name = "{crate_name}"
version = "0.1.0"
edition = "2024"
license = "AGPL-3.0-only"
description = "Generated client for an arbor service model"

[lib]
path = "src/lib.rs"

[dependencies]
{runtime}
"#
    )
}

/// Checks that a crate name is usable as a Cargo package name.
fn validate_crate_name(name: &str) -> Result<(), GeneratorError> {
    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if starts_with_letter && allowed {
        Ok(())
    } else {
        Err(GeneratorError::ConfigError(format!(
            "Invalid crate name '{}': use letters, digits, '-' and '_', starting with a letter",
            name
        )))
    }
}

/// Writes the Cargo.toml of a generated client crate into `crate_dir`.
///
/// With `dry_run` the manifest is printed instead of written.
///
/// ## Errors
///
/// Returns `GeneratorError::ConfigError` for an invalid crate name and
/// `GeneratorError::WriteError` if the file cannot be written.
pub fn write_cargo_toml(
    crate_dir: &Path,
    crate_name: &str,
    runtime_path: Option<&str>,
    dry_run: bool,
) -> Result<String, GeneratorError> {
    validate_crate_name(crate_name)?;
    let content = generate_cargo_toml(crate_name, runtime_path);

    if dry_run {
        println!("=== Cargo.toml ===\n{}\n", content);
    } else {
        let path = crate_dir.join("Cargo.toml");
        write_atomic(&path, &content)?;
        info!(path = %path.display(), "Wrote client manifest");
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn manifest_parses_as_toml() {
        let manifest = generate_cargo_toml("library-client", None);
        let parsed: toml::Value = toml::from_str(&manifest).unwrap();

        assert_eq!(parsed["package"]["name"].as_str(), Some("library-client"));
        assert_eq!(parsed["package"]["edition"].as_str(), Some("2024"));
        assert_eq!(parsed["dependencies"]["arbor"].as_str(), Some(RUNTIME_VERSION));
    }

    #[test]
    fn runtime_path_becomes_path_dependency() {
        let manifest = generate_cargo_toml("client", Some("../../arbor"));
        let parsed: toml::Value = toml::from_str(&manifest).unwrap();

        let arbor = &parsed["dependencies"]["arbor"];
        assert_eq!(arbor["path"].as_str(), Some("../../arbor"));
        assert_eq!(arbor["version"].as_str(), Some(RUNTIME_VERSION));
    }

    #[test]
    fn manifest_carries_generated_notice() {
        let manifest = generate_cargo_toml("client", None);
        assert!(manifest.starts_with("# This file was automatically generated by arbor-gen."));
    }

    #[test]
    fn writes_manifest_to_crate_dir() {
        let dir = TempDir::new().unwrap();
        write_cargo_toml(dir.path(), "client", None, false).unwrap();
        let written = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(written.contains("name = \"client\""));
    }

    #[test]
    fn dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        write_cargo_toml(dir.path(), "client", None, true).unwrap();
        assert!(!dir.path().join("Cargo.toml").exists());
    }

    #[test]
    fn invalid_crate_names_are_rejected() {
        for name in ["", "1client", "my client", "client!"] {
            let err = write_cargo_toml(Path::new("."), name, None, true).unwrap_err();
            assert!(matches!(err, GeneratorError::ConfigError(_)), "{name}");
        }
    }
}

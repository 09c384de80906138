//! Error types for the arbor generator.

use arbor_define::ModelError;
use thiserror::Error;

/// Errors that can occur during planning and code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The model failed to load or validate.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Service ordering stopped making progress.
    ///
    /// Every remaining service waits on a base that never becomes available,
    /// either because the base relation is cyclic or because a base is not
    /// part of the service set.
    #[error("Cannot order services; unresolvable bases for: {}", services.join(", "))]
    UnresolvableBase {
        /// The services still pending when progress stopped.
        services: Vec<String>,
    },

    /// A service referenced during planning is not in the model.
    #[error("Unknown service '{0}'")]
    UnknownService(String),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to serialize the client plan
    #[error("Failed to serialize plan: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

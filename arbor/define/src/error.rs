//! Errors raised while loading or validating a model.

use thiserror::Error;

/// Errors that make a model unusable for generation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A name with no words.
    #[error("Name must contain at least one word")]
    EmptyName,

    /// Two services share a structural name.
    #[error("Service '{0}' is declared more than once")]
    DuplicateService(String),

    /// The declared root is not one of the services.
    #[error("Root service '{0}' is not declared")]
    UnknownRoot(String),

    /// A service extends a service that does not exist.
    #[error("Service '{service}' extends unknown service '{base}'")]
    UnknownBase { service: String, base: String },

    /// A locator resolves to a service that does not exist.
    #[error("Locator '{locator}' of service '{service}' targets unknown service '{target}'")]
    UnknownLocatorTarget {
        service: String,
        locator: String,
        target: String,
    },

    /// Only one wildcard edge per node is allowed.
    #[error("Service '{service}' declares more than one parameterized locator: {locators:?}")]
    MultipleParameterizedLocators {
        service: String,
        locators: Vec<String>,
    },

    /// Following `base` links from a service leads back to it.
    #[error("Service '{0}' is part of a base cycle")]
    BaseCycle(String),

    /// The model file has an extension we cannot read.
    #[error("Unsupported model format '{0}': expected .json, .yaml or .yml")]
    UnsupportedFormat(String),

    /// Failed to read a model file.
    #[error("Failed to read model '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML model: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

//! Caller-supplied options for a single operation.

use std::collections::BTreeMap;

use crate::value::Value;

/// Named option values plus header and query overrides.
///
/// Option keys are the snake_case identifiers of method parameters. The
/// `headers` and `query` maps are accepted by every operation and are merged
/// into the outgoing request after the generated entries, so they win.
///
/// ## Examples
///
/// ```
/// use arbor::{Options, Value};
///
/// let opts = Options::new()
///     .with("flag", true)
///     .header("Correlation-Id", "abc")
///     .query("max", "10");
///
/// assert_eq!(opts.get("flag"), Some(&Value::Boolean(true)));
/// assert_eq!(opts.headers().get("Correlation-Id").map(String::as_str), Some("abc"));
/// assert!(opts.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: BTreeMap<String, Value>,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named option value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Adds a header override.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds a query override.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a named option, if supplied.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn query_overrides(&self) -> &BTreeMap<String, String> {
        &self.query
    }
}

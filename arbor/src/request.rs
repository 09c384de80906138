//! Transport-neutral request and response shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::options::Options;

/// HTTP verbs used by service operations.
///
/// ## Examples
///
/// ```
/// use arbor::Verb;
///
/// assert_eq!(Verb::Delete.to_string(), "DELETE");
/// let parsed: Verb = "PUT".parse().unwrap();
/// assert_eq!(parsed, Verb::Put);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Appends a segment to a service path.
///
/// The root service has an empty path, so its children are addressed by the
/// bare segment rather than with a leading separator.
///
/// ## Examples
///
/// ```
/// use arbor::join_path;
///
/// assert_eq!(join_path("", "books"), "books");
/// assert_eq!(join_path("books", "7"), "books/7");
/// ```
pub fn join_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}/{segment}")
    }
}

/// A request addressed relative to the connection's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub verb: Verb,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Merges the header and query overrides from the caller's options.
    ///
    /// Overrides are applied last, so a key set both by a declared option and
    /// by `Options::query` is sent with the override's value.
    pub fn with_options(mut self, options: &Options) -> Self {
        self.headers
            .extend(options.headers().iter().map(|(k, v)| (k.clone(), v.clone())));
        self.query
            .extend(options.query_overrides().iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

/// A response as seen by the fault checker and codec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

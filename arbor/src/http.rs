//! Blocking HTTP transport over `reqwest`.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{Span, instrument};
use url::Url;

use crate::connection::Transport;
use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring an [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl HttpTransportBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns `TransportError::InvalidHeader` if the name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, TransportError> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the [`HttpTransport`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .build()?;

        Ok(HttpTransport {
            client,
            base_url: with_trailing_slash(self.base_url),
        })
    }
}

/// A [`Transport`] that sends requests over HTTP.
///
/// Request paths are joined onto the base URL, so a base of
/// `https://example.com/api` and a path of `books/7` address
/// `https://example.com/api/books/7`.
///
/// ## Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use arbor::{Connection, HttpTransport};
/// use url::Url;
///
/// let transport = HttpTransport::builder(Url::parse("https://library.example.com/api").unwrap())
///     .default_header("Accept", "application/json")
///     .unwrap()
///     .build()
///     .unwrap();
/// let connection = Arc::new(Connection::new(transport));
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn builder(base_url: Url) -> HttpTransportBuilder {
        HttpTransportBuilder::new(base_url)
    }

    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, TransportError> {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the absolute URL for a request path and query.
    ///
    /// Each `/`-separated segment of `path` is appended below the base path
    /// and percent-encoded, so locator arguments holding `?`, `#` or `:` stay
    /// inside their segment. `.` and `..` segments are dropped.
    ///
    /// ## Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the base URL cannot carry a path.
    pub fn url_for(&self, path: &str, query: &BTreeMap<String, String>) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
                .pop_if_empty()
                .extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    #[instrument(
        name = "http_send",
        skip(self, request),
        fields(
            http.method = %request.verb,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.url_for(&request.path, &request.query)?;
        Span::current().record("http.url", url.as_str());

        let mut builder = self.client.request(request.verb.to_reqwest(), url);
        for (name, value) in &request.headers {
            let (name, value) = header_pair(name, value)?;
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        Span::current().record("http.status_code", status);

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TransportError> {
    let header_name = HeaderName::try_from(name).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let header_value = HeaderValue::try_from(value).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok((header_name, header_value))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn paths_join_below_base_path() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for("books/7", &BTreeMap::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/7");
    }

    #[test]
    fn leading_slash_does_not_escape_base() {
        let transport = transport("https://example.com/api/");
        let url = transport.url_for("/books", &BTreeMap::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books");
    }

    #[test]
    fn locator_arguments_are_percent_encoded() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for("books/a?b#c d", &BTreeMap::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/a%3Fb%23c%20d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn argument_with_colon_is_not_a_scheme() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for("urn:isbn:42", &BTreeMap::new()).unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.as_str(), "https://example.com/api/urn:isbn:42");
    }

    #[test]
    fn dot_segments_stay_under_base() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for("books/../../admin", &BTreeMap::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/books/admin");
    }

    #[test]
    fn root_path_addresses_base() {
        let transport = transport("https://example.com/api");
        let url = transport.url_for("", &BTreeMap::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/");
    }

    #[test]
    fn query_is_encoded() {
        let transport = transport("https://example.com/api");
        let mut query = BTreeMap::new();
        query.insert("search".to_string(), "title=dune rising".to_string());
        query.insert("flag".to_string(), "true".to_string());
        let url = transport.url_for("books", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/books?flag=true&search=title%3Ddune+rising"
        );
    }

    #[test]
    fn invalid_default_header_is_rejected() {
        let result = HttpTransport::builder(Url::parse("https://example.com").unwrap())
            .default_header("Bad Header", "x");
        assert!(matches!(result, Err(TransportError::InvalidHeader { .. })));
    }
}

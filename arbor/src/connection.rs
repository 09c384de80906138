//! The shared connection handle and fault checking.
//!
//! Every service holds an `Arc<Connection>` and a path. The connection owns
//! the [`Transport`] that moves bytes and the [`Codec`] that gives them shape.

use std::fmt;

use tracing::{debug, instrument};

use crate::codec::{Codec, JsonCodec};
use crate::error::{ArborError, ServerFault, TransportError};
use crate::request::{HttpRequest, HttpResponse};
use crate::value::{StructValue, Value};

/// Type name used for custom action envelopes.
pub const ACTION_TYPE: &str = "Action";

/// Type name used for fault documents.
pub const FAULT_TYPE: &str = "Fault";

/// Sends requests and returns responses.
///
/// Implementations must be usable from several threads at once; services
/// sharing a connection may be invoked concurrently.
pub trait Transport: Send + Sync {
    /// Sends a request and waits for the complete response.
    ///
    /// ## Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A transport and codec pair shared by all services of a client.
///
/// ## Examples
///
/// ```
/// use std::sync::Arc;
/// use arbor::{Connection, HttpRequest, HttpResponse, Transport, TransportError, Verb};
///
/// struct Always200;
///
/// impl Transport for Always200 {
///     fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::new(200))
///     }
/// }
///
/// let connection = Arc::new(Connection::new(Always200));
/// let response = connection.send(HttpRequest::new(Verb::Get, "books")).unwrap();
/// assert_eq!(response.status, 200);
/// ```
pub struct Connection {
    transport: Box<dyn Transport>,
    codec: Box<dyn Codec>,
}

impl Connection {
    /// Creates a connection using the JSON codec.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            codec: Box::new(JsonCodec),
        }
    }

    /// Replaces the codec.
    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Sends a request through the transport.
    ///
    /// A `Content-Type` header naming the codec's MIME type is added to
    /// requests with a body unless the caller already set one.
    ///
    /// ## Errors
    ///
    /// Returns `ArborError::Transport` if the transport fails.
    #[instrument(name = "arbor_send", skip(self, request), fields(verb = %request.verb, path = %request.path))]
    pub fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ArborError> {
        if request.body.is_some()
            && !request
                .headers
                .keys()
                .any(|k| k.eq_ignore_ascii_case("content-type"))
        {
            request
                .headers
                .insert("Content-Type".to_string(), self.codec.content_type().to_string());
        }

        debug!(query = ?request.query, has_body = request.body.is_some(), "Sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }

    /// Translates a non-success response into a fault.
    ///
    /// The body is decoded as a fault document when possible; a body that
    /// cannot be decoded still yields a fault carrying the status.
    pub fn check_fault(&self, response: &HttpResponse) -> ArborError {
        let mut fault = ServerFault::new(response.status);
        if !response.body.is_empty()
            && let Ok(Value::Struct(document)) = self.codec.read_one(FAULT_TYPE, &response.body)
        {
            apply_fault_fields(&mut fault, &document);
        }
        debug!(status = fault.status, reason = ?fault.reason, "Server fault");
        ArborError::Fault(fault)
    }

    /// Decodes the action envelope returned by a custom action.
    ///
    /// ## Errors
    ///
    /// Returns a fault when the status is not 200, when the envelope carries a
    /// `fault` field, or when its `status` is `failed`. Returns
    /// `ArborError::Codec` when a 200 body is not an envelope.
    pub fn check_action(&self, response: &HttpResponse) -> Result<StructValue, ArborError> {
        if response.status != 200 {
            return Err(self.check_fault(response));
        }

        let envelope = match self.codec.read_one(ACTION_TYPE, &response.body)? {
            Value::Struct(envelope) => envelope,
            _ => StructValue::new(ACTION_TYPE),
        };

        if let Some(embedded) = envelope.get("fault") {
            let mut fault = ServerFault::new(response.status);
            if let Some(document) = as_fields(embedded) {
                apply_fault_fields(&mut fault, &document);
            }
            return Err(fault.into());
        }

        if envelope.get("status").and_then(Value::as_str) == Some("failed") {
            return Err(ServerFault::new(response.status)
                .with_reason("Action failed")
                .into());
        }

        Ok(envelope)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("content_type", &self.codec.content_type())
            .finish_non_exhaustive()
    }
}

fn as_fields(value: &Value) -> Option<StructValue> {
    match value {
        Value::Struct(s) => Some(s.clone()),
        Value::Mapping(fields) => Some(StructValue {
            type_name: FAULT_TYPE.to_string(),
            fields: fields.clone(),
        }),
        _ => None,
    }
}

fn apply_fault_fields(fault: &mut ServerFault, document: &StructValue) {
    if let Some(reason) = document.get("reason").and_then(Value::as_str) {
        fault.reason = Some(reason.to_string());
    }
    if let Some(detail) = document.get("detail").and_then(Value::as_str) {
        fault.detail = Some(detail.to_string());
    }
}

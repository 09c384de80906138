//! An in-memory transport for tests.
//!
//! [`RecordingTransport`] answers from a queue of canned responses and keeps
//! every request it receives, so tests can assert on the exact request shape
//! an operation produced.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::connection::Transport;
use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// A transport that records requests and replays queued responses.
///
/// Clones share state, so one clone can be handed to a
/// [`Connection`](crate::Connection) while another is kept for assertions.
///
/// ## Examples
///
/// ```
/// use std::sync::Arc;
/// use arbor::mock::RecordingTransport;
/// use arbor::{Connection, HttpRequest, HttpResponse, Verb};
///
/// let transport = RecordingTransport::new();
/// transport.respond(HttpResponse::new(200));
///
/// let connection = Arc::new(Connection::new(transport.clone()));
/// connection.send(HttpRequest::new(Verb::Delete, "items/7")).unwrap();
///
/// let sent = transport.last_request().unwrap();
/// assert_eq!(sent.verb, Verb::Delete);
/// assert_eq!(sent.path, "items/7");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next request.
    pub fn respond(&self, response: HttpResponse) {
        self.lock().responses.push_back(response);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.lock();
        let summary = format!("{} {}", request.verb, request.path);
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .ok_or_else(|| TransportError::Connection(format!("No response queued for {summary}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Verb;

    #[test]
    fn empty_queue_is_a_transport_error() {
        let transport = RecordingTransport::new();
        let err = transport
            .send(HttpRequest::new(Verb::Get, "books"))
            .unwrap_err();
        assert!(err.to_string().contains("GET books"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn responses_are_replayed_in_order() {
        let transport = RecordingTransport::new();
        transport.respond(HttpResponse::new(201));
        transport.respond(HttpResponse::new(404));

        let first = transport.send(HttpRequest::new(Verb::Post, "books")).unwrap();
        let second = transport.send(HttpRequest::new(Verb::Get, "books/1")).unwrap();
        assert_eq!((first.status, second.status), (201, 404));
    }
}

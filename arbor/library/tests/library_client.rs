//! Integration tests for the generated library client.
//!
//! The client is driven against a recording transport, so every assertion is
//! about the request the generated method sent and the value or error it
//! returned.

use std::sync::Arc;

use arbor::mock::RecordingTransport;
use arbor::{ArborError, Connection, HttpRequest, HttpResponse, Options, StructValue, Value, Verb};
use arbor_library::{AnyService, LibraryService};
use serde_json::json;

fn library() -> (LibraryService, RecordingTransport) {
    let transport = RecordingTransport::new();
    let connection = Arc::new(Connection::new(transport.clone()));
    (arbor_library::root(connection), transport)
}

fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
}

fn query<'a>(request: &'a HttpRequest, key: &str) -> Option<&'a str> {
    request.query.get(key).map(String::as_str)
}

#[test]
fn add_posts_book_with_notify_query() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(201).with_body(r#"{"id":"7","title":"Dune"}"#));

    let book = StructValue::new("Book").field("title", "Dune");
    let added = library
        .books_service()
        .add(book, &Options::new().with("notify", true))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.verb, Verb::Post);
    assert_eq!(request.path, "books");
    assert_eq!(query(&request, "notify"), Some("true"));
    assert_eq!(request.query.len(), 1);
    assert_eq!(body_json(&request), json!({"title": "Dune"}));

    let added = added.as_struct().unwrap();
    assert_eq!(added.type_name, "Book");
    assert_eq!(added.get("id"), Some(&Value::from("7")));
}

#[test]
fn add_failure_is_server_fault() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(404).with_body(r#"{"reason":"Not Found","detail":"no shelf"}"#));

    let book = StructValue::new("Book").field("title", "Dune");
    match library.books_service().add(book, &Options::new()) {
        Err(ArborError::Fault(fault)) => {
            assert_eq!(fault.status, 404);
            assert_eq!(fault.reason.as_deref(), Some("Not Found"));
            assert_eq!(fault.detail.as_deref(), Some("no shelf"));
        }
        other => panic!("expected a fault, got {other:?}"),
    }
}

#[test]
fn remove_deletes_located_book() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200));

    library
        .books_service()
        .book_service("7")
        .remove(&Options::new().with("force", true))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.verb, Verb::Delete);
    assert_eq!(request.path, "books/7");
    assert_eq!(query(&request, "force"), Some("true"));
    assert!(request.body.is_none());
}

#[test]
fn remove_conflict_is_server_fault() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(409));

    let err = library
        .books_service()
        .book_service("7")
        .remove(&Options::new())
        .unwrap_err();
    assert!(err.is_fault());
    assert_eq!(err.status_code(), Some(409));
}

#[test]
fn list_reads_many_books() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200).with_body(r#"[{"title":"Dune"},{"title":"Emma"}]"#));

    let books = library
        .books_service()
        .list(&Options::new().with("max", 10).with("search", "d"))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.verb, Verb::Get);
    assert_eq!(query(&request, "max"), Some("10"));
    assert_eq!(query(&request, "search"), Some("d"));

    let books = books.as_list().unwrap();
    assert_eq!(books.element_type, "Book");
    assert_eq!(books.len(), 2);
}

#[test]
fn option_of_wrong_kind_is_rejected_before_sending() {
    let (library, transport) = library();

    let err = library
        .books_service()
        .list(&Options::new().with("max", "ten"))
        .unwrap_err();

    assert!(matches!(err, ArborError::InvalidOption { ref name, .. } if name == "max"));
    assert!(transport.requests().is_empty());
}

#[test]
fn check_out_posts_envelope_and_returns_loan() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200).with_body(r#"{"status":"complete","loan":{"id":"L1"}}"#));

    let loan = library
        .books_service()
        .book_service("3")
        .check_out(&Options::new().with("member", Value::from(json!({"id": "m1"}))))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.verb, Verb::Post);
    assert_eq!(request.path, "books/3/checkout");
    assert_eq!(body_json(&request), json!({"member": {"id": "m1"}}));
    assert_eq!(loan.as_struct().unwrap().type_name, "Loan");
}

#[test]
fn inherited_action_runs_on_derived_service() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200).with_body(r#"{"job":{"id":"j"}}"#));

    library
        .authors_service()
        .reindex(&Options::new().with("full", true))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "authors/reindex");
    assert_eq!(body_json(&request), json!({"full": true}));
}

#[test]
fn resolve_walks_literal_and_wildcard_edges() {
    let (library, _) = library();

    let book = library.resolve("books/42").unwrap();
    assert!(matches!(book, AnyService::Book(_)));
    assert_eq!(book.type_name(), "BookService");
    assert_eq!(book.path(), "books/42");
    assert_eq!(book.to_string(), "BookService(books/42)");

    let authors = library.resolve("authors").unwrap();
    assert_eq!(authors.type_name(), "AuthorsService");

    let itself = library.resolve("").unwrap();
    assert_eq!(itself.type_name(), "LibraryService");
    assert_eq!(itself.path(), "");
}

#[test]
fn resolve_rejects_unknown_paths() {
    let (library, _) = library();

    for path in ["shelves", "books/42/pages"] {
        match library.resolve(path) {
            Err(ArborError::NoSuchService { .. }) => {}
            other => panic!("{path} resolved to {other:?}"),
        }
    }
}

#[test]
fn resolved_service_sends_requests() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200).with_body(r#"{"title":"Dune"}"#));

    let AnyService::Book(book) = library.resolve("books/9").unwrap() else {
        panic!("books/9 should resolve to a book");
    };
    let value = book.get(&Options::new()).unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.verb, Verb::Get);
    assert_eq!(request.path, "books/9");
    assert_eq!(value.as_struct().unwrap().type_name, "Book");
}

#[test]
fn query_override_replaces_declared_option() {
    let (library, transport) = library();
    transport.respond(HttpResponse::new(200).with_body("[]"));

    library
        .books_service()
        .list(&Options::new().with("max", 5).query("max", "50"))
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(query(&request, "max"), Some("50"));
}

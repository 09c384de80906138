//! Runtime interpretation of a client plan.
//!
//! A [`DynamicService`] is the untyped twin of a generated service struct: it
//! holds the same two pieces of state (a shared [`Connection`] and a path)
//! plus a reference into a [`ClientPlan`], and performs exactly the requests
//! the generated code would. It lets a model be driven without compiling a
//! client crate first.
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use arbor::mock::RecordingTransport;
//! use arbor::{Connection, HttpResponse, Options, Verb};
//! use arbor_definitions::define_library_model;
//! use arbor_gen::dynamic::DynamicService;
//! use arbor_gen::plan::compile;
//!
//! let plan = Arc::new(compile(&define_library_model()).unwrap());
//! let transport = RecordingTransport::new();
//! let root = DynamicService::root(plan, Arc::new(Connection::new(transport.clone()))).unwrap();
//!
//! let book = root.resolve("books/42").unwrap();
//! assert_eq!(book.type_name(), "BookService");
//!
//! transport.respond(HttpResponse::new(200));
//! book.invoke("remove", None, &Options::new()).unwrap();
//! assert_eq!(transport.last_request().unwrap().verb, Verb::Delete);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arbor::{
    ACTION_TYPE, ArborError, Connection, HttpRequest, HttpResponse, Options, StructValue, Value,
    join_path, render_query_value,
};
use arbor_define::Name;
use tracing::{debug, instrument};

use crate::classify::Strategy;
use crate::plan::{ClientPlan, OperationPlan, QueryParameter, ResponsePlan, ServicePlan};

/// A service instance driven by a [`ClientPlan`].
#[derive(Clone)]
pub struct DynamicService {
    plan: Arc<ClientPlan>,
    index: usize,
    connection: Arc<Connection>,
    path: String,
}

impl DynamicService {
    /// Returns the root service, addressed by the empty path.
    ///
    /// ## Errors
    ///
    /// Returns `ArborError::NoSuchService` if the plan's root index names no
    /// service.
    pub fn root(plan: Arc<ClientPlan>, connection: Arc<Connection>) -> Result<Self, ArborError> {
        if plan.root_service().is_none() {
            return Err(ArborError::NoSuchService {
                path: String::new(),
            });
        }
        let index = plan.root;
        Ok(Self::new(plan, index, connection, String::new()))
    }

    /// `index` must be a position in `plan.services`.
    pub(crate) fn new(
        plan: Arc<ClientPlan>,
        index: usize,
        connection: Arc<Connection>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            plan,
            index,
            connection,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name of the generated struct this instance stands in for.
    pub fn type_name(&self) -> &str {
        &self.service_plan().type_name
    }

    pub fn service_plan(&self) -> &ServicePlan {
        // Checked by `root`, and `child` only takes indices from `service_index`.
        &self.plan.services[self.index]
    }

    /// Invokes an operation by name.
    ///
    /// `argument` is the primary parameter of `Add` and `Update`; every other
    /// input travels in `options`, keyed by its snake_case identifier.
    ///
    /// ## Errors
    ///
    /// - `ArborError::UnknownMethod` if the service has no such operation
    /// - `ArborError::MissingArgument` if a body operation gets no argument
    /// - `ArborError::Fault` for responses outside the success codes
    /// - any transport or codec error, unchanged
    #[instrument(
        name = "arbor_invoke",
        skip(self, argument, options),
        fields(service = %self.type_name(), path = %self.path)
    )]
    pub fn invoke(
        &self,
        method: &str,
        argument: Option<Value>,
        options: &Options,
    ) -> Result<Value, ArborError> {
        let name = Name::parse(method);
        let operation =
            self.service_plan()
                .operation(&name)
                .ok_or_else(|| ArborError::UnknownMethod {
                    service: self.type_name().to_string(),
                    method: method.to_string(),
                })?;
        debug!(strategy = %operation.strategy, verb = %operation.verb, "Invoking operation");

        match operation.strategy {
            Strategy::Action => self.invoke_action(operation, options),
            _ => self.invoke_standard(operation, argument, options),
        }
    }

    fn invoke_standard(
        &self,
        operation: &OperationPlan,
        argument: Option<Value>,
        options: &Options,
    ) -> Result<Value, ArborError> {
        let mut request = HttpRequest::new(operation.verb, self.path.clone())
            .with_query(build_query(&operation.query, options)?);

        if let Some(primary) = &operation.primary {
            let value = argument.ok_or_else(|| ArborError::MissingArgument {
                method: operation.ident.clone(),
                argument: primary.ident.clone(),
            })?;
            let value = primary.shape.coerce(value);
            let body = primary.shape.write(self.connection.codec(), &value)?;
            request = request.with_body(body);
        }

        let response = self.connection.send(request.with_options(options))?;
        if !operation.success_codes.contains(&response.status) {
            return Err(self.connection.check_fault(&response));
        }

        match &operation.response {
            ResponsePlan::Body { shape } if !response.body.is_empty() => {
                Ok(shape.read(self.connection.codec(), &response.body)?)
            }
            _ => Ok(Value::Null),
        }
    }

    fn invoke_action(
        &self,
        operation: &OperationPlan,
        options: &Options,
    ) -> Result<Value, ArborError> {
        let mut envelope = StructValue::new(ACTION_TYPE);
        for field in &operation.envelope {
            if let Some(value) = options.get(&field.option) {
                let value = match &field.shape {
                    Some(shape) => shape.coerce(value.clone()),
                    None => value.clone(),
                };
                envelope = envelope.field(field.tag.clone(), value);
            }
        }

        let body = self
            .connection
            .codec()
            .write_one(ACTION_TYPE, &Value::Struct(envelope))?;
        let segment = operation.action_segment.as_deref().unwrap_or_default();
        let request = HttpRequest::new(operation.verb, join_path(&self.path, segment))
            .with_body(body)
            .with_options(options);

        let response: HttpResponse = self.connection.send(request)?;
        let mut envelope = self.connection.check_action(&response)?;

        match &operation.response {
            ResponsePlan::ActionField { tag, shape } => {
                let value = envelope.fields.remove(tag).unwrap_or_default();
                Ok(match shape {
                    Some(shape) => shape.coerce(value),
                    None => value,
                })
            }
            _ => Ok(Value::Null),
        }
    }

    /// Follows a locator by name.
    ///
    /// Parameterless locators ignore `argument`; parameterized ones require it.
    ///
    /// ## Errors
    ///
    /// Returns `ArborError::UnknownLocator` for an unknown locator and
    /// `ArborError::MissingArgument` when a required argument is absent.
    pub fn locate(&self, locator: &str, argument: Option<&str>) -> Result<Self, ArborError> {
        let name = Name::parse(locator);
        let plan = self
            .service_plan()
            .locator(&name)
            .ok_or_else(|| ArborError::UnknownLocator {
                service: self.type_name().to_string(),
                locator: locator.to_string(),
            })?;

        let segment = match &plan.argument {
            Some(argument_name) => argument.ok_or_else(|| ArborError::MissingArgument {
                method: plan.accessor.clone(),
                argument: argument_name.clone(),
            })?,
            None => plan.segment.as_str(),
        };

        self.child(&plan.target, segment)
            .ok_or_else(|| ArborError::UnknownLocator {
                service: self.type_name().to_string(),
                locator: locator.to_string(),
            })
    }

    /// Resolves a slash-delimited path relative to this service.
    ///
    /// The empty path is this service. Otherwise literal locators are tried
    /// in name order, matching either the whole path or a prefix followed by
    /// `/`; failing that, the parameterized locator, if any, takes the first
    /// segment as its argument.
    ///
    /// ## Errors
    ///
    /// Returns `ArborError::NoSuchService` carrying the unmatched remainder.
    pub fn resolve(&self, path: &str) -> Result<Self, ArborError> {
        if path.is_empty() {
            return Ok(self.clone());
        }

        let router = &self.service_plan().router;
        let no_such_service = || ArborError::NoSuchService {
            path: path.to_string(),
        };

        for edge in &router.literals {
            if path == edge.segment {
                debug!(from = %self.type_name(), segment = %edge.segment, "Resolved literal segment");
                return self.child(&edge.target, &edge.segment).ok_or_else(no_such_service);
            }
            if let Some(rest) = path
                .strip_prefix(edge.segment.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                return self
                    .child(&edge.target, &edge.segment)
                    .ok_or_else(no_such_service)?
                    .resolve(rest);
            }
        }

        if let Some(edge) = &router.wildcard {
            debug!(from = %self.type_name(), locator = %edge.locator, "Resolving through wildcard");
            return match path.split_once('/') {
                None => self.child(&edge.target, path).ok_or_else(no_such_service),
                Some((argument, rest)) => self
                    .child(&edge.target, argument)
                    .ok_or_else(no_such_service)?
                    .resolve(rest),
            };
        }

        debug!(from = %self.type_name(), path, "No locator matched");
        Err(no_such_service())
    }

    fn child(&self, target: &Name, segment: &str) -> Option<Self> {
        let index = self.plan.service_index(target)?;
        Some(Self::new(
            Arc::clone(&self.plan),
            index,
            Arc::clone(&self.connection),
            join_path(&self.path, segment),
        ))
    }
}

fn build_query(
    parameters: &[QueryParameter],
    options: &Options,
) -> Result<BTreeMap<String, String>, ArborError> {
    let mut query = BTreeMap::new();
    for parameter in parameters {
        if let Some(value) = options.get(&parameter.option)
            && let Some(text) = render_query_value(&parameter.option, parameter.kind, value)?
        {
            query.insert(parameter.tag.clone(), text);
        }
    }
    Ok(query)
}

impl fmt::Display for DynamicService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.path)
    }
}

impl fmt::Debug for DynamicService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicService")
            .field("type_name", &self.type_name())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::compile;
    use crate::test_utils::library_model;
    use arbor::mock::RecordingTransport;
    use arbor::{ListValue, Verb};
    use serde_json::json;

    fn root() -> (DynamicService, RecordingTransport) {
        let plan = Arc::new(compile(&library_model()).unwrap());
        let transport = RecordingTransport::new();
        let connection = Arc::new(Connection::new(transport.clone()));
        (DynamicService::root(plan, connection).unwrap(), transport)
    }

    fn sent_json(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn resolve_walks_literal_and_wildcard_edges() {
        let (root, _) = root();
        let book = root.resolve("books/17").unwrap();
        assert_eq!(book.type_name(), "BookService");
        assert_eq!(book.path(), "books/17");
    }

    #[test]
    fn locate_builds_child_paths() {
        let (root, _) = root();
        let books = root.locate("Books", None).unwrap();
        assert_eq!(books.path(), "books");
        let book = books.locate("book", Some("9")).unwrap();
        assert_eq!(book.path(), "books/9");
    }

    #[test]
    fn locate_requires_argument_for_parameterized_locator() {
        let (root, _) = root();
        let books = root.locate("books", None).unwrap();
        assert!(matches!(
            books.locate("book", None),
            Err(ArborError::MissingArgument { ref argument, .. }) if argument == "id"
        ));
    }

    #[test]
    fn unknown_locator_and_method() {
        let (root, _) = root();
        assert!(matches!(
            root.locate("shelves", None),
            Err(ArborError::UnknownLocator { .. })
        ));
        assert!(matches!(
            root.invoke("frobnicate", None, &Options::new()),
            Err(ArborError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn list_renders_query_and_reads_many() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200).with_body(r#"[{"title":"Dune"},{"title":"Emma"}]"#));

        let books = root.resolve("books").unwrap();
        let result = books
            .invoke("List", None, &Options::new().with("max", 10).with("search", "d"))
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.verb, Verb::Get);
        assert_eq!(request.path, "books");
        assert_eq!(request.query.get("max").map(String::as_str), Some("10"));
        assert_eq!(request.query.get("search").map(String::as_str), Some("d"));
        assert!(request.body.is_none());

        let list: &ListValue = result.as_list().unwrap();
        assert_eq!(list.element_type, "Book");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn add_coerces_mapping_argument() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(201).with_body(r#"{"id":"1","title":"Dune"}"#));

        let books = root.resolve("books").unwrap();
        let added = books
            .invoke("add", Some(Value::from(json!({"title": "Dune"}))), &Options::new())
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.verb, Verb::Post);
        assert_eq!(sent_json(&request), json!({"title": "Dune"}));
        assert_eq!(added.as_struct().unwrap().type_name, "Book");
    }

    #[test]
    fn add_without_argument_fails_before_sending() {
        let (root, transport) = root();
        let books = root.resolve("books").unwrap();
        assert!(matches!(
            books.invoke("add", None, &Options::new()),
            Err(ArborError::MissingArgument { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn update_puts_to_current_path() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200).with_body(r#"{"title":"Dune II"}"#));

        let book = root.resolve("books/3").unwrap();
        let book_value = StructValue::new("Book").field("title", "Dune II");
        book.invoke("Update", Some(book_value.into()), &Options::new().with("notify", false))
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.verb, Verb::Put);
        assert_eq!(request.path, "books/3");
        assert_eq!(request.query.get("notify").map(String::as_str), Some("false"));
    }

    #[test]
    fn action_posts_envelope_and_extracts_output() {
        let (root, transport) = root();
        transport.respond(
            HttpResponse::new(200).with_body(r#"{"status":"complete","loan":{"id":"L1"}}"#),
        );

        let book = root.resolve("books/3").unwrap();
        let loan = book
            .invoke(
                "CheckOut",
                None,
                &Options::new().with("member", Value::from(json!({"id": "m1"}))),
            )
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.verb, Verb::Post);
        assert_eq!(request.path, "books/3/checkout");
        assert_eq!(sent_json(&request), json!({"member": {"id": "m1"}}));
        assert_eq!(loan.as_struct().unwrap().type_name, "Loan");
    }

    #[test]
    fn action_without_output_returns_null() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200).with_body(r#"{"status":"complete"}"#));

        let book = root.resolve("books/3").unwrap();
        let result = book
            .invoke("return", None, &Options::new().with("condition", "good"))
            .unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn inherited_action_is_available_on_derived_service() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200).with_body(r#"{"job":{"id":"j"}}"#));

        let authors = root.resolve("authors").unwrap();
        authors
            .invoke("reindex", None, &Options::new().with("full", true))
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "authors/reindex");
        assert_eq!(sent_json(&request), json!({"full": true}));
    }

    #[test]
    fn header_and_query_overrides_are_sent() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200).with_body("[]"));

        let books = root.resolve("books").unwrap();
        books
            .invoke(
                "list",
                None,
                &Options::new()
                    .with("max", 5)
                    .query("max", "50")
                    .header("Correlation-Id", "abc"),
            )
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query.get("max").map(String::as_str), Some("50"));
        assert_eq!(
            request.headers.get("Correlation-Id").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn plan_with_out_of_range_root_is_rejected() {
        let mut plan = compile(&library_model()).unwrap();
        plan.root = plan.services.len();
        let json = serde_json::to_string(&plan).unwrap();
        let plan: ClientPlan = serde_json::from_str(&json).unwrap();

        let connection = Arc::new(Connection::new(RecordingTransport::new()));
        match DynamicService::root(Arc::new(plan), connection) {
            Err(ArborError::NoSuchService { path }) => assert_eq!(path, ""),
            Err(other) => panic!("Expected NoSuchService, got {other:?}"),
            Ok(service) => panic!("Expected an error, got {service:?}"),
        }
    }

    #[test]
    fn display_and_debug_expose_type_and_path() {
        let (root, _) = root();
        let book = root.resolve("books/5").unwrap();
        assert_eq!(book.to_string(), "BookService(books/5)");
        assert!(format!("{book:?}").contains("BookService"));
        assert_eq!(root.to_string(), "LibraryService()");
    }

    #[test]
    #[tracing_test::traced_test]
    fn invoke_emits_tracing_events() {
        let (root, transport) = root();
        transport.respond(HttpResponse::new(200));

        root.resolve("books/1")
            .unwrap()
            .invoke("remove", None, &Options::new())
            .unwrap();

        assert!(logs_contain("arbor_invoke"));
        assert!(logs_contain("Invoking operation"));
    }
}

//! Compilation of a model into a client plan.
//!
//! A [`ClientPlan`] is the fully resolved form of a model: services in
//! base-first order, each with its operations (strategy, verb, query and body
//! mapping, success codes), locator accessors and router edges. Both backends
//! consume it:
//!
//! - [`crate::dynamic`] interprets it against a live connection
//! - [`crate::codegen`] emits Rust source from it
//!
//! Derived services are flattened: a service starts with everything its base
//! compiled to and then adds or replaces members by name. Ordering guarantees
//! the base has been compiled first.

use std::collections::HashMap;

use arbor::{BodyShape, Verb};
use arbor_define::{Locator, Method, Model, ModelError, Name, Parameter, PrimitiveKind, Service};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{
    Strategy, action_output, classify, input_parameters, main_output, primary_parameter,
    secondary_parameters,
};
use crate::errors::GeneratorError;
use crate::naming::{
    accessor_for, identifier_for, service_type_name, tag_for, type_name_for, url_segment_for,
};
use crate::ordering::order_services;

/// The resolved client for a whole model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPlan {
    /// CamelCase model name.
    pub name: String,
    /// Index into `services` of the root service.
    pub root: usize,
    /// Services in base-first order.
    pub services: Vec<ServicePlan>,
}

impl ClientPlan {
    pub fn service(&self, name: &Name) -> Option<&ServicePlan> {
        self.services.iter().find(|s| &s.name == name)
    }

    pub fn service_index(&self, name: &Name) -> Option<usize> {
        self.services.iter().position(|s| &s.name == name)
    }

    /// The root service, or `None` when `root` is out of range, as in a
    /// hand-edited plan file.
    pub fn root_service(&self) -> Option<&ServicePlan> {
        self.services.get(self.root)
    }
}

/// One service of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePlan {
    pub name: Name,
    /// Generated struct name, e.g. `BooksService`.
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Sorted by name.
    pub operations: Vec<OperationPlan>,
    /// Sorted by name.
    pub locators: Vec<LocatorPlan>,
    pub router: RouterPlan,
}

impl ServicePlan {
    pub fn operation(&self, name: &Name) -> Option<&OperationPlan> {
        self.operations.iter().find(|o| &o.name == name)
    }

    pub fn locator(&self, name: &Name) -> Option<&LocatorPlan> {
        self.locators.iter().find(|l| &l.name == name)
    }
}

/// A method resolved to its HTTP mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    pub name: Name,
    /// Rust method name and snake-case identifier.
    pub ident: String,
    pub strategy: Strategy,
    pub verb: Verb,
    /// Segment appended to the service path, for custom actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_segment: Option<String>,
    pub success_codes: Vec<u16>,
    /// The body parameter of `Add` and `Update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<BodyParameter>,
    /// Options sent as query parameters, sorted by name.
    pub query: Vec<QueryParameter>,
    /// Options carried in the action envelope, in declared order.
    pub envelope: Vec<EnvelopeField>,
    pub response: ResponsePlan,
    /// The documentation, defaulted when the model has none.
    pub doc: String,
}

impl OperationPlan {
    /// Option keys accepted by the operation, besides `headers` and `query`.
    pub fn option_keys(&self) -> Vec<&str> {
        match self.strategy {
            Strategy::Action => self.envelope.iter().map(|f| f.option.as_str()).collect(),
            _ => self.query.iter().map(|q| q.option.as_str()).collect(),
        }
    }
}

/// The parameter sent as a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyParameter {
    pub ident: String,
    pub shape: BodyShape,
}

/// An option rendered into the query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Key looked up in the caller's options.
    pub option: String,
    /// Key written to the query string.
    pub tag: String,
    /// Declared kind, if primitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PrimitiveKind>,
}

/// An option carried as an action envelope field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeField {
    pub option: String,
    pub tag: String,
    /// Shape used to coerce a loosely-typed value; `None` for primitives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<BodyShape>,
}

/// What a successful response yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponsePlan {
    /// Nothing is read from the body.
    Empty,
    /// The body is read with the given shape.
    Body { shape: BodyShape },
    /// A field of the returned action envelope.
    ActionField {
        tag: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shape: Option<BodyShape>,
    },
}

/// An accessor returning a child service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorPlan {
    pub name: Name,
    /// Accessor method name, e.g. `books_service`.
    pub accessor: String,
    /// Path segment for parameterless locators.
    pub segment: String,
    /// Argument name for parameterized locators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    pub target: Name,
    pub target_type: String,
    pub doc: String,
}

impl LocatorPlan {
    pub fn is_parameterized(&self) -> bool {
        self.argument.is_some()
    }
}

/// Router edges of a service.
///
/// Literal edges are tried in name order; the wildcard edge, if any, takes
/// the next path segment as its argument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouterPlan {
    pub literals: Vec<RouteEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<RouteEdge>,
}

/// One router edge, referring to a locator of the same service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub locator: Name,
    pub segment: String,
    pub target: Name,
}

/// Compiles a model into a client plan.
///
/// The model is expected to have passed [`Model::validate`].
///
/// ## Errors
///
/// Returns `GeneratorError::UnresolvableBase` if services cannot be ordered,
/// `GeneratorError::UnknownService` if the root or a locator target is
/// missing, or `GeneratorError::Model` if a service ends up with more than one
/// parameterized locator once inherited locators are merged.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Locator, Method, Model, Parameter, Service, Type};
/// use arbor_gen::plan::compile;
///
/// let model = Model::new("Demo", "Root")
///     .service(Service::new("Root").locator(Locator::new("Items", "Items")))
///     .service(Service::new("Items").method(
///         Method::new("List").param(Parameter::output("items", Type::list(Type::structure("Item")))),
///     ));
///
/// let plan = compile(&model).unwrap();
/// let root = plan.root_service().unwrap();
/// assert_eq!(root.type_name, "RootService");
/// assert_eq!(root.router.literals[0].segment, "items");
/// ```
pub fn compile(model: &Model) -> Result<ClientPlan, GeneratorError> {
    info!(model = %model.name, services = model.services.len(), "Compiling client plan");

    let ordered = order_services(&model.services)?;
    let mut compiled: HashMap<&Name, ServicePlan> = HashMap::new();
    let mut services = Vec::with_capacity(ordered.len());

    for service in ordered {
        let base = match &service.base {
            Some(base) => Some(
                compiled
                    .get(base)
                    .ok_or_else(|| GeneratorError::UnknownService(base.to_string()))?,
            ),
            None => None,
        };
        let plan = compile_service(model, service, base)?;
        debug!(
            service = %plan.type_name,
            operations = plan.operations.len(),
            locators = plan.locators.len(),
            "Compiled service"
        );
        compiled.insert(&service.name, plan.clone());
        services.push(plan);
    }

    let root = services
        .iter()
        .position(|s| s.name == model.root)
        .ok_or_else(|| GeneratorError::UnknownService(model.root.to_string()))?;

    Ok(ClientPlan {
        name: type_name_for(&model.name),
        root,
        services,
    })
}

fn compile_service(
    model: &Model,
    service: &Service,
    base: Option<&ServicePlan>,
) -> Result<ServicePlan, GeneratorError> {
    let mut operations: Vec<OperationPlan> = base.map(|b| b.operations.clone()).unwrap_or_default();
    for method in &service.methods {
        let operation = compile_operation(method);
        operations.retain(|o| o.name != operation.name);
        operations.push(operation);
    }
    operations.sort_by(|a, b| a.name.cmp(&b.name));

    let mut locators: Vec<LocatorPlan> = base.map(|b| b.locators.clone()).unwrap_or_default();
    for locator in &service.locators {
        let plan = compile_locator(model, locator)?;
        locators.retain(|l| l.name != plan.name);
        locators.push(plan);
    }
    locators.sort_by(|a, b| a.name.cmp(&b.name));

    let parameterized: Vec<String> = locators
        .iter()
        .filter(|l| l.is_parameterized())
        .map(|l| l.name.to_string())
        .collect();
    if parameterized.len() > 1 {
        return Err(ModelError::MultipleParameterizedLocators {
            service: service.name.to_string(),
            locators: parameterized,
        }
        .into());
    }

    let router = build_router(&locators);

    Ok(ServicePlan {
        name: service.name.clone(),
        type_name: service_type_name(&service.name),
        base: service.base.clone(),
        doc: service.doc.clone(),
        operations,
        locators,
        router,
    })
}

/// Resolves the HTTP mapping of a single method.
pub fn compile_operation(method: &Method) -> OperationPlan {
    let strategy = classify(method);
    let ident = identifier_for(&method.name);

    let (verb, action_segment) = match strategy {
        Strategy::Add => (Verb::Post, None),
        Strategy::Get | Strategy::List => (Verb::Get, None),
        Strategy::Update => (Verb::Put, None),
        Strategy::Remove => (Verb::Delete, None),
        Strategy::Action => (Verb::Post, Some(url_segment_for(&method.name))),
    };

    let primary = match strategy {
        Strategy::Add | Strategy::Update => primary_parameter(method).and_then(|p| {
            BodyShape::for_type(&p.ty).map(|shape| BodyParameter {
                ident: identifier_for(&p.name),
                shape,
            })
        }),
        _ => None,
    };

    let query = match strategy {
        Strategy::Add | Strategy::Update => query_parameters(secondary_parameters(method)),
        Strategy::Get | Strategy::List | Strategy::Remove => {
            query_parameters(input_parameters(method))
        }
        Strategy::Action => Vec::new(),
    };

    let envelope = match strategy {
        Strategy::Action => method
            .parameters
            .iter()
            .map(|p| EnvelopeField {
                option: identifier_for(&p.name),
                tag: tag_for(&p.name),
                shape: BodyShape::for_type(&p.ty),
            })
            .collect(),
        _ => Vec::new(),
    };

    let response = match strategy {
        Strategy::Add | Strategy::Update => primary
            .as_ref()
            .map_or(ResponsePlan::Empty, |p| ResponsePlan::Body {
                shape: p.shape.clone(),
            }),
        Strategy::Get | Strategy::List => main_output(method)
            .and_then(|p| BodyShape::for_type(&p.ty))
            .map_or(ResponsePlan::Empty, |shape| ResponsePlan::Body { shape }),
        Strategy::Remove => ResponsePlan::Empty,
        Strategy::Action => {
            action_output(method).map_or(ResponsePlan::Empty, |p| ResponsePlan::ActionField {
                tag: tag_for(&p.name),
                shape: BodyShape::for_type(&p.ty),
            })
        }
    };

    let doc = method
        .doc
        .clone()
        .unwrap_or_else(|| default_method_doc(strategy, method));

    OperationPlan {
        name: method.name.clone(),
        ident,
        strategy,
        verb,
        action_segment,
        success_codes: strategy.success_codes().to_vec(),
        primary,
        query,
        envelope,
        response,
        doc,
    }
}

fn query_parameters(parameters: Vec<&Parameter>) -> Vec<QueryParameter> {
    parameters
        .into_iter()
        .map(|p| QueryParameter {
            option: identifier_for(&p.name),
            tag: tag_for(&p.name),
            kind: p.ty.primitive_kind(),
        })
        .collect()
}

fn default_method_doc(strategy: Strategy, method: &Method) -> String {
    let primary = || {
        primary_parameter(method)
            .map(|p| identifier_for(&p.name))
            .unwrap_or_else(|| "object".to_string())
    };
    match strategy {
        Strategy::Add => format!("Adds a new `{}`.", primary()),
        Strategy::Get | Strategy::List => {
            "Returns the representation of the object managed by this service.".to_string()
        }
        Strategy::Update => format!("Updates the `{}`.", primary()),
        Strategy::Remove => "Deletes the object managed by this service.".to_string(),
        Strategy::Action => format!("Executes the `{}` method.", identifier_for(&method.name)),
    }
}

fn compile_locator(model: &Model, locator: &Locator) -> Result<LocatorPlan, GeneratorError> {
    let target = model
        .find_service(&locator.service)
        .ok_or_else(|| GeneratorError::UnknownService(locator.service.to_string()))?;

    Ok(LocatorPlan {
        name: locator.name.clone(),
        accessor: accessor_for(&locator.name),
        segment: url_segment_for(&locator.name),
        argument: locator.parameter.as_ref().map(|p| identifier_for(&p.name)),
        target: target.name.clone(),
        target_type: service_type_name(&target.name),
        doc: locator
            .doc
            .clone()
            .unwrap_or_else(|| format!("Locates the `{}` service.", identifier_for(&locator.name))),
    })
}

fn build_router(locators: &[LocatorPlan]) -> RouterPlan {
    let edge = |l: &LocatorPlan| RouteEdge {
        locator: l.name.clone(),
        segment: l.segment.clone(),
        target: l.target.clone(),
    };

    RouterPlan {
        literals: locators
            .iter()
            .filter(|l| !l.is_parameterized())
            .map(edge)
            .collect(),
        wildcard: locators.iter().find(|l| l.is_parameterized()).map(edge),
    }
}

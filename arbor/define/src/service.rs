//! Services, methods, parameters and locators.
//!
//! A [`Service`] is a node of the resource tree. It owns [`Method`]s (the
//! operations it supports) and [`Locator`]s (named edges to child services,
//! optionally parameterized by a runtime argument such as an identifier).

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::types::Type;

/// A method parameter.
///
/// `is_in` and `is_out` are independent: a parameter may be input-only,
/// output-only, or both.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Parameter, Type};
///
/// let vm = Parameter::in_out("vm", Type::structure("Vm"));
/// assert!(vm.is_in && vm.is_out);
///
/// let force = Parameter::input("force", Type::boolean()).with_doc("Force the removal.");
/// assert!(force.is_in && !force.is_out);
/// assert_eq!(force.doc.as_deref(), Some("Force the removal."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(rename = "in", default)]
    pub is_in: bool,
    #[serde(rename = "out", default)]
    pub is_out: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Parameter {
    /// Creates an input-only parameter.
    pub fn input(name: impl Into<Name>, ty: Type) -> Self {
        Self::with_direction(name, ty, true, false)
    }

    /// Creates an output-only parameter.
    pub fn output(name: impl Into<Name>, ty: Type) -> Self {
        Self::with_direction(name, ty, false, true)
    }

    /// Creates a parameter used for both input and output.
    pub fn in_out(name: impl Into<Name>, ty: Type) -> Self {
        Self::with_direction(name, ty, true, true)
    }

    fn with_direction(name: impl Into<Name>, ty: Type, is_in: bool, is_out: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            is_in,
            is_out,
            doc: None,
        }
    }

    /// Adds documentation to the parameter.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// An operation on a service.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Method, Parameter, Type};
///
/// let add = Method::new("Add")
///     .param(Parameter::in_out("vm", Type::structure("Vm")))
///     .param(Parameter::input("clone", Type::boolean()))
///     .with_doc("Creates a new virtual machine.");
///
/// assert_eq!(add.parameters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: Name,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            doc: None,
        }
    }

    /// Appends a parameter, keeping declaration order.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A named edge from a service to a child service.
///
/// A locator takes at most one argument. Without one, its URL segment is the
/// locator name; with one, the runtime argument itself is the segment.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Locator, Parameter, Type};
///
/// let disks = Locator::new("Disks", "Disks");
/// assert!(disks.parameter.is_none());
///
/// let disk = Locator::new("Disk", "Disk").with_parameter(Parameter::input("id", Type::string()));
/// assert!(disk.is_parameterized());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Parameter>,
    /// Name of the service this locator resolves to.
    pub service: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Locator {
    pub fn new(name: impl Into<Name>, service: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            parameter: None,
            service: service.into(),
            doc: None,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn is_parameterized(&self) -> bool {
        self.parameter.is_some()
    }
}

/// A node of the resource tree.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Locator, Method, Parameter, Service, Type};
///
/// let vms = Service::new("Vms")
///     .method(Method::new("List").param(Parameter::output("vms", Type::list(Type::structure("Vm")))))
///     .locator(Locator::new("Vm", "Vm").with_parameter(Parameter::input("id", Type::string())));
///
/// assert_eq!(vms.methods.len(), 1);
/// assert!(vms.parameterized_locator().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Name>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub locators: Vec<Locator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            base: None,
            methods: Vec::new(),
            locators: Vec::new(),
            doc: None,
        }
    }

    /// Declares the base service this one extends.
    pub fn extends(mut self, base: impl Into<Name>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn locator(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns the parameterless locators, in declaration order.
    pub fn literal_locators(&self) -> impl Iterator<Item = &Locator> {
        self.locators.iter().filter(|l| !l.is_parameterized())
    }

    /// Returns the first parameterized locator, if any.
    pub fn parameterized_locator(&self) -> Option<&Locator> {
        self.locators.iter().find(|l| l.is_parameterized())
    }
}

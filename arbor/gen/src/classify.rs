//! Method and parameter classification.
//!
//! Each method is assigned one [`Strategy`] by comparing its structural name
//! against the reserved names `Add`, `Get`, `List`, `Update` and `Remove`.
//! Anything else is a custom action. The strategy is computed once, during
//! planning, and carried on the operation from then on.

use arbor_define::{Method, Name, Parameter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// How a method maps onto HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    /// POST the primary parameter to the collection.
    Add,
    /// GET the current resource.
    Get,
    /// GET the current collection.
    List,
    /// PUT the primary parameter to the current resource.
    Update,
    /// DELETE the current resource.
    Remove,
    /// POST an action envelope to `{path}/{action}`.
    Action,
}

impl Strategy {
    /// Status codes treated as success.
    pub fn success_codes(self) -> &'static [u16] {
        match self {
            Self::Add => &[200, 201, 202],
            _ => &[200],
        }
    }

    /// Returns `true` for strategies that send the primary parameter as the body.
    pub fn sends_primary(self) -> bool {
        matches!(self, Self::Add | Self::Update)
    }
}

/// Classifies a method by its structural name.
///
/// ## Examples
///
/// ```
/// use arbor_define::Method;
/// use arbor_gen::classify::{classify, Strategy};
///
/// assert_eq!(classify(&Method::new("add")), Strategy::Add);
/// assert_eq!(classify(&Method::new("LIST")), Strategy::List);
/// assert_eq!(classify(&Method::new("AddNic")), Strategy::Action);
/// ```
pub fn classify(method: &Method) -> Strategy {
    classify_name(&method.name)
}

pub fn classify_name(name: &Name) -> Strategy {
    match name.words() {
        [word] => match word.as_str() {
            "add" => Strategy::Add,
            "get" => Strategy::Get,
            "list" => Strategy::List,
            "update" => Strategy::Update,
            "remove" => Strategy::Remove,
            _ => Strategy::Action,
        },
        _ => Strategy::Action,
    }
}

/// The first parameter, in declared order, that is both input and output and
/// is not primitive.
pub fn primary_parameter(method: &Method) -> Option<&Parameter> {
    method
        .parameters
        .iter()
        .find(|p| p.is_in && p.is_out && !p.ty.is_primitive())
}

/// Input-only primitive parameters, sorted by name.
pub fn secondary_parameters(method: &Method) -> Vec<&Parameter> {
    sorted_by_name(
        method
            .parameters
            .iter()
            .filter(|p| p.is_in && !p.is_out && p.ty.is_primitive()),
    )
}

/// Every input parameter, sorted by name.
pub fn input_parameters(method: &Method) -> Vec<&Parameter> {
    sorted_by_name(method.parameters.iter().filter(|p| p.is_in))
}

/// The response parameter of `Get` and `List`: the first output parameter in
/// name order.
pub fn main_output(method: &Method) -> Option<&Parameter> {
    sorted_by_name(method.parameters.iter().filter(|p| p.is_out))
        .into_iter()
        .next()
}

/// The response parameter of a custom action: the first output parameter in
/// declared order.
pub fn action_output(method: &Method) -> Option<&Parameter> {
    method.parameters.iter().find(|p| p.is_out)
}

fn sorted_by_name<'a>(parameters: impl Iterator<Item = &'a Parameter>) -> Vec<&'a Parameter> {
    let mut parameters: Vec<&Parameter> = parameters.collect();
    parameters.sort_by(|a, b| a.name.cmp(&b.name));
    parameters
}

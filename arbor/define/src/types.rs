//! Type references used by parameters.
//!
//! - [`PrimitiveKind`] - scalar kinds with their own literal rendering rules
//! - [`Type`] - primitive, struct or list type of a parameter

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::name::Name;

/// Scalar kinds known to the model.
///
/// Each kind has its own textual rendering when used as a query value.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use arbor_define::PrimitiveKind;
///
/// assert_eq!(PrimitiveKind::from_str("boolean").unwrap(), PrimitiveKind::Boolean);
/// assert_eq!(PrimitiveKind::Date.to_string(), "date");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    /// `true` / `false`
    Boolean,
    /// Whole numbers
    Integer,
    /// Decimal numbers
    Decimal,
    /// Timestamps
    Date,
    /// Free text
    String,
}

/// The type of a parameter.
///
/// Struct types are referenced by name; their layout belongs to the codec.
/// Serialized with a `kind` tag and an `of` payload, so nested types stay
/// plain maps in both JSON and YAML: `{kind: list, of: {kind: struct, of: Vm}}`.
///
/// ## Examples
///
/// ```
/// use arbor_define::{Type, PrimitiveKind};
///
/// let vms = Type::list(Type::structure("Vm"));
/// assert!(vms.is_list());
/// assert_eq!(vms.element_type().unwrap(), &Type::structure("Vm"));
///
/// assert!(Type::Primitive(PrimitiveKind::Boolean).is_primitive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum Type {
    /// A scalar value.
    Primitive(PrimitiveKind),
    /// A named structured type.
    Struct(Name),
    /// A homogeneous list.
    List(Box<Type>),
}

impl Type {
    /// Creates a struct type reference.
    pub fn structure(name: impl Into<Name>) -> Self {
        Type::Struct(name.into())
    }

    /// Creates a list of the given element type.
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    /// Shorthand for `Type::Primitive(PrimitiveKind::Boolean)`.
    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveKind::Boolean)
    }

    /// Shorthand for `Type::Primitive(PrimitiveKind::Integer)`.
    pub fn integer() -> Self {
        Type::Primitive(PrimitiveKind::Integer)
    }

    /// Shorthand for `Type::Primitive(PrimitiveKind::Decimal)`.
    pub fn decimal() -> Self {
        Type::Primitive(PrimitiveKind::Decimal)
    }

    /// Shorthand for `Type::Primitive(PrimitiveKind::Date)`.
    pub fn date() -> Self {
        Type::Primitive(PrimitiveKind::Date)
    }

    /// Shorthand for `Type::Primitive(PrimitiveKind::String)`.
    pub fn string() -> Self {
        Type::Primitive(PrimitiveKind::String)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    /// Returns the primitive kind, if this is a primitive type.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Type::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the element type of a list.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::List(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the name of a struct type.
    pub fn struct_name(&self) -> Option<&Name> {
        match self {
            Type::Struct(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn primitive_kinds_round_trip_through_strum() {
        for kind in PrimitiveKind::iter() {
            let text = kind.to_string();
            assert_eq!(text.parse::<PrimitiveKind>().unwrap(), kind);
        }
    }

    #[test]
    fn type_serde_shape() {
        let ty = Type::list(Type::structure("Disk"));
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, r#"{"kind":"list","of":{"kind":"struct","of":"Disk"}}"#);

        let parsed: Type = serde_json::from_str(r#"{"kind":"primitive","of":"integer"}"#).unwrap();
        assert_eq!(parsed, Type::integer());
    }

    #[test]
    fn nested_types_round_trip_through_yaml() {
        let ty = Type::list(Type::list(Type::structure("Disk")));
        let yaml = serde_yaml::to_string(&ty).unwrap();
        let parsed: Type = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, ty);

        let written: Type = serde_yaml::from_str("{kind: list, of: {kind: struct, of: Item}}").unwrap();
        assert_eq!(written, Type::list(Type::structure("Item")));
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Type::date().primitive_kind(), Some(PrimitiveKind::Date));
        assert_eq!(Type::structure("Vm").primitive_kind(), None);
        assert_eq!(Type::structure("Vm").struct_name(), Some(&Name::parse("Vm")));
        assert!(Type::string().element_type().is_none());
    }
}

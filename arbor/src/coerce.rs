//! Best-effort upgrade of loosely-typed arguments.
//!
//! Exactly two shapes are upgraded:
//!
//! - a bare mapping supplied where a struct is expected becomes that struct
//! - a bare sequence supplied where a list is expected becomes a typed list,
//!   with each bare mapping element becoming an instance of the element type
//!
//! Every other value passes through unchanged. Nothing is rejected here; the
//! codec decides whether the result can be written.

use arbor_define::Type;
use tracing::trace;

use crate::value::{ListValue, StructValue, Value};

/// Upgrades a bare mapping to an instance of `type_name`.
///
/// ## Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use arbor::{coerce_struct, Value};
///
/// let mut fields = BTreeMap::new();
/// fields.insert("title".to_string(), Value::from("Dune"));
///
/// let book = coerce_struct(Value::Mapping(fields), "Book");
/// assert_eq!(book.as_struct().unwrap().type_name, "Book");
///
/// // Anything else is returned as-is
/// assert_eq!(coerce_struct(Value::from(3), "Book"), Value::from(3));
/// ```
pub fn coerce_struct(value: Value, type_name: &str) -> Value {
    match value {
        Value::Mapping(fields) => {
            trace!(type_name, "Upgrading mapping to struct");
            Value::Struct(StructValue {
                type_name: type_name.to_string(),
                fields,
            })
        }
        other => other,
    }
}

/// Upgrades a bare sequence to a list of `element_type`.
///
/// ## Examples
///
/// ```
/// use arbor::{coerce_list, Value};
///
/// let raw = Value::from(serde_json::json!([{"title": "Dune"}, {"title": "Emma"}]));
/// let books = coerce_list(raw, "Book");
///
/// let list = books.as_list().unwrap();
/// assert_eq!(list.len(), 2);
/// assert!(list.items.iter().all(|item| item.is_struct()));
/// ```
pub fn coerce_list(value: Value, element_type: &str) -> Value {
    match value {
        Value::Sequence(items) => {
            trace!(element_type, count = items.len(), "Upgrading sequence to list");
            Value::List(ListValue {
                element_type: element_type.to_string(),
                items: items
                    .into_iter()
                    .map(|item| coerce_struct(item, element_type))
                    .collect(),
            })
        }
        other => other,
    }
}

/// Applies the upgrade matching a model type.
///
/// Struct types use [`coerce_struct`]; lists of structs use [`coerce_list`].
/// Primitive types and lists of primitives are left untouched.
pub fn coerce(value: Value, ty: &Type) -> Value {
    match ty {
        Type::Struct(name) => coerce_struct(value, &name.to_string()),
        Type::List(element) => match element.struct_name() {
            Some(name) => coerce_list(value, &name.to_string()),
            None => value,
        },
        Type::Primitive(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_struct_is_untouched() {
        let book = Value::from(StructValue::new("Book").field("title", "Dune"));
        assert_eq!(coerce_struct(book.clone(), "Other"), book);
    }

    #[test]
    fn sequence_elements_that_are_not_mappings_pass_through() {
        let raw = Value::from(json!([{"id": 1}, "loose", 3]));
        let list = coerce_list(raw, "Item");
        let items = &list.as_list().unwrap().items;
        assert!(items[0].is_struct());
        assert_eq!(items[1], Value::from("loose"));
        assert_eq!(items[2], Value::Integer(3));
    }

    #[test]
    fn mapping_where_list_expected_is_untouched() {
        let raw = Value::from(json!({"id": 1}));
        assert!(matches!(coerce_list(raw, "Item"), Value::Mapping(_)));
    }

    #[test]
    fn coerce_follows_model_type() {
        let raw = Value::from(json!({"id": 1}));
        let upgraded = coerce(raw.clone(), &Type::structure("disk_attachment"));
        assert_eq!(upgraded.as_struct().unwrap().type_name, "DiskAttachment");

        assert_eq!(coerce(raw.clone(), &Type::string()), raw);
        assert_eq!(
            coerce(Value::from(json!([1, 2])), &Type::list(Type::integer())),
            Value::from(json!([1, 2]))
        );
    }
}

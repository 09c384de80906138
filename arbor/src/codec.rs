//! Body serialization.
//!
//! A [`Codec`] turns values into request bodies and response bodies back into
//! values. Structs use the "one" entry points and lists the "many" entry
//! points. [`BodyShape`] picks between them from a model type.

use arbor_define::Type;
use serde::{Deserialize, Serialize};

use crate::coerce::{coerce_list, coerce_struct};
use crate::error::CodecError;
use crate::value::{ListValue, StructValue, Value};

/// Reader/writer for structured bodies.
///
/// Buffers are owned by the caller and dropped on every exit path, so a
/// failed write or read never leaks a partially built body.
pub trait Codec: Send + Sync {
    /// MIME type sent with request bodies.
    fn content_type(&self) -> &str;

    /// Writes a single instance of `type_name`.
    fn write_one(&self, type_name: &str, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Writes a collection of `element_type` instances.
    fn write_many(&self, element_type: &str, values: &[Value]) -> Result<Vec<u8>, CodecError>;

    /// Reads a single instance of `type_name`.
    fn read_one(&self, type_name: &str, bytes: &[u8]) -> Result<Value, CodecError>;

    /// Reads a collection of `element_type` instances.
    fn read_many(&self, element_type: &str, bytes: &[u8]) -> Result<Vec<Value>, CodecError>;
}

/// JSON codec backed by `serde_json`.
///
/// ## Examples
///
/// ```
/// use arbor::{Codec, JsonCodec, StructValue, Value};
///
/// let codec = JsonCodec;
/// let book = Value::from(StructValue::new("Book").field("title", "Dune"));
///
/// let bytes = codec.write_one("Book", &book).unwrap();
/// assert_eq!(bytes, br#"{"title":"Dune"}"#);
///
/// let read = codec.read_one("Book", &bytes).unwrap();
/// assert_eq!(read, book);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    fn into_struct(type_name: &str, json: serde_json::Value) -> Result<Value, CodecError> {
        match Value::from(json) {
            Value::Mapping(fields) => Ok(Value::Struct(StructValue {
                type_name: type_name.to_string(),
                fields,
            })),
            other => Err(CodecError::UnexpectedShape {
                type_name: type_name.to_string(),
                expected: "an object".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }
}

impl Codec for JsonCodec {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn write_one(&self, type_name: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
        match value {
            Value::Struct(_) | Value::Mapping(_) => Ok(serde_json::to_vec(&value.to_json())?),
            other => Err(CodecError::UnexpectedShape {
                type_name: type_name.to_string(),
                expected: "a struct".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn write_many(&self, _element_type: &str, values: &[Value]) -> Result<Vec<u8>, CodecError> {
        let array = serde_json::Value::Array(values.iter().map(Value::to_json).collect());
        Ok(serde_json::to_vec(&array)?)
    }

    fn read_one(&self, type_name: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::into_struct(type_name, json)
    }

    fn read_many(&self, element_type: &str, bytes: &[u8]) -> Result<Vec<Value>, CodecError> {
        match serde_json::from_slice(bytes)? {
            serde_json::Value::Array(items) => Ok(items
                .into_iter()
                .map(|item| coerce_struct(Value::from(item), element_type))
                .collect()),
            other => Err(CodecError::UnexpectedShape {
                type_name: element_type.to_string(),
                expected: "an array".to_string(),
                found: Value::from(other).kind_name().to_string(),
            }),
        }
    }
}

/// Whether a body holds one instance or a collection, and of which type.
///
/// ## Examples
///
/// ```
/// use arbor::BodyShape;
/// use arbor_define::Type;
///
/// assert_eq!(BodyShape::for_type(&Type::structure("Book")), Some(BodyShape::One("Book".into())));
/// assert_eq!(
///     BodyShape::for_type(&Type::list(Type::structure("Book"))),
///     Some(BodyShape::Many("Book".into()))
/// );
/// assert_eq!(BodyShape::for_type(&Type::boolean()), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "type", rename_all = "lowercase")]
pub enum BodyShape {
    One(String),
    Many(String),
}

impl BodyShape {
    /// Returns the shape for a model type; primitives have none.
    pub fn for_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::Primitive(_) => None,
            Type::Struct(name) => Some(Self::One(name.to_string())),
            Type::List(element) => Some(Self::Many(type_name(element))),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::One(name) | Self::Many(name) => name,
        }
    }

    /// Applies the matching literal coercion.
    pub fn coerce(&self, value: Value) -> Value {
        match self {
            Self::One(name) => coerce_struct(value, name),
            Self::Many(name) => coerce_list(value, name),
        }
    }

    /// Writes `value` with the matching codec entry point.
    ///
    /// ## Errors
    ///
    /// Returns `CodecError::UnexpectedShape` when a collection body is given
    /// something other than a list or sequence, or any error from the codec.
    pub fn write(&self, codec: &dyn Codec, value: &Value) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::One(name) => codec.write_one(name, value),
            Self::Many(name) => match value {
                Value::List(list) => codec.write_many(name, &list.items),
                Value::Sequence(items) => codec.write_many(name, items),
                other => Err(CodecError::UnexpectedShape {
                    type_name: name.clone(),
                    expected: "a list".to_string(),
                    found: other.kind_name().to_string(),
                }),
            },
        }
    }

    /// Reads a body with the matching codec entry point.
    pub fn read(&self, codec: &dyn Codec, bytes: &[u8]) -> Result<Value, CodecError> {
        match self {
            Self::One(name) => codec.read_one(name, bytes),
            Self::Many(name) => Ok(Value::List(ListValue::new(
                name.clone(),
                codec.read_many(name, bytes)?,
            ))),
        }
    }
}

fn type_name(ty: &Type) -> String {
    match ty {
        Type::Primitive(kind) => kind.to_string(),
        Type::Struct(name) => name.to_string(),
        Type::List(element) => format!("List<{}>", type_name(element)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_many_builds_typed_elements() {
        let values = JsonCodec
            .read_many("Book", br#"[{"title":"Dune"},{"title":"Emma"}]"#)
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].as_struct().unwrap().type_name, "Book");
    }

    #[test]
    fn read_one_rejects_arrays() {
        let err = JsonCodec.read_one("Book", b"[]").unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedShape { ref found, .. } if found == "sequence"));
    }

    #[test]
    fn read_one_rejects_malformed_json() {
        assert!(matches!(
            JsonCodec.read_one("Book", b"{not json"),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn write_one_rejects_primitives() {
        assert!(JsonCodec.write_one("Book", &Value::from(1)).is_err());
    }

    #[test]
    fn many_shape_round_trips_through_codec() {
        let shape = BodyShape::for_type(&Type::list(Type::structure("Book"))).unwrap();
        let raw = Value::from(serde_json::json!([{"title": "Dune"}]));
        let typed = shape.coerce(raw);
        let bytes = shape.write(&JsonCodec, &typed).unwrap();
        assert_eq!(shape.read(&JsonCodec, &bytes).unwrap(), typed);
    }

    #[test]
    fn many_shape_rejects_single_struct() {
        let shape = BodyShape::Many("Book".to_string());
        let err = shape
            .write(&JsonCodec, &Value::from(StructValue::new("Book")))
            .unwrap_err();
        assert!(err.to_string().contains("a list"));
    }

    #[test]
    fn list_of_primitives_uses_kind_name() {
        assert_eq!(
            BodyShape::for_type(&Type::list(Type::string())),
            Some(BodyShape::Many("string".to_string()))
        );
    }
}

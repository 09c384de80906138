//! Runtime values passed to and returned from service operations.
//!
//! [`Value`] has two structural forms for each container:
//!
//! - typed: [`StructValue`] and [`ListValue`] carry the model type they belong to
//! - loose: `Mapping` and `Sequence` are plain key/value maps and arrays, the
//!   form callers write by hand and the form decoded JSON takes before coercion

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// An instance of a named struct type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    pub type_name: String,
    pub fields: BTreeMap<String, Value>,
}

impl StructValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field, replacing any previous value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A list whose elements are instances of one struct type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListValue {
    pub element_type: String,
    pub items: Vec<Value>,
}

impl ListValue {
    pub fn new(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            element_type: element_type.into(),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A value exchanged with a service.
///
/// ## Examples
///
/// ```
/// use arbor::{StructValue, Value};
///
/// let book = Value::from(StructValue::new("Book").field("title", "Dune").field("pages", 412));
/// assert!(book.is_struct());
/// assert_eq!(book.as_struct().unwrap().get("pages"), Some(&Value::Integer(412)));
///
/// let loose = Value::from(serde_json::json!({"title": "Dune"}));
/// assert!(matches!(loose, Value::Mapping(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Date(DateTime<FixedOffset>),
    String(String),
    Struct(StructValue),
    List(ListValue),
    Mapping(BTreeMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for primitive values (booleans, numbers, dates, strings).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Boolean(_) | Self::Integer(_) | Self::Decimal(_) | Self::Date(_) | Self::String(_)
        )
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the elements of a typed list or a bare sequence.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(&l.items),
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Short description of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Date(_) => "date",
            Self::String(_) => "string",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }

    /// Converts to a JSON document.
    ///
    /// Dates become RFC 3339 strings; non-finite decimals become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Null => Json::Null,
            Self::Boolean(b) => Json::Bool(*b),
            Self::Integer(i) => Json::from(*i),
            Self::Decimal(d) => serde_json::Number::from_f64(*d).map_or(Json::Null, Json::Number),
            Self::Date(d) => Json::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            Self::String(s) => Json::String(s.clone()),
            Self::Struct(s) => fields_to_json(&s.fields),
            Self::Mapping(m) => fields_to_json(m),
            Self::List(l) => Json::Array(l.items.iter().map(Value::to_json).collect()),
            Self::Sequence(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

fn fields_to_json(fields: &BTreeMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Boolean(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Null, Self::Decimal),
            },
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::Sequence(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Date(value)
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Self::Struct(value)
    }
}

impl From<ListValue> for Value {
    fn from(value: ListValue) -> Self {
        Self::List(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Sequence(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Mapping(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_split_into_integer_and_decimal() {
        assert_eq!(Value::from(json!(7)), Value::Integer(7));
        assert_eq!(Value::from(json!(2.5)), Value::Decimal(2.5));
    }

    #[test]
    fn json_containers_become_loose_forms() {
        let value = Value::from(json!({"tags": ["a", "b"], "count": 2}));
        let Value::Mapping(map) = value else {
            panic!("Expected a mapping");
        };
        assert_eq!(
            map.get("tags"),
            Some(&Value::Sequence(vec!["a".into(), "b".into()]))
        );
        assert_eq!(map.get("count"), Some(&Value::Integer(2)));
    }

    #[test]
    fn struct_serializes_as_object() {
        let value = Value::from(StructValue::new("Book").field("title", "Dune").field("pages", 412));
        assert_eq!(value.to_json(), json!({"title": "Dune", "pages": 412}));
    }

    #[test]
    fn date_serializes_as_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(Value::from(date).to_json(), json!("2024-03-01T10:30:00+02:00"));
    }

    #[test]
    fn non_finite_decimal_serializes_as_null() {
        assert_eq!(Value::Decimal(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Sequence(vec![]).kind_name(), "sequence");
        assert!(Value::from("x").is_primitive());
        assert!(!Value::Mapping(BTreeMap::new()).is_primitive());
    }
}

//! Query literal rendering.

use arbor_define::PrimitiveKind;
use chrono::{DateTime, SecondsFormat};

use crate::error::ArborError;
use crate::value::Value;

/// Renders an option value as a query string literal for a parameter of the
/// declared `kind`.
///
/// - booleans render as `true` / `false`
/// - integers render as decimal digits
/// - decimals render as the shortest text that reads back to the same number
/// - dates render as RFC 3339
/// - strings pass through unchanged
///
/// The value must fit the declared kind. An integer is accepted for a
/// decimal parameter, and a string is accepted when it parses as the kind.
/// With no declared kind the value is rendered by its own kind.
///
/// `Null` is treated as an absent option and yields `None`.
///
/// ## Errors
///
/// Returns `ArborError::InvalidOption` when the value does not fit the
/// declared kind, and for structured values, which have no query form.
///
/// ## Examples
///
/// ```
/// use arbor::{render_query_value, PrimitiveKind, Value};
///
/// let flag = Some(PrimitiveKind::Boolean);
/// assert_eq!(render_query_value("flag", flag, &Value::from(true)).unwrap().as_deref(), Some("true"));
/// assert_eq!(render_query_value("flag", flag, &Value::Null).unwrap(), None);
/// assert!(render_query_value("flag", flag, &Value::from("maybe")).is_err());
///
/// let ratio = Some(PrimitiveKind::Decimal);
/// assert_eq!(render_query_value("ratio", ratio, &Value::from(2)).unwrap().as_deref(), Some("2"));
/// assert_eq!(render_query_value("ratio", ratio, &Value::from(0.25)).unwrap().as_deref(), Some("0.25"));
/// ```
pub fn render_query_value(
    name: &str,
    kind: Option<PrimitiveKind>,
    value: &Value,
) -> Result<Option<String>, ArborError> {
    if value.is_null() {
        return Ok(None);
    }
    if !value.is_primitive() {
        return Err(invalid(
            name,
            format!("a {} value cannot be sent as a query parameter", value.kind_name()),
        ));
    }

    let kind = match kind.or_else(|| own_kind(value)) {
        Some(kind) => kind,
        None => return Err(invalid(name, "value has no query form".to_string())),
    };

    let text = match (kind, value) {
        (PrimitiveKind::Boolean, Value::Boolean(b)) => b.to_string(),
        (PrimitiveKind::Boolean, Value::String(s)) => s
            .parse::<bool>()
            .map_err(|_| mismatch(name, kind, value))?
            .to_string(),

        (PrimitiveKind::Integer, Value::Integer(i)) => i.to_string(),
        (PrimitiveKind::Integer, Value::String(s)) => s
            .parse::<i64>()
            .map_err(|_| mismatch(name, kind, value))?
            .to_string(),

        (PrimitiveKind::Decimal, Value::Decimal(d)) => d.to_string(),
        (PrimitiveKind::Decimal, Value::Integer(i)) => i.to_string(),
        (PrimitiveKind::Decimal, Value::String(s)) => s
            .parse::<f64>()
            .map_err(|_| mismatch(name, kind, value))?
            .to_string(),

        (PrimitiveKind::Date, Value::Date(d)) => d.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        (PrimitiveKind::Date, Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map_err(|_| mismatch(name, kind, value))?
            .to_rfc3339_opts(SecondsFormat::AutoSi, false),

        (PrimitiveKind::String, Value::String(s)) => s.clone(),

        _ => return Err(mismatch(name, kind, value)),
    };
    Ok(Some(text))
}

fn own_kind(value: &Value) -> Option<PrimitiveKind> {
    match value {
        Value::Boolean(_) => Some(PrimitiveKind::Boolean),
        Value::Integer(_) => Some(PrimitiveKind::Integer),
        Value::Decimal(_) => Some(PrimitiveKind::Decimal),
        Value::Date(_) => Some(PrimitiveKind::Date),
        Value::String(_) => Some(PrimitiveKind::String),
        _ => None,
    }
}

fn mismatch(name: &str, kind: PrimitiveKind, value: &Value) -> ArborError {
    invalid(name, format!("expected a {} value, got a {}", kind, value.kind_name()))
}

fn invalid(name: &str, message: String) -> ArborError {
    ArborError::InvalidOption {
        name: name.to_string(),
        message,
    }
}

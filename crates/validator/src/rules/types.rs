//! Shape rules: `string`, `numeric`, `integer`, `boolean`, `array`.

use serde_json::Value;

use super::{builtin, number};
use crate::registry::{RuleDefinition, RuleTarget};

pub(super) fn definitions() -> Vec<RuleDefinition> {
    vec![
        builtin("string", "The :attribute must be a string.", string),
        builtin("numeric", "The :attribute must be a number.", numeric),
        builtin("integer", "The :attribute must be an integer.", integer),
        builtin("boolean", "The :attribute field must be true or false.", boolean),
        builtin("array", "The :attribute must be an array.", array),
    ]
}

/// A JSON string.
pub fn string(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    value.is_string()
}

/// A number, or a string holding a finite number.
pub fn numeric(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    number(value).is_some()
}

/// A whole number, or a string holding one.
pub fn integer(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

/// `true`/`false`, `0`/`1`, or their string forms.
pub fn boolean(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_u64(), Some(0 | 1)),
        Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
        _ => false,
    }
}

/// A JSON array.
pub fn array(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    value.is_array()
}

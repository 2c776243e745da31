//! Presence rules: `required`, `present`, `accepted`.

use serde_json::Value;

use super::builtin;
use crate::registry::{RuleDefinition, RuleTarget};

pub(super) fn definitions() -> Vec<RuleDefinition> {
    vec![
        builtin("required", "The :attribute field is required.", required),
        builtin(
            "present",
            "The :attribute field must be present (but can be empty).",
            present,
        ),
        builtin("accepted", "The :attribute must be accepted.", accepted),
    ]
}

/// Not null, not a blank string, not an empty array.
pub fn required(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// The key exists in the input, whatever its value.
pub fn present(_: &Value, _: &[String], target: &RuleTarget<'_>) -> bool {
    target.lookup(target.attribute()).is_some()
}

/// Checkbox-style acceptance.
pub fn accepted(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => matches!(s.as_str(), "yes" | "on" | "1" | "true"),
        _ => false,
    }
}

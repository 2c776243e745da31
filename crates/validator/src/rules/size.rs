//! Size rules: `min`, `max`, `between`, `size`.
//!
//! Numbers are measured by value, strings by character count, arrays and
//! objects by length. Anything else has no size and fails.

use serde_json::Value;

use super::{builtin, parameter};
use crate::registry::{RuleDefinition, RuleTarget};

pub(super) fn definitions() -> Vec<RuleDefinition> {
    vec![
        builtin("min", "The :attribute must be at least :min.", min).with_placeholders(["min"]),
        builtin("max", "The :attribute may not be greater than :max.", max)
            .with_placeholders(["max"]),
        builtin(
            "between",
            "The :attribute field must be between :min and :max.",
            between,
        )
        .with_placeholders(["min", "max"]),
        builtin("size", "The :attribute must be :size.", size).with_placeholders(["size"]),
    ]
}

/// Size of a value under the rules above.
#[must_use]
pub fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(members) => Some(members.len() as f64),
        _ => None,
    }
}

/// `min:N`
pub fn min(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    compare::<1>(value, parameters, |size, [bound]| size >= bound)
}

/// `max:N`
pub fn max(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    compare::<1>(value, parameters, |size, [bound]| size <= bound)
}

/// `between:MIN,MAX`, inclusive.
pub fn between(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    compare::<2>(value, parameters, |size, [lo, hi]| lo <= size && size <= hi)
}

/// `size:N`
pub fn size(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    compare::<1>(value, parameters, |size, [exact]| size == exact)
}

fn compare<const N: usize>(
    value: &Value,
    parameters: &[String],
    check: impl Fn(f64, [f64; N]) -> bool,
) -> bool {
    let mut bounds = [0.0; N];
    for (index, bound) in bounds.iter_mut().enumerate() {
        match parameter(parameters, index) {
            Some(parsed) => *bound = parsed,
            None => return false,
        }
    }
    size_of(value).is_some_and(|size| check(size, bounds))
}

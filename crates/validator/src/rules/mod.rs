//! Built-in rule pack.
//!
//! Every built-in is a plain predicate registered through the same
//! [`Registry::register_definition`] call a host application would use, so
//! any of them can be overridden or left out. Parameters arrive as strings;
//! each predicate coerces its own and fails the rule when they do not parse.
//!
//! | rule | parameters | passes when |
//! |---|---|---|
//! | `required` | | value is not null, blank or an empty array |
//! | `present` | | key exists in the input |
//! | `accepted` | | `true`, `1`, `"yes"`, `"on"`, `"1"`, `"true"` |
//! | `string`, `numeric`, `integer`, `boolean`, `array` | | value has that shape |
//! | `min`, `max`, `between`, `size` | numbers | size is within bounds |
//! | `email`, `alpha`, `alpha_num`, `alpha_dash`, `regex` | pattern | string format matches |
//! | `in`, `not_in` | values | value is (not) listed |
//! | `same`, `different`, `confirmed` | other key | compares with another attribute |

use std::borrow::Cow;

use serde_json::Value;

use crate::registry::{Registry, RuleDefinition, RuleTarget};

pub mod compare;
pub mod format;
pub mod presence;
pub mod size;
pub mod types;

/// Registers every built-in rule into `registry`.
pub fn register_builtins(registry: &mut Registry) {
    let definitions = presence::definitions()
        .into_iter()
        .chain(types::definitions())
        .chain(size::definitions())
        .chain(format::definitions())
        .chain(compare::definitions());

    for definition in definitions {
        registry.insert(definition);
    }
}

/// Shorthand for a built-in with a default message.
pub(crate) fn builtin(
    name: &str,
    message: &str,
    f: fn(&Value, &[String], &RuleTarget<'_>) -> bool,
) -> RuleDefinition {
    RuleDefinition::new(name, f).with_message(message)
}

// ============================================================================
// COERCION HELPERS
// ============================================================================

/// Text form of a scalar: strings as-is, numbers and booleans rendered.
pub(crate) fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => None,
    }
}

/// Numeric form of a number or a numeric string.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Parses parameter `index` as a number.
pub(crate) fn parameter(parameters: &[String], index: usize) -> Option<f64> {
    parameters.get(index)?.trim().parse().ok()
}

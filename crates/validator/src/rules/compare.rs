//! Comparison rules: `in`, `not_in`, `same`, `different`, `confirmed`.
//!
//! `same` and `different` name another attribute. Their replacer renders
//! `:other` as that attribute's display name rather than its raw key.

use serde_json::Value;

use super::{builtin, text};
use crate::registry::{RuleDefinition, RuleTarget, replacer};

pub(super) fn definitions() -> Vec<RuleDefinition> {
    let other_name = replacer(|template, ctx| {
        let other = ctx.parameters().first().map_or("", String::as_str);
        let name = ctx.attribute_name(other);
        ctx.replace_placeholders(template, &[("other", name.as_str())])
    });

    vec![
        builtin("in", "The selected :attribute must be one of: :values.", in_list)
            .with_placeholders(["values"]),
        builtin("not_in", "The selected :attribute must not be one of: :values.", not_in)
            .with_placeholders(["values"]),
        builtin("same", "The :attribute and :other fields must match.", same)
            .with_replacer(other_name.clone()),
        builtin("different", "The :attribute and :other must be different.", different)
            .with_replacer(other_name),
        builtin("confirmed", "The :attribute confirmation does not match.", confirmed),
    ]
}

/// `in:A,B,C`, comparing the value's text form.
pub fn in_list(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    text(value).is_some_and(|s| parameters.iter().any(|p| *p == *s))
}

/// `not_in:A,B,C`. Values with no text form pass.
pub fn not_in(value: &Value, parameters: &[String], _: &RuleTarget<'_>) -> bool {
    text(value).is_none_or(|s| parameters.iter().all(|p| *p != *s))
}

/// `same:OTHER`
pub fn same(value: &Value, parameters: &[String], target: &RuleTarget<'_>) -> bool {
    parameters
        .first()
        .is_some_and(|other| target.lookup(other) == Some(value))
}

/// `different:OTHER`
pub fn different(value: &Value, parameters: &[String], target: &RuleTarget<'_>) -> bool {
    parameters
        .first()
        .is_some_and(|other| target.lookup(other) != Some(value))
}

/// Equal to `<attribute>_confirmation`.
pub fn confirmed(value: &Value, _: &[String], target: &RuleTarget<'_>) -> bool {
    let confirmation = format!("{}_confirmation", target.attribute());
    target.lookup(&confirmation) == Some(value)
}

//! Registry behaviour observed through validation sessions.

use pretty_assertions::assert_eq;
use regex::Regex;
use rulekit_validator::{Registry, RuleError, Validator};
use serde_json::{Value, json};

fn telephone(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == 3
        && parts
            .iter()
            .zip([3, 3, 4])
            .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_digit()))
}

// ============================================================================
// CUSTOM RULES
// ============================================================================

#[test]
fn custom_rule_is_used_by_name() {
    let mut registry = Registry::with_builtins();
    registry
        .register_with(
            "telephone",
            |value, _, _| telephone(value),
            Some("The :attribute phone number is not in the format XXX-XXX-XXXX."),
            None,
        )
        .unwrap();

    let mut ok = Validator::new(&registry, json!({ "phone": "555-123-4567" }), [("phone", "telephone")]);
    assert!(ok.passes().unwrap());
    assert!(ok.errors().is_empty());

    let mut bad = Validator::new(&registry, json!({ "phone": "5551234567" }), [("phone", "telephone")]);
    assert!(bad.fails().unwrap());
    assert_eq!(
        bad.errors().first("phone"),
        Some("The phone phone number is not in the format XXX-XXX-XXXX.")
    );
}

#[test]
fn re_registering_overrides_builtin() {
    let mut registry = Registry::with_builtins();
    registry
        .register_with(
            "string",
            |value, _, _| value.as_str().is_some_and(|s| s.starts_with('x')),
            Some("The :attribute must start with x."),
            None,
        )
        .unwrap();

    let rule = registry.get_rule("string").unwrap();
    assert_eq!(rule.message(), Some("The :attribute must start with x."));

    let mut validator = Validator::new(&registry, json!({ "code": "abc" }), [("code", "string")]);
    assert!(validator.fails().unwrap());
    assert_eq!(validator.errors().first("code"), Some("The code must start with x."));
}

#[test]
fn predicates_may_return_option_or_result() {
    let mut registry = Registry::new();
    registry
        .register("has_name", |value, _, _| value.get("name").map(|_| ()))
        .unwrap();
    registry
        .register("parses", |value, _, _| {
            value.as_str().unwrap_or_default().parse::<u8>().map(drop)
        })
        .unwrap();

    let mut validator = Validator::new(
        &registry,
        json!({ "user": { "name": "ann" }, "count": "300" }),
        [("user", "has_name"), ("count", "parses")],
    );
    assert!(validator.fails().unwrap());
    assert!(!validator.errors().has("user"));
    assert!(validator.errors().has("count"));
}

#[test]
fn wrapped_false_fails_the_rule() {
    let mut registry = Registry::new();
    registry
        .register("long", |value, _, _| value.as_str().map(|s| s.len() > 3))
        .unwrap();

    let mut short = Validator::new(&registry, json!({ "name": "ab" }), [("name", "long")]);
    assert!(short.fails().unwrap());

    let mut long = Validator::new(&registry, json!({ "name": "abcd" }), [("name", "long")]);
    assert!(long.passes().unwrap());
}

#[test]
fn regex_find_predicate() {
    let pattern = Regex::new(r"^\d{3}-\d{3}-\d{4}$").unwrap();
    let mut registry = Registry::new();
    registry
        .register("telephone", move |value, _, _| {
            value.as_str().and_then(|s| pattern.find(s)).map(drop)
        })
        .unwrap();

    let mut ok = Validator::new(&registry, json!({ "phone": "555-123-4567" }), [("phone", "telephone")]);
    assert!(ok.passes().unwrap());

    let mut bad = Validator::new(&registry, json!({ "phone": "555-1234" }), [("phone", "telephone")]);
    assert!(bad.fails().unwrap());
}

// ============================================================================
// UNKNOWN RULES
// ============================================================================

#[test]
fn unknown_rule_then_fallback_on_fresh_session() {
    let mut registry = Registry::with_builtins();
    let data = json!({ "code": "abc" });

    let mut first = Validator::new(&registry, data.clone(), [("code", "required|shiny")]);
    let err = first.passes().unwrap_err();
    assert!(matches!(&err, RuleError::RuleNotFound { rule, .. } if rule == "shiny"));
    assert_eq!(err.code(), "RULE_NOT_FOUND");

    registry.register_missed_rule_validator(|value, _, _| value.as_str() == Some("shiny"));
    assert!(registry.has_missed_rule_validator());
    assert!(!registry.contains("shiny"));

    let mut second = Validator::new(&registry, data, [("code", "required|shiny")]);
    assert!(second.fails().unwrap());
    assert_eq!(
        second.errors().first("code"),
        Some("The code failed the shiny rule.")
    );
}

#[test]
fn fallback_failures_consult_custom_messages() {
    let mut registry = Registry::new();
    registry.register_missed_rule_validator(|_, _, _| false);

    let mut validator = Validator::new(&registry, json!({}), [("a", "mystery"), ("b", "mystery")])
        .with_messages([("mystery.a", "A is a mystery.")]);
    assert!(validator.fails().unwrap());
    assert_eq!(validator.errors().first("a"), Some("A is a mystery."));
    assert_eq!(validator.errors().first("b"), Some("The b failed the mystery rule."));

    let mut by_rule = Validator::new(&registry, json!({}), [("b", "mystery")])
        .with_messages([("mystery", ":attribute failed :rule")]);
    by_rule.passes().unwrap();
    assert_eq!(by_rule.errors().first("b"), Some("b failed mystery"));
}

#[test]
fn empty_rule_name_is_rejected() {
    let mut registry = Registry::new();
    let err = registry.register("", |_, _, _| true).unwrap_err();
    assert_eq!(err.code(), "RULE_INVALID_NAME");
    assert!(registry.is_empty());
}

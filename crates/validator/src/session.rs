//! Validation sessions.
//!
//! A [`Validator`] binds one input, one rule map and the caller's message and
//! attribute-name overrides to a borrowed [`Registry`]. The first call to
//! [`passes`](Validator::passes) or [`fails`](Validator::fails) runs every
//! rule; later calls reuse the cached outcome.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::attribute::AttributeNames;
use crate::config::{StopOnError, ValidatorConfig};
use crate::error::RuleError;
use crate::errors::ErrorBag;
use crate::expression::{RuleInstance, RuleSpec};
use crate::input;
use crate::message::MessageTemplater;
use crate::registry::{Registry, RuleDefinition, RuleTarget};

static NULL: Value = Value::Null;

/// One validation request.
///
/// # Examples
///
/// ```
/// use rulekit_validator::{Registry, Validator};
/// use serde_json::json;
///
/// let registry = Registry::with_builtins();
/// let mut validator = Validator::new(
///     &registry,
///     json!({ "name": "", "age": 17 }),
///     [("name", "required"), ("age", "integer|min:18")],
/// );
///
/// assert!(validator.fails().unwrap());
/// assert_eq!(
///     validator.errors().first("name"),
///     Some("The name field is required.")
/// );
/// assert_eq!(
///     validator.errors().first("age"),
///     Some("The age must be at least 18.")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    registry: &'r Registry,
    data: Value,
    rules: IndexMap<String, Vec<RuleInstance>>,
    messages: HashMap<String, String>,
    names: AttributeNames,
    config: ValidatorConfig,
    errors: ErrorBag,
    outcome: Option<bool>,
}

impl<'r> Validator<'r> {
    /// Creates a session. Rule expressions are parsed immediately; rule
    /// names are resolved when the session runs.
    pub fn new<I, K, S>(registry: &'r Registry, data: Value, rules: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<RuleSpec>,
    {
        let rules = rules
            .into_iter()
            .map(|(attribute, spec)| (attribute.into(), spec.into().parse()))
            .collect();

        Self {
            registry,
            data,
            rules,
            messages: HashMap::new(),
            names: AttributeNames::new(),
            config: registry.config().clone(),
            errors: ErrorBag::new(),
            outcome: None,
        }
    }

    /// Adds custom messages keyed by `rule` or `rule.attribute`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_messages<I, K, V>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builder form of [`set_attribute_names`](Self::set_attribute_names).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_attribute_names<I, K, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.set_attribute_names(names);
        self
    }

    /// Replaces the session's copy of the registry configuration.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the per-attribute short-circuit policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn stop_on_error(mut self, policy: StopOnError) -> Self {
        self.config.stop_on_error = policy;
        self
    }

    /// Merges display names for attributes. Later names win.
    ///
    /// Messages already rendered by an earlier run are not re-rendered.
    pub fn set_attribute_names<I, K, V>(&mut self, names: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.names.extend(names);
    }

    /// Replaces the default key-to-name transform for this session.
    pub fn set_attribute_formatter<F>(&mut self, formatter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.names.set_formatter(Arc::new(formatter));
    }

    /// Display name of `key` under this session's names and formatter.
    #[must_use]
    pub fn attribute_name(&self, key: &str) -> String {
        self.names.resolve(key)
    }

    /// The input being validated.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The parsed rule map.
    #[must_use]
    pub fn rules(&self) -> &IndexMap<String, Vec<RuleInstance>> {
        &self.rules
    }

    /// Returns true if every rule passed. Runs the rules on first call.
    pub fn passes(&mut self) -> Result<bool, RuleError> {
        if let Some(outcome) = self.outcome {
            return Ok(outcome);
        }
        let errors = self.run()?;
        let outcome = errors.is_empty();
        self.errors = errors;
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Returns true if any rule failed. Shares the cached run with
    /// [`passes`](Self::passes).
    pub fn fails(&mut self) -> Result<bool, RuleError> {
        self.passes().map(|passed| !passed)
    }

    /// Messages from the last completed run.
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn run(&self) -> Result<ErrorBag, RuleError> {
        let resolved = self.resolve()?;
        let templater = MessageTemplater::new(&self.messages, &self.names, &self.config);
        let stop = &self.config.stop_on_error;
        let mut errors = ErrorBag::new();
        let mut evaluated = 0usize;

        for ((pattern, rules), definitions) in self.rules.iter().zip(&resolved) {
            for attribute in input::expand(&self.data, pattern) {
                let origin = (attribute != *pattern).then_some(pattern.as_str());
                let value = input::lookup(&self.data, &attribute).unwrap_or(&NULL);
                let target = RuleTarget::new(&attribute, &self.data);
                let stops = stop.applies_to(&attribute) || stop.applies_to(pattern);

                for (rule, definition) in rules.iter().zip(definitions) {
                    let passed = definition.evaluate(value, rule.parameters(), &target);
                    evaluated += 1;
                    trace!(attribute = %attribute, rule = %rule, passed, "rule evaluated");

                    if !passed {
                        let message = templater.render(definition, rule, &attribute, origin);
                        errors.add(attribute.as_str(), message);
                        if stops {
                            break;
                        }
                    }
                }
            }
        }

        debug!(
            attributes = self.rules.len(),
            rules = evaluated,
            failed = errors.all().len(),
            "validation run complete"
        );
        Ok(errors)
    }

    /// Resolves every declared rule before any is evaluated. An unknown name
    /// fails the run even when its pattern expands to no attributes or its
    /// attribute stops at an earlier failure.
    fn resolve(&self) -> Result<Vec<Vec<Cow<'r, RuleDefinition>>>, RuleError> {
        self.rules
            .iter()
            .map(|(pattern, rules)| {
                rules
                    .iter()
                    .map(|rule| {
                        self.registry
                            .get_rule(rule.name())
                            .map_err(|err| err.with_attribute(pattern.as_str()))
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_with("yes", |_, _, _| true, Some("never shown"), None)
            .unwrap();
        registry
            .register_with("no", |_, _, _| false, Some("The :attribute said no."), None)
            .unwrap();
        registry
    }

    #[test]
    fn passing_rules_leave_no_entries() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({ "a": 1 }), [("a", "yes|yes")]);
        assert!(validator.passes().unwrap());
        assert!(!validator.errors().has("a"));
    }

    #[test]
    fn failing_rule_renders_display_name() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("firstName", "no")]);
        assert!(validator.fails().unwrap());
        assert_eq!(validator.errors().first("firstName"), Some("The first name said no."));
    }

    #[test]
    fn all_rules_run_without_short_circuit() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("a", "no|yes|no")]);
        assert!(validator.fails().unwrap());
        assert_eq!(validator.errors().get("a").len(), 2);
    }

    #[test]
    fn stop_on_error_keeps_first_failure_only() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("a", "no|no"), ("b", "no|no")])
            .stop_on_error(StopOnError::attributes(["a"]));
        validator.passes().unwrap();
        assert_eq!(validator.errors().get("a").len(), 1);
        assert_eq!(validator.errors().get("b").len(), 2);
    }

    #[test]
    fn outcome_is_cached() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("a", "no")]);
        assert!(!validator.passes().unwrap());
        assert!(!validator.passes().unwrap());
        assert!(validator.fails().unwrap());
        assert_eq!(validator.errors().count(), 1);
    }

    #[test]
    fn unknown_rule_is_reported_with_attribute() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("field", "yes|unknown")]);
        let err = validator.passes().unwrap_err();
        assert_eq!(err, RuleError::rule_not_found("unknown").with_attribute("field"));
        assert!(validator.fails().is_err());
    }

    #[test]
    fn wildcard_attributes_expand_per_element() {
        let registry = registry();
        let mut validator = Validator::new(
            &registry,
            json!({ "items": [{ "sku": "a" }, { "sku": "b" }] }),
            [("items.*.sku", "no")],
        )
        .with_messages([("no.items.*.sku", "Item :attribute rejected.")]);

        assert!(validator.fails().unwrap());
        let keys: Vec<_> = validator.errors().all().keys().cloned().collect();
        assert_eq!(keys, ["items.0.sku", "items.1.sku"]);
        assert_eq!(
            validator.errors().first("items.1.sku"),
            Some("Item items 1 sku rejected.")
        );
    }

    #[test]
    fn attribute_formatter_applies_to_messages() {
        let registry = registry();
        let mut validator = Validator::new(&registry, json!({}), [("user_name", "no")]);
        validator.set_attribute_formatter(|key| key.replace('_', "-"));
        validator.passes().unwrap();
        assert_eq!(validator.errors().first("user_name"), Some("The user-name said no."));
    }

    #[test]
    fn config_fallback_message_is_used() {
        let mut registry = Registry::new().with_config(
            ValidatorConfig::default().with_fallback_message(":attribute broke :rule"),
        );
        registry.register("bare", |_, _, _| false).unwrap();

        let mut validator = Validator::new(&registry, json!({}), [("x", "bare")]);
        validator.passes().unwrap();
        assert_eq!(validator.errors().first("x"), Some("x broke bare"));
    }
}

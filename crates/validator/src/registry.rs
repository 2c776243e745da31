//! Rule registry.
//!
//! Maps rule names to [`RuleDefinition`]s and holds the single missing-rule
//! fallback. A registry is populated during startup wiring and then shared
//! immutably: mutation takes `&mut self`, sessions borrow `&Registry`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::ValidatorConfig;
use crate::error::RuleError;
use crate::input;
use crate::message::ReplacerContext;

// ============================================================================
// PREDICATES
// ============================================================================

/// Type-erased rule predicate.
pub type Predicate = Arc<dyn Fn(&Value, &[String], &RuleTarget<'_>) -> bool + Send + Sync>;

/// Custom message replacer. Receives the template after built-in
/// substitution and returns the final message.
pub type Replacer = Arc<dyn Fn(&str, &ReplacerContext<'_>) -> String + Send + Sync>;

/// Wraps a closure as a [`Replacer`], fixing its argument lifetimes.
pub fn replacer<F>(f: F) -> Replacer
where
    F: Fn(&str, &ReplacerContext<'_>) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as a [`Predicate`], coercing its result through [`Truthy`].
pub fn predicate<F, R>(f: F) -> Predicate
where
    F: Fn(&Value, &[String], &RuleTarget<'_>) -> R + Send + Sync + 'static,
    R: Truthy,
{
    Arc::new(
        move |value: &Value, parameters: &[String], target: &RuleTarget<'_>| {
            f(value, parameters, target).is_truthy()
        },
    )
}

/// Predicate results that count as a pass.
///
/// `Some(x)` and `Ok(x)` pass when `x` does, so `Some(false)` fails.
/// Payloads without a truth value of their own, `()` and a `usize` position
/// such as the one `str::find` returns, count as a pass.
///
/// The result type cannot borrow from the predicate's arguments. A regex
/// match is reduced before it is returned, e.g. `re.find(s).map(drop)`.
pub trait Truthy {
    /// Returns true if the result counts as a pass.
    fn is_truthy(self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(self) -> bool {
        self
    }
}

impl Truthy for () {
    fn is_truthy(self) -> bool {
        true
    }
}

impl Truthy for usize {
    fn is_truthy(self) -> bool {
        true
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(self) -> bool {
        self.is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy, E> Truthy for Result<T, E> {
    fn is_truthy(self) -> bool {
        self.is_ok_and(Truthy::is_truthy)
    }
}

/// The attribute a predicate is evaluated for, with read access to the
/// whole input.
#[derive(Debug, Clone, Copy)]
pub struct RuleTarget<'a> {
    attribute: &'a str,
    data: &'a Value,
}

impl<'a> RuleTarget<'a> {
    /// Creates a target for `attribute` within `data`.
    pub fn new(attribute: &'a str, data: &'a Value) -> Self {
        Self { attribute, data }
    }

    /// The attribute key being validated.
    #[must_use]
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// The complete input.
    #[must_use]
    pub fn data(&self) -> &'a Value {
        self.data
    }

    /// Looks up another attribute of the input.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&'a Value> {
        input::lookup(self.data, key)
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// A named predicate plus its message metadata.
///
/// `placeholders` names the parameter roles substituted into the template
/// positionally: `between` declares `["min", "max"]`, so `between:1,10`
/// renders `:min` as `1` and `:max` as `10`. The last role takes every
/// remaining parameter joined with `", "`.
#[derive(Clone)]
pub struct RuleDefinition {
    name: String,
    predicate: Predicate,
    message: Option<String>,
    replacer: Option<Replacer>,
    placeholders: Vec<String>,
    missing_rule: bool,
}

impl RuleDefinition {
    /// Creates a definition with no message, replacer or placeholders.
    pub fn new<F, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[String], &RuleTarget<'_>) -> R + Send + Sync + 'static,
        R: Truthy,
    {
        Self::from_predicate(name, predicate(f))
    }

    /// Creates a definition from an already type-erased predicate.
    pub fn from_predicate(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
            message: None,
            replacer: None,
            placeholders: Vec::new(),
            missing_rule: false,
        }
    }

    /// Sets the default message template.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the custom replacer.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_replacer(mut self, replacer: Replacer) -> Self {
        self.replacer = Some(replacer);
        self
    }

    /// Sets the positional parameter roles.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_placeholders<I, S>(mut self, placeholders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.placeholders = placeholders.into_iter().map(Into::into).collect();
        self
    }

    /// The rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default message template, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The custom replacer, if any.
    #[must_use]
    pub fn replacer(&self) -> Option<&Replacer> {
        self.replacer.as_ref()
    }

    /// Positional parameter roles.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Returns true if this definition was synthesised for an unknown name
    /// by the missing-rule validator.
    #[must_use]
    pub fn is_missing_rule(&self) -> bool {
        self.missing_rule
    }

    /// Runs the predicate.
    #[must_use]
    pub fn evaluate(&self, value: &Value, parameters: &[String], target: &RuleTarget<'_>) -> bool {
        (self.predicate)(value, parameters, target)
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("replacer", &self.replacer.is_some())
            .field("placeholders", &self.placeholders)
            .field("missing_rule", &self.missing_rule)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Registry of rule definitions.
///
/// # Examples
///
/// ```
/// use rulekit_validator::Registry;
///
/// let mut registry = Registry::new();
/// registry
///     .register("telephone", |value, _, _| {
///         value.as_str().is_some_and(|s| s.len() == 12)
///     })
///     .unwrap();
///
/// assert!(registry.contains("telephone"));
/// assert!(registry.get_rule("fax").is_err());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, RuleDefinition>,
    missing_rule: Option<Predicate>,
    config: ValidatorConfig,
}

impl Registry {
    /// Creates an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in rule pack.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtins(&mut registry);
        registry
    }

    /// Replaces the engine configuration.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// The engine configuration sessions start from.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Registers or replaces a rule with no default message.
    pub fn register<F, R>(&mut self, name: impl Into<String>, f: F) -> Result<(), RuleError>
    where
        F: Fn(&Value, &[String], &RuleTarget<'_>) -> R + Send + Sync + 'static,
        R: Truthy,
    {
        self.register_definition(RuleDefinition::new(name, f))
    }

    /// Registers or replaces a rule with an optional message and replacer.
    pub fn register_with<F, R>(
        &mut self,
        name: impl Into<String>,
        f: F,
        message: Option<&str>,
        replacer: Option<Replacer>,
    ) -> Result<(), RuleError>
    where
        F: Fn(&Value, &[String], &RuleTarget<'_>) -> R + Send + Sync + 'static,
        R: Truthy,
    {
        let mut definition = RuleDefinition::new(name, f);
        definition.message = message.map(str::to_owned);
        definition.replacer = replacer;
        self.register_definition(definition)
    }

    /// Stores `definition`, fully replacing any rule with the same name.
    pub fn register_definition(&mut self, definition: RuleDefinition) -> Result<(), RuleError> {
        if definition.name.is_empty() {
            return Err(RuleError::InvalidRuleName {
                name: definition.name,
            });
        }
        self.insert(definition);
        Ok(())
    }

    pub(crate) fn insert(&mut self, definition: RuleDefinition) {
        let name = definition.name.clone();
        if self.rules.insert(name.clone(), definition).is_some() {
            debug!(rule = %name, "rule definition overridden");
        } else {
            debug!(rule = %name, "rule registered");
        }
    }

    /// Installs the predicate used for every unregistered rule name.
    /// Replaces any earlier fallback.
    pub fn register_missed_rule_validator<F, R>(&mut self, f: F)
    where
        F: Fn(&Value, &[String], &RuleTarget<'_>) -> R + Send + Sync + 'static,
        R: Truthy,
    {
        if self.missing_rule.replace(predicate(f)).is_some() {
            debug!("missing-rule validator replaced");
        } else {
            debug!("missing-rule validator installed");
        }
    }

    /// Returns true if a fallback for unknown rules is installed.
    #[must_use]
    pub fn has_missed_rule_validator(&self) -> bool {
        self.missing_rule.is_some()
    }

    /// Resolves a rule by name.
    ///
    /// Unknown names resolve to the missing-rule fallback when one is
    /// installed, as a definition carrying the requested name and no
    /// message or replacer, flagged by
    /// [`is_missing_rule`](RuleDefinition::is_missing_rule). Otherwise the lookup fails with
    /// [`RuleError::RuleNotFound`].
    pub fn get_rule(&self, name: &str) -> Result<Cow<'_, RuleDefinition>, RuleError> {
        if let Some(definition) = self.rules.get(name) {
            return Ok(Cow::Borrowed(definition));
        }
        match &self.missing_rule {
            Some(fallback) => {
                let mut definition = RuleDefinition::from_predicate(name, Arc::clone(fallback));
                definition.missing_rule = true;
                Ok(Cow::Owned(definition))
            }
            None => Err(RuleError::rule_not_found(name)),
        }
    }

    /// Returns true if `name` is registered. The fallback is not consulted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rule_names())
            .field("missing_rule", &self.missing_rule.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(data: &Value) -> RuleTarget<'_> {
        RuleTarget::new("field", data)
    }

    #[test]
    fn register_then_get() {
        let mut registry = Registry::new();
        registry.register("always", |_, _, _| true).unwrap();

        let data = json!({});
        let rule = registry.get_rule("always").unwrap();
        assert_eq!(rule.name(), "always");
        assert!(rule.evaluate(&json!(null), &[], &target(&data)));
        assert!(matches!(rule, Cow::Borrowed(_)));
        assert!(!rule.is_missing_rule());
    }

    #[test]
    fn override_replaces_every_part() {
        let mut registry = Registry::new();
        registry
            .register_with(
                "rule",
                |_, _, _| true,
                Some("old"),
                Some(replacer(|_, _| "old".to_owned())),
            )
            .unwrap();
        registry.register("rule", |_, _, _| false).unwrap();

        let data = json!({});
        let rule = registry.get_rule("rule").unwrap();
        assert!(!rule.evaluate(&json!(1), &[], &target(&data)));
        assert_eq!(rule.message(), None);
        assert!(rule.replacer().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = Registry::new();
        let err = registry.register("", |_, _, _| true).unwrap_err();
        assert!(matches!(err, RuleError::InvalidRuleName { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_rule_without_fallback_is_not_found() {
        let registry = Registry::new();
        let err = registry.get_rule("unknown").unwrap_err();
        assert_eq!(
            err,
            RuleError::RuleNotFound {
                rule: "unknown".into(),
                attribute: None
            }
        );
    }

    #[test]
    fn fallback_resolves_unknown_names() {
        let mut registry = Registry::new();
        registry.register_missed_rule_validator(|_, _, _| false);
        registry.register_missed_rule_validator(|_, _, _| true);

        let data = json!({});
        let rule = registry.get_rule("unknown").unwrap();
        assert_eq!(rule.name(), "unknown");
        assert_eq!(rule.message(), None);
        assert!(rule.is_missing_rule());
        assert!(rule.evaluate(&json!("x"), &[], &target(&data)));
        assert!(!registry.contains("unknown"));
    }

    #[test]
    fn option_and_result_results_are_truthy() {
        let mut registry = Registry::new();
        registry
            .register("parses", |value, _, _| {
                value.as_str().map(|s| s.parse::<f64>().map(drop))
            })
            .unwrap();
        registry
            .register("has_at", |value, _, _| value.as_str()?.find('@'))
            .unwrap();

        let data = json!({});
        let parses = registry.get_rule("parses").unwrap();
        assert!(parses.evaluate(&json!("1.5"), &[], &target(&data)));
        assert!(!parses.evaluate(&json!("abc"), &[], &target(&data)));

        let has_at = registry.get_rule("has_at").unwrap();
        assert!(has_at.evaluate(&json!("a@b"), &[], &target(&data)));
        assert!(!has_at.evaluate(&json!("ab"), &[], &target(&data)));
        assert!(!has_at.evaluate(&json!(3), &[], &target(&data)));
    }

    #[test]
    fn wrapped_false_is_not_truthy() {
        assert!(!Some(false).is_truthy());
        assert!(!Ok::<_, ()>(false).is_truthy());
        assert!(!Some(Ok::<_, ()>(false)).is_truthy());
        assert!(Some(true).is_truthy());
        assert!(Some(0usize).is_truthy());
        assert!(!None::<()>.is_truthy());
    }

    #[test]
    fn builtins_are_registered() {
        let registry = Registry::with_builtins();
        for name in ["required", "string", "min", "between", "in", "same"] {
            assert!(registry.contains(name), "missing builtin `{name}`");
        }
    }

    #[test]
    fn target_reads_other_attributes() {
        let data = json!({ "a": 1, "b": { "c": 2 } });
        let target = RuleTarget::new("a", &data);
        assert_eq!(target.attribute(), "a");
        assert_eq!(target.lookup("b.c"), Some(&json!(2)));
    }
}

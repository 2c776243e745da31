//! Message templating.
//!
//! A failing rule is rendered in three steps:
//!
//! 1. pick a template: `messages["rule.attribute"]`, then
//!    `messages["rule.<wildcard pattern>"]` for expanded attributes, then
//!    `messages["rule"]`, then the definition's template, then the
//!    configured missing-rule template for rules handled by the
//!    missing-rule validator, then the configured fallback;
//! 2. substitute `:attribute`, `:rule` and the definition's positional
//!    parameter roles;
//! 3. hand the result to the definition's replacer, if any. The replacer's
//!    output is final.

use std::collections::HashMap;

use tracing::trace;

use crate::attribute::AttributeNames;
use crate::config::ValidatorConfig;
use crate::expression::RuleInstance;
use crate::registry::RuleDefinition;

// ============================================================================
// PLACEHOLDER SUBSTITUTION
// ============================================================================

/// Replaces `:name` placeholders in `template`.
///
/// A placeholder is `:` followed by the longest run of ASCII letters, digits
/// and `_`, so `:min` never matches inside `:minimum`. Placeholders with no
/// replacement are left verbatim.
///
/// # Examples
///
/// ```
/// use rulekit_validator::message::replace_placeholders;
///
/// let out = replace_placeholders(
///     "The :attribute must be at least :min.",
///     &[("attribute", "age"), ("min", "18")],
/// );
/// assert_eq!(out, "The age must be at least 18.");
/// ```
#[must_use]
pub fn replace_placeholders(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let len = after
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let name = &after[..len];

        match replacements.iter().find(|(key, _)| *key == name) {
            Some((_, value)) if len > 0 => out.push_str(value),
            _ => {
                out.push(':');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}

// ============================================================================
// REPLACER CONTEXT
// ============================================================================

/// Helpers handed to a custom [`Replacer`](crate::registry::Replacer).
///
/// # Examples
///
/// A replacer that renders a parameter as another attribute's display name:
///
/// ```
/// use rulekit_validator::registry::replacer;
///
/// let before_day = replacer(|template, ctx| {
///     let other = ctx.parameters().first().map(String::as_str).unwrap_or_default();
///     let name = ctx.attribute_name(other);
///     ctx.replace_placeholders(template, &[("before_day", name.as_str())])
/// });
/// # let _ = before_day;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReplacerContext<'a> {
    rule: &'a RuleInstance,
    attribute: &'a str,
    names: &'a AttributeNames,
}

impl<'a> ReplacerContext<'a> {
    pub(crate) fn new(rule: &'a RuleInstance, attribute: &'a str, names: &'a AttributeNames) -> Self {
        Self {
            rule,
            attribute,
            names,
        }
    }

    /// The failing rule occurrence.
    #[must_use]
    pub fn rule(&self) -> &'a RuleInstance {
        self.rule
    }

    /// The failing rule's parameters.
    #[must_use]
    pub fn parameters(&self) -> &'a [String] {
        self.rule.parameters()
    }

    /// The attribute key being validated.
    #[must_use]
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// Display name for any attribute key of the session.
    #[must_use]
    pub fn attribute_name(&self, key: &str) -> String {
        self.names.resolve(key)
    }

    /// The built-in substitution primitive.
    #[must_use]
    pub fn replace_placeholders(&self, template: &str, replacements: &[(&str, &str)]) -> String {
        replace_placeholders(template, replacements)
    }
}

// ============================================================================
// TEMPLATER
// ============================================================================

/// Renders failure messages for one session.
#[derive(Debug, Clone, Copy)]
pub struct MessageTemplater<'a> {
    messages: &'a HashMap<String, String>,
    names: &'a AttributeNames,
    config: &'a ValidatorConfig,
}

impl<'a> MessageTemplater<'a> {
    /// Creates a templater over custom messages, display names and the
    /// configured default templates.
    #[must_use]
    pub fn new(
        messages: &'a HashMap<String, String>,
        names: &'a AttributeNames,
        config: &'a ValidatorConfig,
    ) -> Self {
        Self {
            messages,
            names,
            config,
        }
    }

    /// Picks the template for `rule` failing on `attribute`.
    ///
    /// `pattern` is the wildcard key `attribute` was expanded from, if any.
    #[must_use]
    pub fn template<'d>(
        &self,
        definition: &'d RuleDefinition,
        rule: &RuleInstance,
        attribute: &str,
        pattern: Option<&str>,
    ) -> &'d str
    where
        'a: 'd,
    {
        let name = rule.name();
        let custom = std::iter::once(attribute)
            .chain(pattern)
            .find_map(|key| self.messages.get(&format!("{name}.{key}")))
            .or_else(|| self.messages.get(name));

        if let Some(template) = custom {
            return template;
        }
        if let Some(template) = definition.message() {
            return template;
        }
        if definition.is_missing_rule() {
            return &self.config.missing_rule_message;
        }
        trace!(rule = name, attribute, "no message template, using fallback");
        &self.config.fallback_message
    }

    /// Renders the message for `rule` failing on `attribute`.
    #[must_use]
    pub fn render(
        &self,
        definition: &RuleDefinition,
        rule: &RuleInstance,
        attribute: &str,
        pattern: Option<&str>,
    ) -> String {
        let template = self.template(definition, rule, attribute, pattern);
        let display = self.names.resolve(attribute);

        let mut replacements: Vec<(&str, String)> = vec![
            ("attribute", display),
            ("rule", rule.name().to_owned()),
        ];
        replacements.extend(positional(definition.placeholders(), rule.parameters()));

        let pairs: Vec<(&str, &str)> = replacements
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        let message = replace_placeholders(template, &pairs);

        match definition.replacer() {
            Some(replacer) => replacer(&message, &ReplacerContext::new(rule, attribute, self.names)),
            None => message,
        }
    }
}

/// Pairs parameter roles with parameters. The last role absorbs the rest.
fn positional<'r>(roles: &'r [String], parameters: &[String]) -> Vec<(&'r str, String)> {
    let last = roles.len().saturating_sub(1);
    roles
        .iter()
        .enumerate()
        .filter_map(|(i, role)| {
            let value = if i == last {
                parameters.get(i..).filter(|rest| !rest.is_empty())?.join(", ")
            } else {
                parameters.get(i)?.clone()
            };
            Some((role.as_str(), value))
        })
        .collect()
}

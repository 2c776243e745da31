//! Engine-wide configuration.
//!
//! A [`ValidatorConfig`] is held by the [`Registry`](crate::Registry) and
//! copied into every [`Validator`](crate::Validator) created from it. A
//! session may replace its copy with [`Validator::with_config`](crate::Validator::with_config).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Template used when no custom, rule or definition message exists.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "The :attribute is invalid.";

/// Template for rules resolved through the missing-rule validator when no
/// custom message exists.
pub const DEFAULT_MISSING_RULE_MESSAGE: &str = "The :attribute failed the :rule rule.";

/// Configuration shared by every session created from a registry.
///
/// # Examples
///
/// ```
/// use rulekit_validator::{StopOnError, ValidatorConfig};
///
/// let config = ValidatorConfig::from_json_str(
///     r#"{ "fallback_message": ":attribute looks wrong", "stop_on_error": "all" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.fallback_message, ":attribute looks wrong");
/// assert_eq!(config.stop_on_error, StopOnError::All);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Message template for failures with no template anywhere.
    pub fallback_message: String,

    /// Message template for unknown rules handled by the missing-rule
    /// validator. `:rule` renders the unknown name.
    pub missing_rule_message: String,

    /// Whether an attribute stops evaluating rules after its first failure.
    pub stop_on_error: StopOnError,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_owned(),
            missing_rule_message: DEFAULT_MISSING_RULE_MESSAGE.to_owned(),
            stop_on_error: StopOnError::Never,
        }
    }
}

impl ValidatorConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the fallback message template.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Sets the template for rules handled by the missing-rule validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_missing_rule_message(mut self, message: impl Into<String>) -> Self {
        self.missing_rule_message = message.into();
        self
    }

    /// Sets the stop-on-error policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_stop_on_error(mut self, policy: StopOnError) -> Self {
        self.stop_on_error = policy;
        self
    }
}

/// Per-attribute short-circuit policy.
///
/// By default every rule of an attribute is evaluated, so an attribute can
/// collect several messages in one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOnError {
    /// Evaluate every rule.
    #[default]
    Never,
    /// Stop each attribute at its first failure.
    All,
    /// Stop only the listed attributes at their first failure.
    Attributes(BTreeSet<String>),
}

impl StopOnError {
    /// Builds an [`StopOnError::Attributes`] policy.
    pub fn attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Attributes(attributes.into_iter().map(Into::into).collect())
    }

    /// Returns true if `attribute` stops after its first failure.
    #[must_use]
    pub fn applies_to(&self, attribute: &str) -> bool {
        match self {
            Self::Never => false,
            Self::All => true,
            Self::Attributes(set) => set.contains(attribute),
        }
    }
}

//! Error type for the rule engine.
//!
//! Only conditions that must reach the caller live here. A failing predicate
//! is not an error: it is recorded in the [`ErrorBag`](crate::ErrorBag).

/// Error type for registry lookups, registration and configuration.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A rule expression names a rule that is not registered and no
    /// missing-rule validator is installed.
    #[error("validator rule `{rule}` is not defined{}", for_attribute(.attribute.as_deref()))]
    RuleNotFound {
        rule: String,
        attribute: Option<String>,
    },

    /// A rule was registered under an empty name.
    #[error("invalid rule name `{name}`: rule names must not be empty")]
    InvalidRuleName { name: String },

    /// Engine configuration could not be parsed.
    #[error("invalid validator configuration: {reason}")]
    Config { reason: String },
}

impl RuleError {
    /// Creates a [`RuleError::RuleNotFound`] not yet tied to an attribute.
    pub fn rule_not_found(rule: impl Into<String>) -> Self {
        Self::RuleNotFound {
            rule: rule.into(),
            attribute: None,
        }
    }

    /// Records the attribute whose rule list triggered the error.
    #[must_use]
    pub fn with_attribute(self, attribute: impl Into<String>) -> Self {
        match self {
            Self::RuleNotFound { rule, .. } => Self::RuleNotFound {
                rule,
                attribute: Some(attribute.into()),
            },
            other => other,
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::RuleNotFound { .. } => "lookup",
            Self::InvalidRuleName { .. } => "registration",
            Self::Config { .. } => "config",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::RuleNotFound { .. } => "RULE_NOT_FOUND",
            Self::InvalidRuleName { .. } => "RULE_INVALID_NAME",
            Self::Config { .. } => "RULE_CONFIG",
        }
    }
}

fn for_attribute(attribute: Option<&str>) -> String {
    attribute.map_or_else(String::new, |a| format!(" (attribute `{a}`)"))
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}

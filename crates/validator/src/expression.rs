//! Rule-expression parsing.
//!
//! A rule field is written either as one delimited string
//! (`"required|between:1,10"`) or as a list of tokens
//! (`["required", "between:1,10"]`). Each token is a rule name optionally
//! followed by `:` and a comma-separated parameter list.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Separates rule tokens inside a delimited rule string.
pub const RULE_SEPARATOR: char = '|';

/// Separates a rule name from its parameter list.
pub const PARAMETER_MARKER: char = ':';

/// Separates individual parameters.
pub const PARAMETER_SEPARATOR: char = ',';

/// Rules whose parameter text is passed through as a single parameter.
///
/// A regular expression may legitimately contain `,`, so splitting it would
/// corrupt the pattern.
pub const RAW_PARAMETER_RULES: &[&str] = &["regex", "not_regex"];

/// Parameters of a parsed rule, stored inline for the common 0-2 case.
pub type Parameters = SmallVec<[String; 2]>;

// ============================================================================
// RULE INSTANCE
// ============================================================================

/// One parsed occurrence of a rule for one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInstance {
    name: String,
    parameters: Parameters,
}

impl RuleInstance {
    /// Creates a rule instance from a name and parameters.
    pub fn new<I, S>(name: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    /// The rule name, e.g. `between`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameters in declaration order. Always strings.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for RuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "{PARAMETER_MARKER}{}", self.parameters.join(","))?;
        }
        Ok(())
    }
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// The declared rules of one attribute, as written by the caller.
///
/// Both forms parse to the same sequence of [`RuleInstance`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `"required|min:3"`
    Delimited(String),
    /// `["required", "min:3"]`
    Tokens(Vec<String>),
}

impl RuleSpec {
    /// Parses every token in declaration order.
    #[must_use]
    pub fn parse(&self) -> Vec<RuleInstance> {
        match self {
            Self::Delimited(rules) => parse_rules(rules),
            Self::Tokens(tokens) => tokens
                .iter()
                .map(|token| token.trim())
                .filter(|token| !token.is_empty())
                .map(parse_rule)
                .collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(rules: &str) -> Self {
        Self::Delimited(rules.to_owned())
    }
}

impl From<String> for RuleSpec {
    fn from(rules: String) -> Self {
        Self::Delimited(rules)
    }
}

impl<S: Into<String>> From<Vec<S>> for RuleSpec {
    fn from(tokens: Vec<S>) -> Self {
        Self::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for RuleSpec {
    fn from(tokens: [S; N]) -> Self {
        Self::Tokens(tokens.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parses a single rule token.
///
/// # Examples
///
/// ```
/// use rulekit_validator::expression::parse_rule;
///
/// let rule = parse_rule("between:1,10");
/// assert_eq!(rule.name(), "between");
/// assert_eq!(rule.parameters(), ["1", "10"]);
///
/// assert!(parse_rule("required").parameters().is_empty());
/// ```
#[must_use]
pub fn parse_rule(token: &str) -> RuleInstance {
    let token = token.trim();
    let Some((name, raw)) = token.split_once(PARAMETER_MARKER) else {
        return RuleInstance::new(token, std::iter::empty::<String>());
    };

    let parameters: Parameters = if RAW_PARAMETER_RULES.contains(&name) {
        std::iter::once(raw.to_owned()).collect()
    } else {
        raw.split(PARAMETER_SEPARATOR).map(str::to_owned).collect()
    };

    RuleInstance { name: name.to_owned(), parameters }
}

/// Parses a `|`-delimited rule string, skipping empty tokens.
#[must_use]
pub fn parse_rules(rules: &str) -> Vec<RuleInstance> {
    rules
        .split(RULE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_rule)
        .collect()
}

//! String format rules: `email`, `alpha`, `alpha_num`, `alpha_dash`, `regex`.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::{builtin, text};
use crate::registry::{RuleDefinition, RuleTarget};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// Upper bound on compiled `regex:` patterns kept per registry.
const MAX_PATTERN_CACHE_SIZE: usize = 100;

pub(super) fn definitions() -> Vec<RuleDefinition> {
    let patterns = PatternCache::default();

    vec![
        builtin("email", "The :attribute format is invalid.", email),
        builtin(
            "alpha",
            "The :attribute field must contain only alphabetic characters.",
            alpha,
        ),
        builtin("alpha_num", "The :attribute field must be alphanumeric.", alpha_num),
        builtin(
            "alpha_dash",
            "The :attribute field may only contain alpha-numeric characters, as well as dashes and underscores.",
            alpha_dash,
        ),
        RuleDefinition::new("regex", move |value, parameters, target| {
            patterns.matches(value, parameters, target)
        })
        .with_message("The :attribute format is invalid."),
    ]
}

/// An email address with a dotted domain.
pub fn email(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

/// Non-empty string of letters.
pub fn alpha(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    non_empty_all(value, char::is_alphabetic)
}

/// Non-empty string of letters and digits, or a number.
pub fn alpha_num(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    value.is_number() || non_empty_all(value, char::is_alphanumeric)
}

/// Letters, digits, `-` and `_`, or a number.
pub fn alpha_dash(value: &Value, _: &[String], _: &RuleTarget<'_>) -> bool {
    value.is_number()
        || non_empty_all(value, |c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// The `regex` rule: `regex:PATTERN` or `regex:/PATTERN/FLAGS`. Only the
/// `i` flag is honoured.
///
/// Patterns are compiled on first use and reused for later evaluations.
/// An invalid pattern fails the rule and is logged.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl PatternCache {
    /// Evaluates `regex:<parameters[0]>` against the value's text form.
    pub fn matches(&self, value: &Value, parameters: &[String], target: &RuleTarget<'_>) -> bool {
        let Some(raw) = parameters.first() else {
            return false;
        };
        match self.compile(raw) {
            Ok(re) => text(value).is_some_and(|s| re.is_match(&s)),
            Err(err) => {
                warn!(attribute = target.attribute(), pattern = %raw, error = %err, "invalid regex rule");
                false
            }
        }
    }

    /// Number of compiled patterns held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.lock().len()
    }

    /// Returns true if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.lock().is_empty()
    }

    fn compile(&self, raw: &str) -> Result<Regex, regex::Error> {
        let mut compiled = self.compiled.lock();
        if let Some(re) = compiled.get(raw) {
            return Ok(re.clone());
        }

        let re = Regex::new(&compile_pattern(raw))?;
        if compiled.len() >= MAX_PATTERN_CACHE_SIZE {
            if let Some(key) = compiled.keys().next().cloned() {
                compiled.remove(&key);
            }
        }
        compiled.insert(raw.to_owned(), re.clone());
        Ok(re)
    }
}

/// Turns `/body/flags` into an inline-flag pattern; anything else is used
/// as written.
fn compile_pattern(raw: &str) -> String {
    if let Some(stripped) = raw.strip_prefix('/') {
        if let Some(end) = stripped.rfind('/') {
            let (body, flags) = (&stripped[..end], &stripped[end + 1..]);
            return if flags.contains('i') {
                format!("(?i){body}")
            } else {
                body.to_owned()
            };
        }
    }
    raw.to_owned()
}

fn non_empty_all(value: &Value, f: impl Fn(char) -> bool) -> bool {
    value
        .as_str()
        .is_some_and(|s| !s.is_empty() && s.chars().all(f))
}

//! Attribute display names.
//!
//! Raw attribute keys (`orderFrom`, `billing.zip_code`) are turned into the
//! words shown inside messages. Explicit names always win over formatting.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom default transform from a raw key to a display name.
pub type AttributeFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Resolves attribute keys to human-friendly names.
#[derive(Clone, Default)]
pub struct AttributeNames {
    names: HashMap<String, String>,
    formatter: Option<AttributeFormatter>,
}

impl AttributeNames {
    /// Creates an empty resolver that uses [`format_attribute`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges explicit display names. Later entries override earlier ones.
    pub fn extend<I, K, V>(&mut self, names: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.names
            .extend(names.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Replaces the default transform used for keys without an explicit name.
    pub fn set_formatter(&mut self, formatter: AttributeFormatter) {
        self.formatter = Some(formatter);
    }

    /// Returns the display name for `key`.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        if let Some(name) = self.names.get(key) {
            return name.clone();
        }
        match &self.formatter {
            Some(formatter) => formatter(key),
            None => format_attribute(key),
        }
    }

    /// Returns the explicit name for `key`, if one was set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }
}

impl fmt::Debug for AttributeNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeNames")
            .field("names", &self.names)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Default display transform.
///
/// Splits on `_`, `-`, `.`, whitespace and camelCase boundaries, drops path
/// syntax (`[`, `]`, `*`), lowercases, and joins words with single spaces.
///
/// # Examples
///
/// ```
/// use rulekit_validator::attribute::format_attribute;
///
/// assert_eq!(format_attribute("orderFrom"), "order from");
/// assert_eq!(format_attribute("first_name"), "first name");
/// assert_eq!(format_attribute("items[0].sku"), "items 0 sku");
/// ```
#[must_use]
pub fn format_attribute(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in key.chars() {
        if matches!(ch, '_' | '-' | '.' | '[' | ']' | '*') || ch.is_whitespace() {
            flush(&mut words, &mut current);
            prev = None;
            continue;
        }
        // Acronym runs (`HTTPStatus`) stay one word.
        if ch.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            flush(&mut words, &mut current);
        }
        current.extend(ch.to_lowercase());
        prev = Some(ch);
    }
    flush(&mut words, &mut current);

    words.join(" ")
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

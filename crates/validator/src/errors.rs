//! The error bag: rendered failure messages per attribute.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered collection of rendered failure messages.
///
/// Attributes appear in the order they first failed. Messages of one
/// attribute appear in rule evaluation order. An attribute is present only if
/// at least one of its rules failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBag {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// The first message for `attribute`.
    #[must_use]
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.errors
            .get(attribute)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Every message for `attribute`, empty if it passed.
    #[must_use]
    pub fn get(&self, attribute: &str) -> &[String] {
        self.errors
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if `attribute` has at least one message.
    #[must_use]
    pub fn has(&self, attribute: &str) -> bool {
        self.errors.contains_key(attribute)
    }

    /// All messages, keyed by attribute.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Total number of messages across attributes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Returns true if no attribute failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates `(attribute, messages)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(attribute, messages)| (attribute.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.count())?;
        for (attribute, messages) in self.iter() {
            for message in messages {
                writeln!(f, "  [{attribute}] {message}")?;
            }
        }
        Ok(())
    }
}

//! Prelude module for convenient imports.
//!
//! ```
//! use rulekit_validator::prelude::*;
//!
//! let registry = Registry::with_builtins();
//! let mut validator = Validator::new(&registry, serde_json::json!({}), [("name", "present")]);
//! assert!(validator.fails().unwrap());
//! ```

// ============================================================================
// SESSION
// ============================================================================

pub use crate::config::{StopOnError, ValidatorConfig};
pub use crate::errors::ErrorBag;
pub use crate::session::Validator;

// ============================================================================
// RULES
// ============================================================================

pub use crate::error::RuleError;
pub use crate::expression::{RuleInstance, RuleSpec};
pub use crate::message::ReplacerContext;
pub use crate::registry::{
    Predicate, Registry, Replacer, RuleDefinition, RuleTarget, Truthy, predicate, replacer,
};

//! # rulekit-validator
//!
//! A rule-string validation engine with templated error messages.
//!
//! Attributes of a JSON input are validated against compact rule strings such
//! as `"required|string|min:5"`. Rules are plain predicates held by a
//! [`Registry`]; a [`Validator`] session evaluates them and collects rendered
//! messages into an [`ErrorBag`].
//!
//! ## Quick Start
//!
//! ```
//! use rulekit_validator::{Registry, Validator};
//! use serde_json::json;
//!
//! let mut registry = Registry::with_builtins();
//! registry
//!     .register_with(
//!         "telephone",
//!         |value, _, _| {
//!             value
//!                 .as_str()
//!                 .is_some_and(|s| s.len() == 12 && s.as_bytes()[3] == b'-' && s.as_bytes()[7] == b'-')
//!         },
//!         Some("The :attribute phone number is not in the format XXX-XXX-XXXX."),
//!         None,
//!     )
//!     .unwrap();
//!
//! let mut validator = Validator::new(
//!     &registry,
//!     json!({ "phone": "5551234567" }),
//!     [("phone", "required|telephone")],
//! );
//!
//! assert!(validator.fails().unwrap());
//! assert_eq!(
//!     validator.errors().first("phone"),
//!     Some("The phone phone number is not in the format XXX-XXX-XXXX.")
//! );
//! ```
//!
//! ## Modules
//!
//! - [`expression`]: rule-string parsing
//! - [`registry`]: rule definitions and lookup
//! - [`session`]: the [`Validator`] session
//! - [`message`]: template selection and placeholder substitution
//! - [`attribute`]: attribute display names
//! - [`input`]: dot-path lookup and wildcard expansion
//! - [`rules`]: the built-in rule pack

pub mod attribute;
pub mod config;
pub mod error;
pub mod errors;
pub mod expression;
pub mod input;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod session;

pub use config::{StopOnError, ValidatorConfig};
pub use error::RuleError;
pub use errors::ErrorBag;
pub use expression::{RuleInstance, RuleSpec};
pub use registry::{Registry, RuleDefinition, RuleTarget, predicate, replacer};
pub use session::Validator;

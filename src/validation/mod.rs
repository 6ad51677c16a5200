//! Validation of feedback comments.
//!
//! Comment rules use Stillwater's `Validation` type so that every broken rule
//! is reported in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use cluster_feedback::validation::{CommentRules, CommentViolation};
//! use stillwater::Validation;
//!
//! let rules = CommentRules::new().max_chars(10);
//!
//! assert_eq!(
//!     rules.validate("  too vague  "),
//!     Validation::Success("too vague".to_string())
//! );
//! assert!(rules.validate("   ").is_failure());
//! ```

pub mod rules;
pub mod violations;

pub use rules::{CommentRules, CommentValidation};
pub use violations::CommentViolation;

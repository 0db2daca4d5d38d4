//! Snapshot canonicalization.
//!
//! Turns JSON snapshots into an order-normalized form so that two snapshots
//! of the same remote state compare equal regardless of key order, and,
//! when the rule says so, regardless of sequence order.
//!
//! ## Entry points
//!
//! ```
//! use ovhapi_core::canonical::{canonicalize, snapshots_differ, CanonicalRule};
//! use serde_json::json;
//!
//! let rule = CanonicalRule::new();
//! assert!(!snapshots_differ(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1}), &rule));
//! assert_eq!(canonicalize(&json!({"b": 2, "a": 1}), &rule).to_value(), json!({"a": 1, "b": 2}));
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotence**: canonicalizing a canonical form's value yields the same form.
//! - **Key order**: never significant.
//! - **Sequence order**: significant unless sorted by the rule. Sorting discards
//!   element order, so `[1, 2]` and `[2, 1]` compare equal under it.

pub mod diff;
pub mod model;
pub mod rule;

pub use diff::{changed_paths, ChangeKind, PathChange};
pub use model::{canonicalize, Canonical};
pub use rule::{CanonicalRule, FieldPointer, SequenceOrder};

use serde_json::Value;

/// True when the two snapshots are not equivalent under `rule`
pub fn snapshots_differ(before: &Value, after: &Value, rule: &CanonicalRule) -> bool {
    canonicalize(before, rule) != canonicalize(after, rule)
}

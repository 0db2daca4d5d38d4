//! Invocation outcome
//!
//! Built once per invocation and rendered as the module's JSON result.

use crate::detector::Detection;
use crate::errors::{ExError, ExErrorKind};
use serde_json::{json, Map, Value};

/// Message when no API client backend is available
pub const MSG_DEPENDENCY_MISSING: &str = "ovh required for this module";

/// Message for failures that have no more specific category
pub const MSG_INTERNAL: &str = "Internal ovh_api module error";

/// Message when the module is run in check mode
pub const MSG_CHECK_MODE: &str = "remote module (ovh_api) does not support check mode";

/// Prefix of every API-layer failure message
pub const API_ERROR_PREFIX: &str = "OVH API Error: ";

/// Result of one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success {
        changed: bool,
        result: Value,
        /// `(before, after)` snapshots, reported when diff mode is on
        diff: Option<(Value, Value)>,
    },
    Skipped {
        msg: String,
    },
    Failure {
        msg: String,
    },
}

impl Outcome {
    /// Success outcome from a detection, keeping snapshots only if `with_diff`
    pub fn from_detection(detection: Detection, with_diff: bool) -> Self {
        let diff = match (with_diff, detection.before, detection.after) {
            (true, Some(before), Some(after)) => Some((before, after)),
            _ => None,
        };
        Outcome::Success {
            changed: detection.changed,
            result: detection.result,
            diff,
        }
    }

    /// Failure outcome with the message for the error's category
    pub fn from_error(err: &ExError) -> Self {
        let msg = match err.kind() {
            ExErrorKind::DependencyMissing => MSG_DEPENDENCY_MISSING.to_string(),
            kind if kind.is_api_error() => format!("{}{}", API_ERROR_PREFIX, err.api_message()),
            kind if kind.is_input_error() => err.message().to_string(),
            _ => MSG_INTERNAL.to_string(),
        };
        Outcome::Failure { msg }
    }

    pub fn skipped_check_mode() -> Self {
        Outcome::Skipped {
            msg: MSG_CHECK_MODE.to_string(),
        }
    }

    /// `changed` as reported; always false for skipped and failed runs
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Success { changed: true, .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// Render the module result object
    pub fn to_module_json(&self) -> Value {
        let mut out = Map::new();
        match self {
            Outcome::Success {
                changed,
                result,
                diff,
            } => {
                out.insert("changed".to_string(), Value::Bool(*changed));
                out.insert("result".to_string(), result.clone());
                if let Some((before, after)) = diff {
                    out.insert("diff".to_string(), json!({"before": before, "after": after}));
                }
            }
            Outcome::Skipped { msg } => {
                out.insert("skipped".to_string(), Value::Bool(true));
                out.insert("changed".to_string(), Value::Bool(false));
                out.insert("msg".to_string(), Value::String(msg.clone()));
            }
            Outcome::Failure { msg } => {
                out.insert("failed".to_string(), Value::Bool(true));
                out.insert("changed".to_string(), Value::Bool(false));
                out.insert("msg".to_string(), Value::String(msg.clone()));
            }
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json_has_changed_and_result() {
        let outcome = Outcome::Success {
            changed: true,
            result: json!({"id": 1}),
            diff: None,
        };
        assert_eq!(
            outcome.to_module_json(),
            json!({"changed": true, "result": {"id": 1}})
        );
        assert!(outcome.changed());
    }

    #[test]
    fn test_success_json_with_diff() {
        let detection = Detection {
            changed: true,
            result: Value::Null,
            before: Some(json!({"reverse": "old"})),
            after: Some(json!({"reverse": "new"})),
        };
        let json = Outcome::from_detection(detection, true).to_module_json();
        assert_eq!(json["diff"]["before"], json!({"reverse": "old"}));
        assert_eq!(json["diff"]["after"], json!({"reverse": "new"}));
    }

    #[test]
    fn test_diff_omitted_when_not_requested() {
        let detection = Detection {
            changed: false,
            result: json!([]),
            before: Some(json!({})),
            after: Some(json!({})),
        };
        let json = Outcome::from_detection(detection, false).to_module_json();
        assert!(json.get("diff").is_none());
    }

    #[test]
    fn test_api_error_message_is_prefixed() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_message("This service does not exist")
            .with_query_id("EU.ext-1.abc");
        let outcome = Outcome::from_error(&err);
        assert_eq!(
            outcome,
            Outcome::Failure {
                msg: "OVH API Error: This service does not exist \nOVH-Query-ID: EU.ext-1.abc"
                    .to_string()
            }
        );
        assert!(!outcome.changed());
    }

    #[test]
    fn test_dependency_missing_message_is_fixed() {
        let err = ExError::new(ExErrorKind::DependencyMissing).with_message("no backend");
        assert_eq!(
            Outcome::from_error(&err).to_module_json(),
            json!({"failed": true, "changed": false, "msg": "ovh required for this module"})
        );
    }

    #[test]
    fn test_input_error_keeps_its_message() {
        let err = ExError::new(ExErrorKind::InvalidInput)
            .with_message("missing required arguments: path");
        assert_eq!(
            Outcome::from_error(&err),
            Outcome::Failure {
                msg: "missing required arguments: path".to_string()
            }
        );
    }

    #[test]
    fn test_internal_error_message_hides_details() {
        let err = ExError::new(ExErrorKind::Internal).with_message("index out of bounds");
        assert_eq!(
            Outcome::from_error(&err),
            Outcome::Failure {
                msg: MSG_INTERNAL.to_string()
            }
        );
        let err = ExError::new(ExErrorKind::Serialization).with_message("eof");
        assert!(Outcome::from_error(&err).is_failure());
    }

    #[test]
    fn test_skipped_json() {
        assert_eq!(
            Outcome::skipped_check_mode().to_module_json(),
            json!({"skipped": true, "changed": false, "msg": MSG_CHECK_MODE})
        );
    }
}

//! Invocation harness
//!
//! Turns module arguments into a [`Request`], runs it through the
//! [`ChangeDetector`] and always produces an [`Outcome`]. Errors and panics
//! never escape [`invoke`].
//!
//! ## Logging Ownership
//!
//! `invoke` owns lifecycle logging for the `invoke` operation. Credentials
//! are held as `Sensitive` values and are never logged.

use crate::canonical::{CanonicalRule, SequenceOrder};
use crate::client::ClientBackend;
use crate::detector::ChangeDetector;
use crate::errors::{ExError, ExErrorKind, InvocationError, Result};
use crate::outcome::Outcome;
use crate::request::{CredentialOverrides, Request, Verb};
use crate::{log_op_end, log_op_error, log_op_start};
use ovhapi_core_types::{RequestContext, Sensitive};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

const CHECK_MODE_KEY: &str = "_ansible_check_mode";

/// Module parameters as received from the automation framework
///
/// Unknown keys, including other `_ansible_*` keys, are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleParams {
    pub path: Option<String>,
    #[serde(alias = "action")]
    pub method: Option<String>,
    #[serde(alias = "data")]
    pub body: Option<Value>,
    pub endpoint: Option<String>,
    pub application_key: Option<Sensitive<String>>,
    pub application_secret: Option<Sensitive<String>>,
    pub consumer_key: Option<Sensitive<String>>,
    pub detect_changes: Option<bool>,
    pub unordered_lists: Option<bool>,
    pub unordered_fields: Option<Vec<String>>,
    #[serde(rename = "_ansible_check_mode")]
    pub check_mode: Option<bool>,
    #[serde(rename = "_ansible_diff")]
    pub diff: Option<bool>,
}

impl ModuleParams {
    /// Decode parameters from a JSON mapping
    ///
    /// # Errors
    ///
    /// - `ArgumentsNotAMapping`: `args` is not a JSON object
    /// - `MalformedArguments`: a parameter has the wrong type
    pub fn from_value(args: &Value) -> std::result::Result<Self, InvocationError> {
        if !args.is_object() {
            return Err(InvocationError::ArgumentsNotAMapping {
                found: json_type(args).to_string(),
            });
        }
        Self::deserialize(args).map_err(|e| InvocationError::MalformedArguments {
            reason: e.to_string(),
        })
    }

    /// Path, verb and body of the call
    ///
    /// # Errors
    ///
    /// - `MissingPath`: `path` absent or empty
    /// - `InvalidMethod`: `method` is not GET, POST, PUT or DELETE
    /// - `InvalidBody`: `body` is not a mapping
    pub fn request(&self) -> std::result::Result<Request, InvocationError> {
        let path = match self.path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => return Err(InvocationError::MissingPath),
        };
        let verb = match self.method.as_deref() {
            Some(method) => method.parse::<Verb>()?,
            None => Verb::default(),
        };
        let body = parse_body(self.body.as_ref())?;
        Ok(Request::new(verb, path).with_body(body))
    }

    /// Explicit endpoint and credentials; unset ones are resolved later
    pub fn credentials(&self) -> CredentialOverrides {
        CredentialOverrides {
            endpoint: self.endpoint.clone().filter(|e| !e.is_empty()),
            application_key: self.application_key.clone().filter(|k| !k.is_empty()),
            application_secret: self.application_secret.clone().filter(|k| !k.is_empty()),
            consumer_key: self.consumer_key.clone().filter(|k| !k.is_empty()),
        }
    }

    /// Canonicalization rule for snapshot comparison
    ///
    /// # Errors
    ///
    /// Returns `InvalidPointer` for a malformed `unordered_fields` entry.
    pub fn rule(&self) -> std::result::Result<CanonicalRule, InvocationError> {
        let order = if self.unordered_lists.unwrap_or(false) {
            SequenceOrder::Sorted
        } else {
            SequenceOrder::Preserved
        };
        self.unordered_fields
            .iter()
            .flatten()
            .try_fold(CanonicalRule::new().with_sequences(order), |rule, pointer| {
                rule.with_unordered_field(pointer)
            })
    }

    pub fn detect_changes(&self) -> bool {
        self.detect_changes.unwrap_or(true)
    }

    pub fn diff_mode(&self) -> bool {
        self.diff.unwrap_or(false)
    }
}

/// Body as a parameter mapping
///
/// Null and absent bodies are empty. A string is decoded as JSON.
fn parse_body(body: Option<&Value>) -> std::result::Result<Map<String, Value>, InvocationError> {
    match body {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(Map::new()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(Value::Null) => Ok(Map::new()),
            Ok(other) => Err(InvocationError::InvalidBody {
                reason: format!("decoded string is {}", json_type(&other)),
            }),
            Err(e) => Err(InvocationError::InvalidBody {
                reason: e.to_string(),
            }),
        },
        Some(other) => Err(InvocationError::InvalidBody {
            reason: format!("got {}", json_type(other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Run one module invocation
///
/// `backend` is `None` when no API client library is available; the
/// invocation then fails before any argument is read.
pub fn invoke(
    args: &Value,
    backend: Option<&dyn ClientBackend>,
    ctx: &RequestContext,
) -> Outcome {
    log_op_start!(
        "invoke",
        request_id = %ctx.request_id,
        origin = ctx.origin_or_default()
    );
    let start = Instant::now();

    let outcome = match backend {
        None => Err(ExError::new(ExErrorKind::DependencyMissing)
            .with_op("invoke")
            .with_message("no API client backend available")),
        Some(backend) => match catch_unwind(AssertUnwindSafe(|| run(args, backend))) {
            Ok(result) => result,
            Err(_) => Err(ExError::new(ExErrorKind::Internal)
                .with_op("invoke")
                .with_message("panic during invocation")),
        },
    };

    match outcome {
        Ok(outcome) => {
            log_op_end!(
                "invoke",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id,
                changed = outcome.changed()
            );
            outcome
        }
        Err(err) => {
            log_op_error!(
                "invoke",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            Outcome::from_error(&err)
        }
    }
}

fn run(args: &Value, backend: &dyn ClientBackend) -> Result<Outcome> {
    if args.get(CHECK_MODE_KEY).and_then(Value::as_bool) == Some(true) {
        return Ok(Outcome::skipped_check_mode());
    }

    let params = ModuleParams::from_value(args)?;
    let request = params.request()?;
    let rule = params.rule()?;

    let client = backend.connect(&params.credentials())?;
    let mut detector = ChangeDetector::new(client.as_ref()).with_rule(rule);
    if !params.detect_changes() {
        detector = detector.assume_mutations_change();
    }

    let detection = detector.execute(&request)?;
    Ok(Outcome::from_detection(detection, params.diff_mode()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aliases_accepted() {
        let params =
            ModuleParams::from_value(&json!({"path": "/me", "action": "post", "data": {"a": 1}}))
                .unwrap();
        let request = params.request().unwrap();
        assert_eq!(request.verb, Verb::Post);
        assert_eq!(request.body.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_defaults() {
        let params = ModuleParams::from_value(&json!({"path": "/me"})).unwrap();
        let request = params.request().unwrap();
        assert_eq!(request.verb, Verb::Get);
        assert!(request.body.is_empty());
        assert!(params.detect_changes());
        assert!(!params.diff_mode());
        assert_eq!(params.rule().unwrap(), CanonicalRule::new());
        assert!(params.credentials().is_empty());
    }

    #[test]
    fn test_null_parameters_take_defaults() {
        let params = ModuleParams::from_value(&json!({
            "path": "/me",
            "method": null,
            "body": null,
            "endpoint": null,
            "detect_changes": null
        }))
        .unwrap();
        assert_eq!(params.request().unwrap().verb, Verb::Get);
        assert!(params.detect_changes());
    }

    #[test]
    fn test_missing_or_empty_path_rejected() {
        let params = ModuleParams::from_value(&json!({"method": "GET"})).unwrap();
        assert_eq!(params.request().unwrap_err(), InvocationError::MissingPath);
        let params = ModuleParams::from_value(&json!({"path": ""})).unwrap();
        assert_eq!(params.request().unwrap_err(), InvocationError::MissingPath);
    }

    #[test]
    fn test_unknown_method_rejected() {
        let params = ModuleParams::from_value(&json!({"path": "/me", "method": "PATCH"})).unwrap();
        assert!(matches!(
            params.request(),
            Err(InvocationError::InvalidMethod { .. })
        ));
    }

    #[test]
    fn test_string_body_decoded() {
        let params =
            ModuleParams::from_value(&json!({"path": "/x", "body": "{\"ipReverse\": \"y\"}"}))
                .unwrap();
        assert_eq!(
            params.request().unwrap().body.get("ipReverse"),
            Some(&json!("y"))
        );
    }

    #[test]
    fn test_non_mapping_body_rejected() {
        for body in [json!([1, 2]), json!(3), json!("[1]"), json!("{not json")] {
            let params = ModuleParams::from_value(&json!({"path": "/x", "body": body})).unwrap();
            assert!(matches!(
                params.request(),
                Err(InvocationError::InvalidBody { .. })
            ));
        }
    }

    #[test]
    fn test_arguments_must_be_mapping() {
        assert_eq!(
            ModuleParams::from_value(&json!(["path"])).unwrap_err(),
            InvocationError::ArgumentsNotAMapping {
                found: "list".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_parameter_type_is_malformed() {
        assert!(matches!(
            ModuleParams::from_value(&json!({"path": "/x", "detect_changes": "maybe"})),
            Err(InvocationError::MalformedArguments { .. })
        ));
    }

    #[test]
    fn test_rule_from_parameters() {
        let params = ModuleParams::from_value(&json!({
            "path": "/x",
            "unordered_lists": true,
        }))
        .unwrap();
        assert_eq!(params.rule().unwrap().sequences(), SequenceOrder::Sorted);

        let params = ModuleParams::from_value(&json!({
            "path": "/x",
            "unordered_fields": ["/records", "/servers/*/ips"],
        }))
        .unwrap();
        let rule = params.rule().unwrap();
        assert_eq!(rule.sequences(), SequenceOrder::Preserved);
        assert_eq!(rule.unordered_fields().len(), 2);

        let params = ModuleParams::from_value(&json!({
            "path": "/x",
            "unordered_fields": ["records"],
        }))
        .unwrap();
        assert!(params.rule().is_err());
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let params = ModuleParams::from_value(&json!({
            "path": "/me",
            "endpoint": "ovh-eu",
            "application_key": "AK-visible-nowhere",
            "application_secret": "AS-visible-nowhere",
            "consumer_key": "CK-visible-nowhere",
        }))
        .unwrap();
        let rendered = format!("{:?}", params);
        assert!(!rendered.contains("visible-nowhere"));

        let creds = params.credentials();
        assert_eq!(creds.endpoint.as_deref(), Some("ovh-eu"));
        assert_eq!(
            creds.consumer_key.as_ref().map(|k| k.expose().as_str()),
            Some("CK-visible-nowhere")
        );
    }

    #[test]
    fn test_empty_credentials_treated_as_unset() {
        let params = ModuleParams::from_value(&json!({
            "path": "/me",
            "endpoint": "",
            "application_key": "",
        }))
        .unwrap();
        assert!(params.credentials().is_empty());
    }

    #[test]
    fn test_missing_backend_fails_before_reading_arguments() {
        let outcome = invoke(&json!("not even a mapping"), None, &RequestContext::new());
        assert_eq!(
            outcome,
            Outcome::Failure {
                msg: crate::outcome::MSG_DEPENDENCY_MISSING.to_string()
            }
        );
    }
}

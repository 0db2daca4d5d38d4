#![allow(clippy::unwrap_used, clippy::expect_used)]

use ovhapi_core::errors::{ExError, ExErrorKind, InvocationError};
use ovhapi_core::outcome::API_ERROR_PREFIX;
use ovhapi_core::Outcome;

#[test]
fn test_every_api_kind_maps_to_prefixed_message() {
    let api_kinds = [
        ExErrorKind::InvalidRegion,
        ExErrorKind::InvalidKey,
        ExErrorKind::BadParameters,
        ExErrorKind::NotFound,
        ExErrorKind::Conflict,
        ExErrorKind::NotGranted,
        ExErrorKind::InvalidCredential,
        ExErrorKind::HttpError,
        ExErrorKind::Network,
        ExErrorKind::InvalidResponse,
    ];
    for kind in api_kinds {
        assert!(kind.is_api_error(), "{:?}", kind);
        let err = ExError::new(kind).with_message("boom");
        match Outcome::from_error(&err) {
            Outcome::Failure { msg } => assert_eq!(msg, format!("{}boom", API_ERROR_PREFIX)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}

#[test]
fn test_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidInput,
        ExErrorKind::InvalidMethod,
        ExErrorKind::InvalidBody,
        ExErrorKind::DependencyMissing,
        ExErrorKind::InvalidRegion,
        ExErrorKind::InvalidKey,
        ExErrorKind::BadParameters,
        ExErrorKind::NotFound,
        ExErrorKind::Conflict,
        ExErrorKind::NotGranted,
        ExErrorKind::InvalidCredential,
        ExErrorKind::HttpError,
        ExErrorKind::Network,
        ExErrorKind::InvalidResponse,
        ExErrorKind::Serialization,
        ExErrorKind::Internal,
    ];
    let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}

#[test]
fn test_invocation_error_conversion() {
    let err: ExError = InvocationError::MissingPath.into();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.op(), Some("parse_arguments"));
    assert_eq!(err.message(), "missing required arguments: path");

    let err: ExError = InvocationError::InvalidMethod {
        method: "HEAD".to_string(),
    }
    .into();
    assert_eq!(err.kind(), ExErrorKind::InvalidMethod);
    assert!(err.kind().is_input_error());
}

#[test]
fn test_display_carries_request_context() {
    let err = ExError::new(ExErrorKind::Conflict)
        .with_op("api_call")
        .with_verb("POST")
        .with_path("/domain/zone/example.com/record")
        .with_status(409)
        .with_message("Record already exists");
    let rendered = err.to_string();
    assert!(rendered.contains("ERR_CONFLICT"));
    assert!(rendered.contains("POST /domain/zone/example.com/record"));
    assert!(rendered.contains("409"));
}

#[test]
fn test_serde_error_converts_to_serialization() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ExError = parse_err.into();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
    assert!(!err.kind().is_api_error());
}

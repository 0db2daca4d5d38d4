//! Error handling for ovhapi-client
//!
//! `ClientError` describes what went wrong talking to the API; it converts
//! into the core `ExError` so the harness can classify it.

use ovhapi_core::errors::{ExError, ExErrorKind};
use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of the OVH client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Endpoint is neither a known name nor a URL
    #[error("Unknown endpoint {endpoint}. Valid endpoints: {}", crate::endpoints::known_names())]
    InvalidRegion { endpoint: String },

    /// No endpoint configured anywhere
    #[error("No endpoint configured. Valid endpoints: {}", crate::endpoints::known_names())]
    MissingEndpoint,

    /// A credential is missing after resolution
    #[error("Invalid {field}: not set by parameter, environment or configuration file")]
    InvalidKey { field: &'static str },

    /// A configuration file could not be read
    #[error("Cannot read OVH configuration: {reason}")]
    Config { reason: String },

    /// Path and parameters do not form a valid URL
    #[error("Invalid request path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The API answered with an error status
    #[error("{message}")]
    Api {
        status: u16,
        error_code: Option<String>,
        message: String,
        query_id: Option<String>,
    },

    /// Request never got an HTTP answer
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// Answer could not be decoded
    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl ClientError {
    /// Core error kind for this failure
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ClientError::InvalidRegion { .. } | ClientError::MissingEndpoint => {
                ExErrorKind::InvalidRegion
            }
            ClientError::InvalidKey { .. } | ClientError::Config { .. } => ExErrorKind::InvalidKey,
            ClientError::InvalidPath { .. } => ExErrorKind::BadParameters,
            ClientError::Network { .. } => ExErrorKind::Network,
            ClientError::InvalidResponse { .. } => ExErrorKind::InvalidResponse,
            ClientError::Api {
                status,
                error_code,
                ..
            } => match (*status, error_code.as_deref()) {
                (400, _) => ExErrorKind::BadParameters,
                (403, Some("INVALID_CREDENTIAL" | "NOT_CREDENTIAL")) => {
                    ExErrorKind::InvalidCredential
                }
                (403, _) => ExErrorKind::NotGranted,
                (404, _) => ExErrorKind::NotFound,
                (409, _) => ExErrorKind::Conflict,
                _ => ExErrorKind::HttpError,
            },
        }
    }
}

impl From<ClientError> for ExError {
    fn from(err: ClientError) -> Self {
        let mut ex = ExError::new(err.kind())
            .with_op("api_call")
            .with_message(err.to_string());
        if let ClientError::Api {
            status, query_id, ..
        } = err
        {
            ex = ex.with_status(status);
            if let Some(query_id) = query_id {
                ex = ex.with_query_id(query_id);
            }
        }
        ex
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Config {
            reason: err.to_string(),
        }
    }
}

//! Error facility
//!
//! [`ExError`] is the one error type that crosses crate boundaries. Crate
//! specific enums such as [`InvocationError`] convert into it, and the
//! outcome layer reads its [`ExErrorKind`] to pick the failure message.

use thiserror::Error;

/// Result alias over [`ExError`]
pub type Result<T> = std::result::Result<T, ExError>;

/// Classification of every failure an invocation can end with
///
/// Each kind has a stable `ERR_*` code for log events. Kinds group into
/// input errors, API errors, a missing dependency and internal faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidMethod,
    InvalidBody,

    // Collaborator availability
    DependencyMissing,

    // Client configuration (reported as API errors, like the vendor client does)
    InvalidRegion,
    InvalidKey,

    // Remote API
    BadParameters,
    NotFound,
    Conflict,
    NotGranted,
    InvalidCredential,
    HttpError,
    Network,
    InvalidResponse,

    // Local
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Stable code, e.g. `ERR_NOT_FOUND`
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidMethod => "ERR_INVALID_METHOD",
            ExErrorKind::InvalidBody => "ERR_INVALID_BODY",
            ExErrorKind::DependencyMissing => "ERR_DEPENDENCY_MISSING",
            ExErrorKind::InvalidRegion => "ERR_INVALID_REGION",
            ExErrorKind::InvalidKey => "ERR_INVALID_KEY",
            ExErrorKind::BadParameters => "ERR_BAD_PARAMETERS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::NotGranted => "ERR_NOT_GRANTED",
            ExErrorKind::InvalidCredential => "ERR_INVALID_CREDENTIAL",
            ExErrorKind::HttpError => "ERR_HTTP",
            ExErrorKind::Network => "ERR_NETWORK",
            ExErrorKind::InvalidResponse => "ERR_INVALID_RESPONSE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for every kind raised by the API client collaborator
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidRegion
                | ExErrorKind::InvalidKey
                | ExErrorKind::BadParameters
                | ExErrorKind::NotFound
                | ExErrorKind::Conflict
                | ExErrorKind::NotGranted
                | ExErrorKind::InvalidCredential
                | ExErrorKind::HttpError
                | ExErrorKind::Network
                | ExErrorKind::InvalidResponse
        )
    }

    /// True for parameter problems detected before any remote call
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput | ExErrorKind::InvalidMethod | ExErrorKind::InvalidBody
        )
    }
}

/// Structured error
///
/// Carries the kind plus the request context (verb, path,
/// HTTP status, OVH query id) needed to report and debug a failed call.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    verb: Option<String>,
    path: Option<String>,
    status: Option<u16>,
    query_id: Option<String>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            verb: None,
            path: None,
            status: None,
            query_id: None,
            message: String::new(),
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Add the OVH query id returned by the API
    pub fn with_query_id(mut self, query_id: impl Into<String>) -> Self {
        self.query_id = Some(query_id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn verb(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The collaborator's message as the vendor client renders it:
    /// the server message followed by the query id when one was returned.
    pub fn api_message(&self) -> String {
        match &self.query_id {
            Some(query_id) => format!("{} \nOVH-Query-ID: {}", self.message, query_id),
            None => self.message.clone(),
        }
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())?;
        if let Some(op) = &self.op {
            write!(f, " during {}", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let (Some(verb), Some(path)) = (&self.verb, &self.path) {
            write!(f, " ({} {})", verb, path)?;
        } else if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

/// Parameter errors raised while turning module arguments into a request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    /// Arguments are not a JSON object
    #[error("module arguments must be a mapping, got {found}")]
    ArgumentsNotAMapping { found: String },

    /// Arguments could not be decoded
    #[error("invalid module arguments: {reason}")]
    MalformedArguments { reason: String },

    /// Required `path` is absent or empty
    #[error("missing required arguments: path")]
    MissingPath,

    /// `method` is not one of GET, POST, PUT, DELETE
    #[error("value of method must be one of: GET, POST, PUT, DELETE, got: {method}")]
    InvalidMethod { method: String },

    /// `body` is neither a mapping nor a JSON string encoding one
    #[error("body must be a mapping: {reason}")]
    InvalidBody { reason: String },

    /// An `unordered_fields` entry is not a JSON pointer
    #[error("unordered_fields entry is not a JSON pointer: {pointer}")]
    InvalidPointer { pointer: String },
}

impl From<InvocationError> for ExError {
    fn from(err: InvocationError) -> Self {
        let message = err.to_string();
        let kind = match err {
            InvocationError::InvalidMethod { .. } => ExErrorKind::InvalidMethod,
            InvocationError::InvalidBody { .. } => ExErrorKind::InvalidBody,
            InvocationError::ArgumentsNotAMapping { .. }
            | InvocationError::MalformedArguments { .. }
            | InvocationError::MissingPath
            | InvocationError::InvalidPointer { .. } => ExErrorKind::InvalidInput,
        };
        ExError::new(kind)
            .with_op("parse_arguments")
            .with_message(message)
    }
}

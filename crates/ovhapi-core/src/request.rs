//! Request model
//!
//! A [`Request`] is the path, verb and body of one invocation. Credential
//! overrides travel separately in [`CredentialOverrides`] so the change
//! detector never sees them.

use crate::errors::InvocationError;
use ovhapi_core_types::Sensitive;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One of the four verbs the module accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    #[default]
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
        }
    }

    /// True for PUT, POST and DELETE
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Verb::Get)
    }

    /// True when the body travels as query parameters rather than JSON
    pub fn carries_query(&self) -> bool {
        matches!(self, Verb::Get | Verb::Delete)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = InvocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "PUT" => Ok(Verb::Put),
            "POST" => Ok(Verb::Post),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(InvocationError::InvalidMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Path, verb and call parameters of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub path: String,
    pub verb: Verb,
    pub body: Map<String, Value>,
}

impl Request {
    /// A request with an empty body
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            verb,
            body: Map::new(),
        }
    }

    /// Replace the body
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }
}

/// Endpoint and credentials passed explicitly with the invocation
///
/// Every field is optional; unset fields are resolved by the client
/// backend from the environment and configuration files.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub endpoint: Option<String>,
    pub application_key: Option<Sensitive<String>>,
    pub application_secret: Option<Sensitive<String>>,
    pub consumer_key: Option<Sensitive<String>>,
}

impl CredentialOverrides {
    /// True when nothing was supplied explicitly
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.application_key.is_none()
            && self.application_secret.is_none()
            && self.consumer_key.is_none()
    }
}

//! API client seam
//!
//! The change detector only talks to the remote API through [`ApiClient`].
//! A [`ClientBackend`] builds a client from credential overrides; the
//! invocation harness fails with the dependency-missing message when no
//! backend is available.

use crate::errors::Result;
use crate::request::{CredentialOverrides, Verb};
use serde_json::{Map, Value};

/// Authenticated access to the four verbs of a REST API
///
/// `params` are the call parameters of the invocation: query parameters
/// for GET and DELETE, the JSON body for PUT and POST.
#[cfg_attr(test, mockall::automock)]
pub trait ApiClient {
    fn get(&self, path: &str, params: &Map<String, Value>) -> Result<Value>;
    fn put(&self, path: &str, params: &Map<String, Value>) -> Result<Value>;
    fn post(&self, path: &str, params: &Map<String, Value>) -> Result<Value>;
    fn delete(&self, path: &str, params: &Map<String, Value>) -> Result<Value>;
}

/// Factory for API clients
pub trait ClientBackend {
    /// Build a client, resolving anything `overrides` leaves unset
    ///
    /// # Errors
    ///
    /// Returns an API-category error when the endpoint or the credentials
    /// cannot be resolved.
    fn connect(&self, overrides: &CredentialOverrides) -> Result<Box<dyn ApiClient>>;
}

impl Verb {
    /// Call the handler of this verb on `client`
    ///
    /// # Errors
    ///
    /// Propagates the client's error unchanged.
    pub fn dispatch(
        self,
        client: &dyn ApiClient,
        path: &str,
        params: &Map<String, Value>,
    ) -> Result<Value> {
        match self {
            Verb::Get => client.get(path, params),
            Verb::Put => client.put(path, params),
            Verb::Post => client.post(path, params),
            Verb::Delete => client.delete(path, params),
        }
    }
}

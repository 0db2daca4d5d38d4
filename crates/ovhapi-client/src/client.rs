//! Blocking OVH REST client
//!
//! Signs every call with the application and consumer keys. The server
//! clock offset is fetched from `/auth/time` on first use and reused.

use crate::credentials::Credentials;
use crate::errors::{ClientError, Result};
use crate::signature::SignedRequest;
use chrono::Utc;
use ovhapi_core::errors::ExError;
use ovhapi_core::{ApiClient, Verb};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
const QUERY_ID_HEADER: &str = "X-Ovh-QueryID";

/// Authenticated client for one endpoint
pub struct OvhClient {
    http: Client,
    credentials: Credentials,
    time_delta: OnceLock<i64>,
}

impl std::fmt::Debug for OvhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhClient")
            .field("endpoint", &self.credentials.endpoint)
            .field("base_url", &self.credentials.base_url)
            .finish_non_exhaustive()
    }
}

impl OvhClient {
    /// Build a client with the default 180 second timeout
    ///
    /// # Errors
    ///
    /// Returns `Network` if the HTTP client cannot be initialized.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("ovhapi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network {
                reason: e.to_string(),
            })?;
        Ok(Self::with_http_client(credentials, http))
    }

    pub fn with_http_client(credentials: Credentials, http: Client) -> Self {
        Self {
            http,
            credentials,
            time_delta: OnceLock::new(),
        }
    }

    /// Send one signed call and decode the answer
    ///
    /// GET and DELETE carry `params` in the query string; PUT and POST
    /// send them as a JSON body, or no body at all when `params` is empty.
    ///
    /// # Errors
    ///
    /// Returns `Api` for error statuses, `Network` when no answer arrives
    /// and `InvalidResponse` when the answer is not JSON.
    pub fn call(&self, verb: Verb, path: &str, params: &Map<String, Value>) -> Result<Value> {
        let start = Instant::now();
        let url = self.url(verb, path, params)?;
        let body = if verb.carries_query() || params.is_empty() {
            String::new()
        } else {
            Value::Object(params.clone()).to_string()
        };

        let timestamp = Utc::now().timestamp() + self.time_delta()?;
        let signature = SignedRequest {
            application_secret: self.credentials.application_secret.expose(),
            consumer_key: self.credentials.consumer_key.expose(),
            method: verb.as_str(),
            url: url.as_str(),
            body: &body,
            timestamp,
        }
        .signature();

        let mut request = self
            .http
            .request(method(verb), url)
            .header("X-Ovh-Application", self.credentials.application_key.expose())
            .header("X-Ovh-Consumer", self.credentials.consumer_key.expose())
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);
        if !body.is_empty() {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let result = request.send().map_err(network).and_then(decode);
        match &result {
            Ok(_) => tracing::debug!(
                verb = verb.as_str(),
                path,
                duration_ms = start.elapsed().as_millis() as u64,
                "OVH API call succeeded"
            ),
            Err(e) => tracing::debug!(
                verb = verb.as_str(),
                path,
                duration_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "OVH API call failed"
            ),
        }
        result
    }

    fn url(&self, verb: Verb, path: &str, params: &Map<String, Value>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.credentials.base_url, path)).map_err(
            |e| ClientError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            },
        )?;
        if verb.carries_query() && !params.is_empty() {
            url.query_pairs_mut().extend_pairs(query_pairs(params));
        }
        Ok(url)
    }

    /// Offset between the server clock and ours, in seconds
    fn time_delta(&self) -> Result<i64> {
        if let Some(delta) = self.time_delta.get() {
            return Ok(*delta);
        }
        let response = self
            .http
            .get(format!("{}/auth/time", self.credentials.base_url))
            .send()
            .map_err(network)?;
        let server_time = decode(response)?
            .as_i64()
            .ok_or_else(|| ClientError::InvalidResponse {
                reason: "/auth/time did not return an integer".to_string(),
            })?;
        let delta = server_time - Utc::now().timestamp();
        Ok(*self.time_delta.get_or_init(|| delta))
    }
}

fn method(verb: Verb) -> Method {
    match verb {
        Verb::Get => Method::GET,
        Verb::Put => Method::PUT,
        Verb::Post => Method::POST,
        Verb::Delete => Method::DELETE,
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network {
        reason: err.to_string(),
    }
}

/// Query-string pairs for GET and DELETE parameters
///
/// A single leading `_` is stripped from keys so reserved words such as
/// `from` can be passed as `_from`. Booleans render as `true`/`false`.
pub fn query_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| {
            let key = key.strip_prefix('_').unwrap_or(key).to_string();
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}

fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    let query_id = response
        .headers()
        .get(QUERY_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().map_err(network)?;

    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse {
            reason: e.to_string(),
        });
    }

    let parsed: Option<Value> = serde_json::from_str(&text).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let message = field("message")
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("HTTP error").to_string());

    Err(ClientError::Api {
        status: status.as_u16(),
        error_code: field("errorCode"),
        message,
        query_id,
    })
}

impl OvhClient {
    fn dispatch(
        &self,
        verb: Verb,
        path: &str,
        params: &Map<String, Value>,
    ) -> ovhapi_core::Result<Value> {
        self.call(verb, path, params)
            .map_err(|e| ExError::from(e).with_verb(verb.as_str()).with_path(path))
    }
}

impl ApiClient for OvhClient {
    fn get(&self, path: &str, params: &Map<String, Value>) -> ovhapi_core::Result<Value> {
        self.dispatch(Verb::Get, path, params)
    }

    fn put(&self, path: &str, params: &Map<String, Value>) -> ovhapi_core::Result<Value> {
        self.dispatch(Verb::Put, path, params)
    }

    fn post(&self, path: &str, params: &Map<String, Value>) -> ovhapi_core::Result<Value> {
        self.dispatch(Verb::Post, path, params)
    }

    fn delete(&self, path: &str, params: &Map<String, Value>) -> ovhapi_core::Result<Value> {
        self.dispatch(Verb::Delete, path, params)
    }
}

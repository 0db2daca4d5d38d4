//! Change detector
//!
//! Runs one request against an [`ApiClient`] and decides `changed`:
//!
//! - GET: a single call, never a change.
//! - PUT/POST/DELETE: GET the path, run the mutation, GET the path again,
//!   and report a change when the canonical snapshots differ.
//!
//! Any client error aborts the sequence and is returned unchanged, including
//! a failed verification GET after a mutation that may have been applied.
//!
//! ## Logging Ownership
//!
//! The detector owns lifecycle logging for `detect_change`; the individual
//! remote calls are logged at debug level.

use crate::canonical::{canonicalize, CanonicalRule};
use crate::client::ApiClient;
use crate::errors::Result;
use crate::request::{Request, Verb};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;
use std::time::Instant;

/// Result of a detected request
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub changed: bool,
    /// Value returned by the request's own verb
    pub result: Value,
    /// Snapshot taken before the mutation, if one was taken
    pub before: Option<Value>,
    /// Snapshot taken after the mutation, if one was taken
    pub after: Option<Value>,
}

/// Compares remote snapshots around a mutation
pub struct ChangeDetector<'a> {
    client: &'a dyn ApiClient,
    rule: CanonicalRule,
    verify: bool,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(client: &'a dyn ApiClient) -> Self {
        Self {
            client,
            rule: CanonicalRule::default(),
            verify: true,
        }
    }

    /// Compare snapshots under `rule` instead of the order-sensitive default
    pub fn with_rule(mut self, rule: CanonicalRule) -> Self {
        self.rule = rule;
        self
    }

    /// Skip the snapshots and report every mutation as a change
    pub fn assume_mutations_change(mut self) -> Self {
        self.verify = false;
        self
    }

    /// Run `request` and decide whether it changed the remote resource
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the client.
    pub fn execute(&self, request: &Request) -> Result<Detection> {
        log_op_start!(
            "detect_change",
            verb = request.verb.as_str(),
            path = request.path.as_str()
        );
        let start = Instant::now();

        let detection = self.execute_impl(request).map_err(|e| {
            log_op_error!(
                "detect_change",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                verb = request.verb.as_str()
            );
            e
        })?;

        log_op_end!(
            "detect_change",
            duration_ms = start.elapsed().as_millis() as u64,
            verb = request.verb.as_str(),
            changed = detection.changed
        );

        Ok(detection)
    }

    fn execute_impl(&self, request: &Request) -> Result<Detection> {
        if !request.verb.is_mutating() {
            let result = self.call(Verb::Get, "result", request)?;
            return Ok(Detection {
                changed: false,
                result,
                before: None,
                after: None,
            });
        }

        if !self.verify {
            let result = self.call(request.verb, "result", request)?;
            return Ok(Detection {
                changed: true,
                result,
                before: None,
                after: None,
            });
        }

        let before = self.call(Verb::Get, "before", request)?;
        let result = self.call(request.verb, "result", request)?;
        let after = self.call(Verb::Get, "after", request)?;

        let changed = canonicalize(&before, &self.rule) != canonicalize(&after, &self.rule);

        Ok(Detection {
            changed,
            result,
            before: Some(before),
            after: Some(after),
        })
    }

    fn call(&self, verb: Verb, step: &str, request: &Request) -> Result<Value> {
        tracing::debug!(step, verb = verb.as_str(), path = request.path.as_str(), "api call");
        verb.dispatch(self.client, &request.path, &request.body)
            .map_err(|e| match e.verb() {
                Some(_) => e,
                None => e.with_verb(verb.as_str()).with_path(request.path.clone()),
            })
    }
}

use ovhapi_core::errors::{ExError, Result};
use ovhapi_core::{ApiClient, ClientBackend, CredentialOverrides, Verb};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One call received by a [`ScriptedClient`]
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct Call {
    pub verb: Verb,
    pub path: String,
    pub params: Map<String, Value>,
}

#[derive(Default)]
struct Shared {
    script: VecDeque<(Verb, Result<Value>)>,
    calls: Vec<Call>,
    connects: usize,
}

/// Client and backend that answer from a fixed script
///
/// Each call pops the next `(verb, answer)` pair and panics if the verb
/// differs or the script is exhausted.
#[derive(Clone, Default)]
pub struct Scripted {
    shared: Arc<Mutex<Shared>>,
}

#[allow(dead_code)]
impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, verb: Verb, value: Value) -> Self {
        self.push(verb, Ok(value))
    }

    pub fn then_err(self, verb: Verb, err: ExError) -> Self {
        self.push(verb, Err(err))
    }

    fn push(self, verb: Verb, answer: Result<Value>) -> Self {
        self.shared.lock().unwrap().script.push_back((verb, answer));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.lock().unwrap().calls.clone()
    }

    pub fn verbs(&self) -> Vec<Verb> {
        self.calls().into_iter().map(|c| c.verb).collect()
    }

    pub fn connects(&self) -> usize {
        self.shared.lock().unwrap().connects
    }

    pub fn remaining(&self) -> usize {
        self.shared.lock().unwrap().script.len()
    }

    fn answer(&self, verb: Verb, path: &str, params: &Map<String, Value>) -> Result<Value> {
        let mut shared = self.shared.lock().unwrap();
        shared.calls.push(Call {
            verb,
            path: path.to_string(),
            params: params.clone(),
        });
        let (expected, answer) = shared
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {} {}", verb, path));
        assert_eq!(expected, verb, "unexpected verb for {}", path);
        answer
    }
}

impl ApiClient for Scripted {
    fn get(&self, path: &str, params: &Map<String, Value>) -> Result<Value> {
        self.answer(Verb::Get, path, params)
    }

    fn put(&self, path: &str, params: &Map<String, Value>) -> Result<Value> {
        self.answer(Verb::Put, path, params)
    }

    fn post(&self, path: &str, params: &Map<String, Value>) -> Result<Value> {
        self.answer(Verb::Post, path, params)
    }

    fn delete(&self, path: &str, params: &Map<String, Value>) -> Result<Value> {
        self.answer(Verb::Delete, path, params)
    }
}

impl ClientBackend for Scripted {
    fn connect(&self, _overrides: &CredentialOverrides) -> Result<Box<dyn ApiClient>> {
        self.shared.lock().unwrap().connects += 1;
        Ok(Box::new(self.clone()))
    }
}

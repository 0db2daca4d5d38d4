//! Ansible module protocol
//!
//! The arguments file holds a JSON mapping of module parameters, either
//! bare or wrapped as `{"ANSIBLE_MODULE_ARGS": {...}}`. Every run prints
//! one JSON result on stdout, including runs whose file cannot be read.

use clap::Args;
use ovhapi_core::types::RequestContext;
use ovhapi_core::{invoke, ClientBackend, Outcome};
use serde_json::Value;
use std::path::{Path, PathBuf};

const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

#[derive(Debug, Args)]
pub struct ModuleArgs {
    /// JSON file with the module arguments
    pub args_file: PathBuf,
}

pub fn execute(args: ModuleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let backend = super::backend();
    let ctx = RequestContext::new().with_origin("cli:module");
    super::print_outcome(module_outcome(&args.args_file, backend.as_deref(), &ctx))
}

/// Outcome of one module run
///
/// Without a backend the arguments file is never opened.
fn module_outcome(
    args_file: &Path,
    backend: Option<&dyn ClientBackend>,
    ctx: &RequestContext,
) -> Outcome {
    if backend.is_none() {
        return invoke(&Value::Null, None, ctx);
    }
    match load_args(args_file) {
        Ok(args) => invoke(&args, backend, ctx),
        Err(msg) => Outcome::Failure { msg },
    }
}

fn load_args(path: &Path) -> Result<Value, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read module arguments {}: {}", path.display(), e))?;
    let parsed: Value = serde_json::from_str(&raw)
        .map_err(|e| format!("module arguments are not valid JSON: {}", e))?;
    Ok(unwrap_module_args(parsed))
}

/// Strip the `ANSIBLE_MODULE_ARGS` wrapper if present
fn unwrap_module_args(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(WRAPPER_KEY) => {
            map.remove(WRAPPER_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

//! CLI subcommands

pub mod call;
pub mod compare;
pub mod module;

use ovhapi_core::types::RequestContext;
use ovhapi_core::{invoke, ClientBackend, Outcome};
use serde_json::Value;

/// The API client backend compiled into this binary, if any
#[cfg(feature = "ovh")]
fn backend() -> Option<Box<dyn ClientBackend>> {
    Some(Box::new(ovhapi_client::OvhBackend::default()))
}

#[cfg(not(feature = "ovh"))]
fn backend() -> Option<Box<dyn ClientBackend>> {
    None
}

/// Invoke the module with `args` and print its result
fn run_and_print(args: &Value, origin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let backend = backend();
    let ctx = RequestContext::new().with_origin(origin);
    print_outcome(invoke(args, backend.as_deref(), &ctx))
}

/// Print the module JSON result and fail on a failure outcome
fn print_outcome(outcome: Outcome) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(&outcome.to_module_json())?);

    match outcome {
        Outcome::Failure { msg } => Err(msg.into()),
        Outcome::Success { .. } | Outcome::Skipped { .. } => Ok(()),
    }
}

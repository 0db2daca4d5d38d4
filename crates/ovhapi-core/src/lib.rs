//! ovh_api core
//!
//! Forwards GET/PUT/POST/DELETE calls to the OVH API through an
//! [`ApiClient`] and decides whether a mutation changed the remote resource
//! by comparing canonicalized snapshots taken before and after the call.

pub mod canonical;
pub mod client;
pub mod detector;
pub mod errors;
pub mod invocation;
pub mod logging_facility;
pub mod outcome;
pub mod request;

pub use ovhapi_core_types as types;

#[doc(hidden)]
pub use tracing;

pub use canonical::{canonicalize, Canonical, CanonicalRule, SequenceOrder};
pub use client::{ApiClient, ClientBackend};
pub use detector::{ChangeDetector, Detection};
pub use errors::{ExError, ExErrorKind, InvocationError, Result};
pub use invocation::{invoke, ModuleParams};
pub use outcome::Outcome;
pub use request::{CredentialOverrides, Request, Verb};

//! OVH API client
//!
//! Blocking REST client for the OVH API: endpoint table, credential
//! resolution from parameters, environment and `ovh.conf` files, and
//! request signing. [`OvhBackend`] plugs it into the core invocation
//! harness.

pub mod backend;
pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod errors;
pub mod signature;

pub use backend::OvhBackend;
pub use client::OvhClient;
pub use credentials::{resolve, ConfigSources, Credentials};
pub use errors::ClientError;

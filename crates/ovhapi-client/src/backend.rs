//! Client backend for the invocation harness

use crate::client::OvhClient;
use crate::credentials::{resolve, ConfigSources};
use ovhapi_core::errors::ExError;
use ovhapi_core::{ApiClient, ClientBackend, CredentialOverrides};

/// Builds [`OvhClient`]s from overrides layered over `sources`
#[derive(Debug, Clone, Default)]
pub struct OvhBackend {
    sources: ConfigSources,
}

impl OvhBackend {
    pub fn new(sources: ConfigSources) -> Self {
        Self { sources }
    }
}

impl ClientBackend for OvhBackend {
    fn connect(&self, overrides: &CredentialOverrides) -> ovhapi_core::Result<Box<dyn ApiClient>> {
        let connect = || {
            let credentials = resolve(overrides, &self.sources)?;
            OvhClient::new(credentials)
        };
        let client = connect().map_err(|e| ExError::from(e).with_op("connect"))?;
        Ok(Box::new(client))
    }
}

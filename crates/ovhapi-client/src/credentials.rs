//! Credential resolution
//!
//! Each value is taken from the first source that sets it:
//!
//! 1. explicit invocation parameters,
//! 2. `OVH_ENDPOINT`, `OVH_APPLICATION_KEY`, `OVH_APPLICATION_SECRET`,
//!    `OVH_CONSUMER_KEY`,
//! 3. INI files `/etc/ovh.conf`, `~/.ovh.conf`, `./ovh.conf`, later files
//!    overriding earlier ones. `[default] endpoint` names the endpoint and
//!    the section named after it holds the keys.

use crate::endpoints;
use crate::errors::{ClientError, Result};
use config::{Config, Environment, File, FileFormat, Source, Value};
use ovhapi_core::CredentialOverrides;
use ovhapi_core_types::Sensitive;
use std::collections::HashMap;
use std::path::PathBuf;

const ENV_PREFIX: &str = "OVH";
const DEFAULT_SECTION: &str = "default";

/// Where to look for settings not passed explicitly
#[derive(Debug, Clone)]
pub struct ConfigSources {
    files: Vec<PathBuf>,
    /// `None` reads the process environment
    env: Option<HashMap<String, String>>,
}

impl ConfigSources {
    /// The standard file locations and the process environment
    pub fn system() -> Self {
        let mut files = vec![PathBuf::from("/etc/ovh.conf")];
        if let Some(home) = std::env::var_os("HOME") {
            files.push(PathBuf::from(home).join(".ovh.conf"));
        }
        files.push(PathBuf::from("ovh.conf"));
        Self { files, env: None }
    }

    /// No files and an empty environment
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            env: Some(HashMap::new()),
        }
    }

    /// Replace the configuration file list, lowest precedence first
    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    /// Use `vars` instead of the process environment
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    fn file_sections(&self) -> Result<HashMap<String, HashMap<String, String>>> {
        let mut builder = Config::builder();
        for path in &self.files {
            builder = builder.add_source(
                File::new(&path.to_string_lossy(), FileFormat::Ini).required(false),
            );
        }
        let mut sections = HashMap::new();
        for (name, value) in builder.build()?.collect()? {
            // Keys outside any section carry no OVH settings
            if let Ok(table) = value.into_table() {
                sections.insert(name, strings(table));
            }
        }
        Ok(sections)
    }

    fn env_values(&self) -> Result<HashMap<String, String>> {
        let env = Environment::with_prefix(ENV_PREFIX).source(self.env.clone());
        let collected = Config::builder().add_source(env).build()?.collect()?;
        Ok(strings(collected))
    }
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self::system()
    }
}

fn strings(table: config::Map<String, Value>) -> HashMap<String, String> {
    table
        .into_iter()
        .filter_map(|(k, v)| v.into_string().ok().map(|s| (k.to_lowercase(), s)))
        .filter(|(_, v)| !v.is_empty())
        .collect()
}

/// Fully resolved endpoint and keys
#[derive(Debug, Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub base_url: String,
    pub application_key: Sensitive<String>,
    pub application_secret: Sensitive<String>,
    pub consumer_key: Sensitive<String>,
}

/// Resolve endpoint and keys, explicit values first
///
/// # Errors
///
/// - `MissingEndpoint` / `InvalidRegion`: no usable endpoint
/// - `InvalidKey`: a key is set nowhere
/// - `Config`: a configuration file exists but cannot be parsed
pub fn resolve(overrides: &CredentialOverrides, sources: &ConfigSources) -> Result<Credentials> {
    let env = sources.env_values()?;
    let files = sources.file_sections()?;

    let endpoint = overrides
        .endpoint
        .clone()
        .or_else(|| env.get("endpoint").cloned())
        .or_else(|| {
            files
                .get(DEFAULT_SECTION)
                .and_then(|s| s.get("endpoint"))
                .cloned()
        })
        .ok_or(ClientError::MissingEndpoint)?;
    let base_url = endpoints::base_url(&endpoint)?;

    let section = files.get(&endpoint);
    let pick = |explicit: &Option<Sensitive<String>>, key: &'static str| {
        explicit
            .clone()
            .or_else(|| env.get(key).cloned().map(Sensitive::new))
            .or_else(|| section.and_then(|s| s.get(key)).cloned().map(Sensitive::new))
            .ok_or(ClientError::InvalidKey { field: key })
    };

    let credentials = Credentials {
        application_key: pick(&overrides.application_key, "application_key")?,
        application_secret: pick(&overrides.application_secret, "application_secret")?,
        consumer_key: pick(&overrides.consumer_key, "consumer_key")?,
        endpoint,
        base_url,
    };
    tracing::debug!(
        endpoint = credentials.endpoint.as_str(),
        "resolved OVH credentials"
    );
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn conf_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn explicit(endpoint: &str, key: &str) -> CredentialOverrides {
        CredentialOverrides {
            endpoint: Some(endpoint.to_string()),
            application_key: Some(Sensitive::new(key.to_string())),
            application_secret: Some(Sensitive::new("explicit-as".to_string())),
            consumer_key: Some(Sensitive::new("explicit-ck".to_string())),
        }
    }

    #[test]
    fn test_explicit_values_win() {
        let sources = ConfigSources::empty().with_env(env(&[
            ("OVH_ENDPOINT", "ovh-ca"),
            ("OVH_APPLICATION_KEY", "env-ak"),
        ]));
        let creds = resolve(&explicit("ovh-eu", "explicit-ak"), &sources).unwrap();
        assert_eq!(creds.endpoint, "ovh-eu");
        assert_eq!(creds.base_url, "https://eu.api.ovh.com/1.0");
        assert_eq!(creds.application_key.expose(), "explicit-ak");
    }

    #[test]
    fn test_environment_fills_missing_values() {
        let sources = ConfigSources::empty().with_env(env(&[
            ("OVH_ENDPOINT", "ovh-ca"),
            ("OVH_APPLICATION_KEY", "env-ak"),
            ("OVH_APPLICATION_SECRET", "env-as"),
            ("OVH_CONSUMER_KEY", "env-ck"),
        ]));
        let creds = resolve(&CredentialOverrides::default(), &sources).unwrap();
        assert_eq!(creds.endpoint, "ovh-ca");
        assert_eq!(creds.application_secret.expose(), "env-as");
        assert_eq!(creds.consumer_key.expose(), "env-ck");
    }

    #[test]
    fn test_config_file_is_last_resort() {
        let file = conf_file(
            "[default]\nendpoint=ovh-eu\n\n[ovh-eu]\napplication_key=file-ak\napplication_secret=file-as\nconsumer_key=file-ck\n",
        );
        let sources = ConfigSources::empty()
            .with_files(vec![file.path().to_path_buf()])
            .with_env(env(&[("OVH_CONSUMER_KEY", "env-ck")]));

        let creds = resolve(&CredentialOverrides::default(), &sources).unwrap();
        assert_eq!(creds.endpoint, "ovh-eu");
        assert_eq!(creds.application_key.expose(), "file-ak");
        assert_eq!(creds.consumer_key.expose(), "env-ck");
    }

    #[test]
    fn test_later_files_override_earlier() {
        let system = conf_file("[default]\nendpoint=ovh-eu\n[ovh-eu]\napplication_key=system\napplication_secret=s\nconsumer_key=c\n");
        let local = conf_file("[ovh-eu]\napplication_key=local\n");
        let sources = ConfigSources::empty()
            .with_files(vec![system.path().to_path_buf(), local.path().to_path_buf()]);

        let creds = resolve(&CredentialOverrides::default(), &sources).unwrap();
        assert_eq!(creds.application_key.expose(), "local");
        assert_eq!(creds.application_secret.expose(), "s");
    }

    #[test]
    fn test_missing_files_are_ignored() {
        let sources = ConfigSources::empty()
            .with_files(vec![PathBuf::from("/nonexistent/ovh.conf")])
            .with_env(env(&[("OVH_ENDPOINT", "ovh-eu")]));
        let err = resolve(&CredentialOverrides::default(), &sources).unwrap_err();
        assert_eq!(
            err,
            ClientError::InvalidKey {
                field: "application_key"
            }
        );
    }

    #[test]
    fn test_missing_endpoint() {
        let err = resolve(&CredentialOverrides::default(), &ConfigSources::empty()).unwrap_err();
        assert_eq!(err, ClientError::MissingEndpoint);
    }

    #[test]
    fn test_unknown_endpoint() {
        let err = resolve(&explicit("ovh-mars", "ak"), &ConfigSources::empty()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRegion { .. }));
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let creds = resolve(&explicit("ovh-eu", "visible-nowhere"), &ConfigSources::empty())
            .unwrap();
        assert!(!format!("{:?}", creds).contains("visible-nowhere"));
    }
}

//! Redacting wrapper for credentials
//!
//! Application keys, the application secret and the consumer key travel
//! wrapped in [`Sensitive`]. Formatting one never prints the value, so a
//! stray `{:?}` in a log line or an error message cannot leak it.

use serde::{Deserialize, Deserializer};
use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// A value that formats as `***REDACTED***`
///
/// ```
/// use ovhapi_core_types::Sensitive;
///
/// let secret = Sensitive::new("as-1234".to_string());
/// assert_eq!(format!("{:?} {}", secret, secret), "***REDACTED*** ***REDACTED***");
/// assert_eq!(secret.expose(), "as-1234");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the raw value, for the request signer and header builder
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Sensitive<String> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

// No Serialize: a secret must not round-trip into module output.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_redacts() {
        let key = Sensitive::new("ck-abcdef".to_string());
        assert_eq!(format!("{:?}", key), REDACTED);
        assert_eq!(key.to_string(), REDACTED);
    }

    #[test]
    fn test_deserialize_from_module_arguments() {
        let key: Option<Sensitive<String>> = serde_json::from_str("\"ak-123\"").unwrap();
        let key = key.unwrap();
        assert_eq!(key.expose(), "ak-123");
        assert!(!key.is_empty());
    }

    #[test]
    fn test_nested_debug_keeps_other_fields() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Keys {
            endpoint: &'static str,
            consumer_key: Sensitive<String>,
        }

        let rendered = format!(
            "{:?}",
            Keys {
                endpoint: "ovh-eu",
                consumer_key: "s3cr3t".to_string().into(),
            }
        );
        assert!(rendered.contains("ovh-eu"));
        assert!(!rendered.contains("s3cr3t"));
    }
}

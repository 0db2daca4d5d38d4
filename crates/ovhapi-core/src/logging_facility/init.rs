//! Subscriber installation
//!
//! Output always goes to stderr. `RUST_LOG`, when set, replaces the
//! profile's default filter.

use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 3] = ["ovhapi_core", "ovhapi_client", "ovhapi_cli"];

/// Output style and verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines at debug level
    Development,
    /// JSON lines at info level
    Production,
    /// Nothing printed; tests install the capture layer instead
    Test,
}

impl Profile {
    fn default_filter(self) -> String {
        let level = match self {
            Profile::Development => "debug",
            Profile::Production | Profile::Test => "info",
        };
        CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, level))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_filter()))
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" | "pretty" => Ok(Profile::Development),
            "production" | "prod" | "json" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(format!("unknown logging profile: {}", other)),
        }
    }
}

static INSTALL: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect. If another subscriber
/// is already installed it is left in place.
///
/// ```
/// use ovhapi_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INSTALL.call_once(|| {
        let builder = || {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(profile.filter())
        };
        let _installed = match profile {
            Profile::Development => builder().try_init().is_ok(),
            Profile::Production => builder().json().try_init().is_ok(),
            // Left free for `init_test_capture`
            Profile::Test => false,
        };
    });
}

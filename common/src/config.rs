//! Environment-driven configuration.
//!
//! The whitelist is required; an empty value means "deny everything".
//! Remote execution is enabled only when both a host and a key path are
//! configured.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::whitelist::Whitelist;

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Matches the reference deployment's remote scan host user.
pub const DEFAULT_SSH_USER: &str = "ec2-user";

pub const ENV_WHITELIST: &str = "WARRANT_WHITELIST";
pub const ENV_SSH_HOST: &str = "WARRANT_SSH_HOST";
pub const ENV_SSH_USER: &str = "WARRANT_SSH_USER";
pub const ENV_SSH_KEY: &str = "WARRANT_SSH_KEY";
pub const ENV_SCAN_TIMEOUT: &str = "WARRANT_SCAN_TIMEOUT";

/// Where remote scans run when configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    pub host: String,
    pub user: String,
    pub key_path: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub whitelist: Whitelist,
    pub remote: Option<RemoteConfig>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, keeping the parsing
    /// logic testable without touching process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let whitelist = Whitelist::from_csv(&get(ENV_WHITELIST).unwrap_or_default());

        let remote = match (get(ENV_SSH_HOST), get(ENV_SSH_KEY)) {
            (Some(host), Some(key_path)) if !host.is_empty() && !key_path.is_empty() => {
                let user = get(ENV_SSH_USER)
                    .filter(|user| !user.is_empty())
                    .unwrap_or_else(|| DEFAULT_SSH_USER.to_string());
                Some(RemoteConfig {
                    host,
                    user,
                    key_path,
                })
            }
            _ => None,
        };

        let timeout_secs = match get(ENV_SCAN_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid {ENV_SCAN_TIMEOUT}, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            whitelist,
            remote,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ExclusionSet;
use crate::error::{ConfigError, ProfileError};

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const MAX_CONNECT_TIMEOUT_SECS: u64 = 300;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// The persisted shape of a connection profile.
///
/// Exactly what lives in `profile.toml`. Turned into a validated
/// `ConnectionProfile` with `TryFrom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileRecord {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    /// Inline key material, as an alternative to `private_key_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    pub local_dir: PathBuf,

    pub remote_dir: String,

    #[serde(default)]
    pub transfer: TransferSettings,
}

/// `[transfer]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferSettings {
    /// Extra exclusion patterns on top of the defaults
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Refuse hosts missing from known_hosts
    #[serde(default)]
    pub strict_host_key: bool,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            strict_host_key: false,
        }
    }
}

impl TransferSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > MAX_CONNECT_TIMEOUT_SECS {
            return Err(ProfileError::InvalidTimeout {
                got: self.connect_timeout_secs,
                max: MAX_CONNECT_TIMEOUT_SECS,
            }
            .into());
        }
        ExclusionSet::with_patterns(&self.exclude)?;
        Ok(())
    }
}

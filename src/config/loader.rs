//! Profile parsing, rendering and environment overrides

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::ProfileRecord;

/// Overrides the configuration directory
pub const CONFIG_DIR_ENV: &str = "DCR_CONFIG_DIR";

pub const PROFILE_FILE: &str = "profile.toml";

/// `$DCR_CONFIG_DIR`, or `<platform config dir>/dcr`.
pub fn default_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|d| d.join("dcr"))
}

pub fn profile_path(config_dir: &Path) -> PathBuf {
    config_dir.join(PROFILE_FILE)
}

/// Parse and validate a profile document.
///
/// `path` is only used in error messages. A leading `~` in local paths is
/// expanded against the local home directory.
pub fn parse_profile(content: &str, path: &Path) -> Result<ProfileRecord, ConfigError> {
    let mut record: ProfileRecord = toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    record.local_dir = expand_tilde(&record.local_dir);
    record.private_key_path = record.private_key_path.as_deref().map(expand_tilde);
    record.transfer.validate()?;

    Ok(record)
}

pub fn render_profile(record: &ProfileRecord) -> Result<String, ConfigError> {
    toml::to_string_pretty(record).map_err(|e| ConfigError::Serialize(e.to_string()))
}

/// Apply environment variable overrides (DCR_* prefix)
///
/// The overridden record is validated again, so an out-of-range
/// `DCR_CONNECT_TIMEOUT` is rejected like one written in the file.
pub fn with_env_overrides(record: ProfileRecord) -> Result<ProfileRecord, ConfigError> {
    apply_overrides(record, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides<F>(mut record: ProfileRecord, lookup: F) -> Result<ProfileRecord, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // DCR_CONNECT_TIMEOUT (seconds); unparsable values are ignored
    if let Some(secs) = lookup("DCR_CONNECT_TIMEOUT") {
        if let Ok(secs) = secs.trim().parse::<u64>() {
            record.transfer.connect_timeout_secs = secs;
        }
    }

    // DCR_STRICT_HOST_KEY
    if let Some(val) = lookup("DCR_STRICT_HOST_KEY") {
        record.transfer.strict_host_key = val.to_lowercase() != "false" && val != "0";
    }

    record.transfer.validate()?;
    Ok(record)
}

/// Expand a leading `~` to the local home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

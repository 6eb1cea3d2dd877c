//! TOML-based profile repository implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{self, ProfileRecord};
use crate::domain::ports::ProfileRepository;
use crate::error::ConfigError;

/// Stores the profile as `<config_dir>/profile.toml`.
///
/// Writes go through a temporary file in the same directory and are
/// renamed into place. On Unix the file is readable by its owner only,
/// since it may hold a passphrase or inline key.
#[derive(Debug, Clone)]
pub struct TomlProfileRepository {
    config_dir: PathBuf,
}

impl TomlProfileRepository {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Repository at `$DCR_CONFIG_DIR` or the platform config directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        config::default_config_dir()
            .map(Self::new)
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn path(&self) -> PathBuf {
        config::profile_path(&self.config_dir)
    }
}

impl ProfileRepository for TomlProfileRepository {
    fn load(&self) -> Result<Option<ProfileRecord>, ConfigError> {
        let path = self.path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let record = config::parse_profile(&content, &path)?;
        tracing::debug!(path = %path.display(), "loaded profile");
        config::with_env_overrides(record).map(Some)
    }

    fn save(&self, record: &ProfileRecord) -> Result<(), ConfigError> {
        let path = self.path();
        let rendered = config::render_profile(record)?;
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.config_dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(&self.config_dir).map_err(write_err)?;
        tmp.write_all(rendered.as_bytes()).map_err(write_err)?;
        restrict_permissions(tmp.as_file()).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::info!(path = %path.display(), "saved profile");
        Ok(())
    }

    fn clear(&self) -> Result<bool, ConfigError> {
        let path = self.path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::Write { path, source }),
        }
    }

    fn location(&self) -> PathBuf {
        self.path()
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

//! Profile repository port - abstracts where the connection profile lives.

use std::path::PathBuf;

use crate::config::ProfileRecord;
use crate::error::ConfigError;

/// Storage for the single saved profile.
pub trait ProfileRepository: Send + Sync {
    /// The saved profile, or `None` when nothing has been configured.
    fn load(&self) -> Result<Option<ProfileRecord>, ConfigError>;

    /// Replace the saved profile.
    fn save(&self, record: &ProfileRecord) -> Result<(), ConfigError>;

    /// Forget the saved profile. Returns whether one existed.
    fn clear(&self) -> Result<bool, ConfigError>;

    /// Where the profile is stored, for display.
    fn location(&self) -> PathBuf;
}

//! Transfer Options

use std::path::PathBuf;

use crate::config::TransferSettings;

/// Options for the transfer use case
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Patterns added to the default exclusion set
    pub exclude: Vec<String>,
    /// Where the local archive is written
    pub work_dir: PathBuf,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            work_dir: std::env::temp_dir(),
        }
    }
}

impl TransferOptions {
    pub fn from_settings(settings: &TransferSettings) -> Self {
        Self {
            exclude: settings.exclude.clone(),
            ..Self::default()
        }
    }

    pub fn with_exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }
}

//! Error types for dcr
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`
//! only at the command boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::ExclusionError;

/// Result type alias for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// Why a connection attempt failed.
///
/// These are distinguished for the user but never for control flow:
/// every one of them ends the run in the `Connecting` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    /// Host name did not resolve
    Resolve,
    /// TCP connect or handshake did not finish within the timeout
    Timeout,
    /// TCP-level failure (refused, unreachable, reset)
    Network,
    /// SSH protocol handshake failed
    Handshake,
    /// Host key rejected by the known_hosts policy
    HostKey,
    /// Private key could not be read or staged
    Credential,
    /// Server rejected the credential
    Auth,
}

impl std::fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Resolve => "name resolution failed",
            Self::Timeout => "timed out",
            Self::Network => "network error",
            Self::Handshake => "SSH handshake failed",
            Self::HostKey => "host key verification failed",
            Self::Credential => "credential unusable",
            Self::Auth => "authentication failed",
        };
        f.write_str(s)
    }
}

/// Main error type for packaging and transfer operations
#[derive(Error, Debug)]
pub enum TransferError {
    /// Local source directory does not exist (or is not a directory)
    #[error("source directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Local disk read/write failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Could not establish an authenticated session
    #[error("{failure}: {detail}")]
    Connect {
        failure: ConnectFailure,
        detail: String,
    },

    /// Remote destination is missing and could not be created
    #[error("cannot create {path}: {detail}")]
    RemoteEnvironment { path: String, detail: String },

    /// Remote destination exists but is not writable
    #[error("cannot write to {path}: {detail}")]
    Permission { path: String, detail: String },

    /// A tool required on the remote host is not on its PATH
    #[error("required tool '{tool}' not found on remote PATH")]
    MissingDependency { tool: String },

    /// A remote command exited non-zero
    #[error("remote command `{command}` exited with {exit_code}: {stderr}")]
    RemoteCommand {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The upload stream was interrupted
    #[error("upload to {remote_path} interrupted: {detail}")]
    Upload { remote_path: String, detail: String },

    /// An exclusion pattern was rejected
    #[error(transparent)]
    InvalidExclusion(#[from] ExclusionError),

    /// The run was cancelled before this stage finished
    #[error("interrupted")]
    Interrupted,
}

impl TransferError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn connect(failure: ConnectFailure, detail: impl Into<String>) -> Self {
        Self::Connect {
            failure,
            detail: detail.into(),
        }
    }

    /// Taxonomy name used in user-facing failure lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::Io { .. } => "IOError",
            Self::Connect { .. } => "ConnectError",
            Self::RemoteEnvironment { .. } => "RemoteEnvironmentError",
            Self::Permission { .. } => "PermissionError",
            Self::MissingDependency { .. } => "MissingDependencyError",
            Self::RemoteCommand { .. } => "RemoteCommandError",
            Self::Upload { .. } => "UploadError",
            Self::InvalidExclusion(_) => "ConfigError",
            Self::Interrupted => "InterruptedError",
        }
    }
}

/// Errors raised while turning a stored record into a `ConnectionProfile`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u16),

    #[error("profile needs either 'private_key_path' or 'private_key'")]
    MissingCredential,

    #[error("connect timeout must be between 1 and {max} seconds, got {got}")]
    InvalidTimeout { got: u64, max: u64 },
}

/// Errors raised by the profile store
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize profile: {0}")]
    Serialize(String),

    #[error("no configuration directory available; set DCR_CONFIG_DIR")]
    NoConfigDir,

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Exclusion(#[from] ExclusionError),
}

//! Connection profile entity
//!
//! Everything one run needs to know about where the data comes from and
//! where it goes. Built once from a stored record, then never mutated.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ProfileRecord;
use crate::error::{ProfileError, TransferError, TransferResult};

/// How the session authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Private key file on the local disk
    KeyFile {
        path: PathBuf,
        passphrase: Option<String>,
    },
    /// Private key material held in memory (PEM / OpenSSH format)
    KeyMaterial {
        pem: String,
        passphrase: Option<String>,
    },
}

impl Credential {
    /// Short description safe to print or log.
    pub fn describe(&self) -> String {
        match self {
            Credential::KeyFile { path, .. } => format!("key file {}", path.display()),
            Credential::KeyMaterial { .. } => "inline key".to_string(),
        }
    }
}

// Key bytes and passphrases never reach logs or panic messages
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::KeyFile { path, passphrase } => f
                .debug_struct("KeyFile")
                .field("path", path)
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
            Credential::KeyMaterial { passphrase, .. } => f
                .debug_struct("KeyMaterial")
                .field("pem", &"<redacted>")
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// A validated source → destination pairing for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    host: String,
    port: u16,
    username: String,
    credential: Credential,
    local_source: PathBuf,
    remote_destination: String,
}

impl ConnectionProfile {
    /// Build a profile, rejecting empty fields and port 0.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        credential: Credential,
        local_source: impl Into<PathBuf>,
        remote_destination: impl Into<String>,
    ) -> Result<Self, ProfileError> {
        let host = host.into().trim().to_string();
        let username = username.into().trim().to_string();
        let local_source = local_source.into();
        let remote_destination = remote_destination.into().trim().to_string();

        if host.is_empty() {
            return Err(ProfileError::EmptyField("host"));
        }
        if port == 0 {
            return Err(ProfileError::InvalidPort(port));
        }
        if username.is_empty() {
            return Err(ProfileError::EmptyField("username"));
        }
        match &credential {
            Credential::KeyFile { path, .. } if path.as_os_str().is_empty() => {
                return Err(ProfileError::EmptyField("private_key_path"));
            }
            Credential::KeyMaterial { pem, .. } if pem.trim().is_empty() => {
                return Err(ProfileError::EmptyField("private_key"));
            }
            _ => {}
        }
        if local_source.as_os_str().is_empty() {
            return Err(ProfileError::EmptyField("local_dir"));
        }
        if remote_destination.is_empty() {
            return Err(ProfileError::EmptyField("remote_dir"));
        }

        Ok(Self {
            host,
            port,
            username,
            credential,
            local_source,
            remote_destination,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn local_source(&self) -> &Path {
        &self.local_source
    }

    pub fn remote_destination(&self) -> &str {
        &self.remote_destination
    }

    /// `user@host:port`, for display.
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }

    /// Re-check that the local source is an existing directory.
    ///
    /// Stored profiles can go stale between `config` and `run`.
    pub fn validate_local_source(&self) -> TransferResult<()> {
        match std::fs::metadata(&self.local_source) {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(TransferError::NotFound {
                path: self.local_source.clone(),
            }),
        }
    }
}

impl TryFrom<&ProfileRecord> for ConnectionProfile {
    type Error = ProfileError;

    fn try_from(record: &ProfileRecord) -> Result<Self, Self::Error> {
        let passphrase = record
            .passphrase
            .clone()
            .filter(|p| !p.is_empty());
        let credential = match (&record.private_key_path, &record.private_key) {
            (_, Some(pem)) if !pem.trim().is_empty() => Credential::KeyMaterial {
                pem: pem.clone(),
                passphrase,
            },
            (Some(path), _) => Credential::KeyFile {
                path: path.clone(),
                passphrase,
            },
            _ => return Err(ProfileError::MissingCredential),
        };

        Self::new(
            record.host.as_str(),
            record.port,
            record.username.as_str(),
            credential,
            record.local_dir.clone(),
            record.remote_dir.as_str(),
        )
    }
}

//! known_hosts verification

use std::path::{Path, PathBuf};

use ssh2::{CheckResult, KnownHostFileKind, Session};

use crate::error::{ConnectFailure, TransferError, TransferResult};

/// What to do with a host that is not in known_hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKeyPolicy {
    /// Accept unknown hosts with a warning
    #[default]
    AcceptNew,
    /// Refuse unknown hosts
    Strict,
}

pub fn default_known_hosts() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts"))
}

/// Check the server's host key. A key that differs from a recorded one is
/// always rejected.
pub fn verify(
    session: &Session,
    host: &str,
    port: u16,
    known_hosts: Option<&Path>,
    policy: HostKeyPolicy,
) -> TransferResult<()> {
    let (key, _key_type) = session.host_key().ok_or_else(|| {
        TransferError::connect(ConnectFailure::HostKey, "server sent no host key")
    })?;

    let mut known = session
        .known_hosts()
        .map_err(|e| TransferError::connect(ConnectFailure::HostKey, e.to_string()))?;
    if let Some(path) = known_hosts.filter(|p| p.exists()) {
        if let Err(e) = known.read_file(path, KnownHostFileKind::OpenSSH) {
            tracing::warn!(path = %path.display(), error = %e, "could not read known_hosts");
        }
    }

    match known.check_port(host, port, key) {
        CheckResult::Match => {
            tracing::debug!(host, port, "host key matches known_hosts");
            Ok(())
        }
        CheckResult::Mismatch => Err(TransferError::connect(
            ConnectFailure::HostKey,
            format!("host key for {}:{} does not match known_hosts", host, port),
        )),
        CheckResult::NotFound | CheckResult::Failure => match policy {
            HostKeyPolicy::Strict => Err(TransferError::connect(
                ConnectFailure::HostKey,
                format!("{}:{} is not in known_hosts", host, port),
            )),
            HostKeyPolicy::AcceptNew => {
                tracing::warn!(host, port, "host is not in known_hosts; accepting its key");
                Ok(())
            }
        },
    }
}

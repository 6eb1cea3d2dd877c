//! SSH connector
//!
//! Resolve, TCP connect, handshake, host key check, then public-key
//! authentication. Each step maps its failure to a distinct
//! `ConnectFailure`.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use ssh2::{ErrorCode, Session};
use tempfile::NamedTempFile;

use super::host_keys::{self, HostKeyPolicy};
use super::session::SshSession;
use crate::config::{TransferSettings, DEFAULT_CONNECT_TIMEOUT_SECS};
use crate::domain::entities::{ConnectionProfile, Credential};
use crate::domain::ports::SessionConnector;
use crate::error::{ConnectFailure, TransferError, TransferResult};

/// Default SFTP write size
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default bound on one stalled read or write after login
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(120);

// libssh2 error codes
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;
const LIBSSH2_ERROR_FILE: i32 = -16;

#[derive(Debug, Clone)]
pub struct SshOptions {
    /// Bound on TCP connect and on the SSH handshake
    pub connect_timeout: Duration,
    /// Bound on any single read or write once authenticated. A remote
    /// command that produces no output for this long also fails.
    pub io_timeout: Duration,
    /// Keepalive interval in seconds, 0 to disable
    pub keepalive_secs: u32,
    pub host_key_policy: HostKeyPolicy,
    /// `None` skips reading any known_hosts file
    pub known_hosts: Option<PathBuf>,
    pub chunk_size: usize,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            io_timeout: DEFAULT_IO_TIMEOUT,
            keepalive_secs: 30,
            host_key_policy: HostKeyPolicy::AcceptNew,
            known_hosts: host_keys::default_known_hosts(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SshOptions {
    pub fn from_settings(settings: &TransferSettings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            host_key_policy: if settings.strict_host_key {
                HostKeyPolicy::Strict
            } else {
                HostKeyPolicy::AcceptNew
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SshConnector {
    options: SshOptions,
}

impl SshConnector {
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SshOptions {
        &self.options
    }
}

#[async_trait]
impl SessionConnector for SshConnector {
    type Session = SshSession;

    async fn connect(&self, profile: &ConnectionProfile) -> TransferResult<SshSession> {
        tracing::info!(peer = %profile.target(), "connecting");
        let profile = profile.clone();
        let options = self.options.clone();

        let session = tokio::task::spawn_blocking(move || connect_blocking(&profile, &options))
            .await
            .map_err(|e| TransferError::io("ssh worker", io::Error::other(e)))??;

        tracing::info!(peer = %session.target(), "authenticated");
        Ok(session)
    }
}

fn connect_blocking(profile: &ConnectionProfile, options: &SshOptions) -> TransferResult<SshSession> {
    let addrs = resolve(profile.host(), profile.port())?;
    let tcp = open_tcp(&addrs, options.connect_timeout)?;

    let mut session = Session::new()
        .map_err(|e| TransferError::connect(ConnectFailure::Handshake, e.to_string()))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(timeout_millis(options.connect_timeout));

    session.handshake().map_err(|e| {
        let failure = if is_code(&e, LIBSSH2_ERROR_TIMEOUT) {
            ConnectFailure::Timeout
        } else {
            ConnectFailure::Handshake
        };
        TransferError::connect(failure, e.to_string())
    })?;

    // From here on a failure drops `ssh`, which disconnects
    let mut ssh = SshSession::new(
        session,
        profile.target(),
        options.chunk_size,
        options.io_timeout,
    );

    host_keys::verify(
        ssh.session(),
        profile.host(),
        profile.port(),
        options.known_hosts.as_deref(),
        options.host_key_policy,
    )?;

    authenticate(ssh.session(), profile.username(), profile.credential())?;

    // The session sends keepalives only when asked to, so uploads and
    // command reads drive `keepalive_send` between blocking calls
    ssh.session().set_timeout(timeout_millis(options.io_timeout));
    ssh.session()
        .set_keepalive(options.keepalive_secs > 0, options.keepalive_secs);

    ssh.mark_ready();
    Ok(ssh)
}

fn resolve(host: &str, port: u16) -> TransferResult<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| TransferError::connect(ConnectFailure::Resolve, format!("{}: {}", host, e)))?
        .collect();
    if addrs.is_empty() {
        return Err(TransferError::connect(
            ConnectFailure::Resolve,
            format!("{}: no addresses", host),
        ));
    }
    Ok(addrs)
}

fn open_tcp(addrs: &[SocketAddr], timeout: Duration) -> TransferResult<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => {
                tracing::debug!(%addr, "tcp connected");
                return Ok(stream);
            }
            Err(e) => {
                tracing::debug!(%addr, error = %e, "tcp connect failed");
                last_err = Some((*addr, e));
            }
        }
    }

    Err(match last_err {
        Some((addr, e)) if e.kind() == io::ErrorKind::TimedOut => TransferError::connect(
            ConnectFailure::Timeout,
            format!("{} after {}s", addr, timeout.as_secs()),
        ),
        Some((addr, e)) => TransferError::connect(ConnectFailure::Network, format!("{}: {}", addr, e)),
        None => TransferError::connect(ConnectFailure::Resolve, "no addresses"),
    })
}

fn authenticate(session: &Session, username: &str, credential: &Credential) -> TransferResult<()> {
    tracing::debug!(username, credential = %credential.describe(), "authenticating");

    match credential {
        Credential::KeyFile { path, passphrase } => {
            if !path.is_file() {
                return Err(TransferError::connect(
                    ConnectFailure::Credential,
                    format!("private key {} not found", path.display()),
                ));
            }
            pubkey_file(session, username, path, passphrase.as_deref())?;
        }
        Credential::KeyMaterial { pem, passphrase } => {
            // libssh2 reads keys from disk; the temp file is owner-only
            // and removed when dropped
            let mut key = NamedTempFile::new().map_err(stage_err)?;
            key.write_all(pem.as_bytes()).map_err(stage_err)?;
            key.flush().map_err(stage_err)?;
            pubkey_file(session, username, key.path(), passphrase.as_deref())?;
        }
    }

    if !session.authenticated() {
        return Err(TransferError::connect(
            ConnectFailure::Auth,
            format!("server did not accept the key for {}", username),
        ));
    }
    Ok(())
}

fn pubkey_file(
    session: &Session,
    username: &str,
    key: &Path,
    passphrase: Option<&str>,
) -> TransferResult<()> {
    session
        .userauth_pubkey_file(username, None, key, passphrase)
        .map_err(|e| {
            let failure = if is_code(&e, LIBSSH2_ERROR_FILE) {
                ConnectFailure::Credential
            } else {
                ConnectFailure::Auth
            };
            TransferError::connect(failure, e.message().to_string())
        })
}

fn stage_err(e: io::Error) -> TransferError {
    TransferError::connect(ConnectFailure::Credential, format!("staging key: {}", e))
}

fn is_code(err: &ssh2::Error, code: i32) -> bool {
    matches!(err.code(), ErrorCode::Session(c) if c == code)
}

pub(super) fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

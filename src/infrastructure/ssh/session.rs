//! SSH session adapter
//!
//! Every libssh2 call blocks, so each operation runs on the blocking pool
//! with a clone of the underlying `ssh2::Session`. Each blocking call is
//! bounded by the session timeout, and keepalives are sent between calls.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ssh2::Session;
use tokio_util::sync::CancellationToken;

use super::connector::timeout_millis;
use crate::domain::ports::{
    CommandOutput, ProgressObserver, ProgressSample, RemoteSession, SessionState,
};
use crate::error::{TransferError, TransferResult};

/// How long one read of a command's output waits before the other
/// stream gets a turn
const EXEC_POLL: Duration = Duration::from_millis(250);

pub struct SshSession {
    session: Session,
    target: String,
    chunk_size: usize,
    io_timeout: Duration,
    state: SessionState,
}

impl SshSession {
    pub(crate) fn new(
        session: Session,
        target: String,
        chunk_size: usize,
        io_timeout: Duration,
    ) -> Self {
        Self {
            session,
            target,
            chunk_size: chunk_size.max(1),
            io_timeout,
            state: SessionState::Connecting,
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn mark_ready(&mut self) {
        self.state = SessionState::Ready;
    }

    /// `user@host:port`
    pub fn target(&self) -> &str {
        &self.target
    }

    fn ensure_ready(&self) -> TransferResult<()> {
        if self.state == SessionState::Ready {
            Ok(())
        } else {
            Err(TransferError::io(
                format!("session to {}", self.target),
                io::Error::new(io::ErrorKind::NotConnected, "session is not open"),
            ))
        }
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    fn state(&self) -> SessionState {
        self.state
    }

    async fn execute(&mut self, command: &str) -> TransferResult<CommandOutput> {
        self.ensure_ready()?;
        tracing::debug!(peer = %self.target, command, "exec");

        let session = self.session.clone();
        let cmd = command.to_string();
        let idle_limit = self.io_timeout;
        let output = tokio::task::spawn_blocking(move || exec_blocking(&session, &cmd, idle_limit))
            .await
            .map_err(join_error)?
            .map_err(|e| TransferError::io(format!("remote command `{}`", command), e))?;

        if output.success() {
            Ok(output)
        } else {
            Err(TransferError::RemoteCommand {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    async fn upload(
        &mut self,
        local: &Path,
        remote: &str,
        observer: Arc<dyn ProgressObserver>,
        cancel: &CancellationToken,
    ) -> TransferResult<u64> {
        self.ensure_ready()?;
        tracing::info!(local = %local.display(), remote, "uploading");

        let session = self.session.clone();
        let local = local.to_path_buf();
        let remote = remote.to_string();
        let chunk_size = self.chunk_size;
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || {
            upload_blocking(
                &session,
                &local,
                &remote,
                chunk_size,
                observer.as_ref(),
                &cancel,
            )
        })
        .await
        .map_err(join_error)?
    }

    async fn close(&mut self) -> TransferResult<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;

        let session = self.session.clone();
        let target = self.target.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = session.disconnect(None, "dcr: done", None) {
                tracing::debug!(peer = %target, error = %e, "disconnect failed");
            }
        })
        .await
        .map_err(join_error)?;

        tracing::debug!(peer = %self.target, "session closed");
        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if matches!(self.state, SessionState::Connecting | SessionState::Ready) {
            let _ = self.session.disconnect(None, "dcr: aborted", None);
            self.state = SessionState::Closed;
        }
    }
}

fn exec_blocking(session: &Session, command: &str, idle_limit: Duration) -> io::Result<CommandOutput> {
    let mut channel = session.channel_session()?;
    channel.exec(command)?;

    // Short reads let stdout and stderr take turns, so neither fills the
    // channel window while the other is being waited on
    let previous = session.timeout();
    session.set_timeout(timeout_millis(EXEC_POLL));
    let pumped = pump_streams(
        &mut channel.stream(0),
        &mut channel.stderr(),
        || channel.eof(),
        || session.keepalive_send().map(|_| ()).map_err(io::Error::from),
        idle_limit,
    );
    session.set_timeout(previous);
    let (stdout, stderr) = pumped?;

    channel.wait_close()?;
    let exit_code = channel.exit_status()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code,
    })
}

/// Read both output streams of a command until `finished` reports EOF.
///
/// A read that times out is not an error. When neither stream has
/// produced anything `on_idle` runs, and after `idle_limit` without data
/// the command is abandoned with `TimedOut`.
fn pump_streams<O, E, F, K>(
    stdout: &mut O,
    stderr: &mut E,
    mut finished: F,
    mut on_idle: K,
    idle_limit: Duration,
) -> io::Result<(Vec<u8>, Vec<u8>)>
where
    O: Read,
    E: Read,
    F: FnMut() -> bool,
    K: FnMut() -> io::Result<()>,
{
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut out_open = true;
    let mut err_open = true;
    let mut buf = vec![0u8; 16 * 1024];
    let mut last_data = Instant::now();

    while (out_open || err_open) && !finished() {
        let mut progressed = false;
        if out_open {
            match read_some(stdout, &mut buf, &mut out)? {
                Some(0) => out_open = false,
                Some(_) => progressed = true,
                None => {}
            }
        }
        if err_open {
            match read_some(stderr, &mut buf, &mut err)? {
                Some(0) => err_open = false,
                Some(_) => progressed = true,
                None => {}
            }
        }

        if progressed {
            last_data = Instant::now();
        } else {
            on_idle()?;
            if last_data.elapsed() >= idle_limit {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no output for {}s", idle_limit.as_secs()),
                ));
            }
        }
    }

    // Whatever is still buffered after EOF
    if out_open {
        stdout.read_to_end(&mut out)?;
    }
    if err_open {
        stderr.read_to_end(&mut err)?;
    }
    Ok((out, err))
}

/// `Some(n)` bytes appended (0 at end of stream), `None` if the read timed out.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8], into: &mut Vec<u8>) -> io::Result<Option<usize>> {
    match reader.read(buf) {
        Ok(n) => {
            into.extend_from_slice(&buf[..n]);
            Ok(Some(n))
        }
        Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

fn upload_blocking(
    session: &Session,
    local: &Path,
    remote: &str,
    chunk_size: usize,
    observer: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> TransferResult<u64> {
    let upload_err = |detail: String| TransferError::Upload {
        remote_path: remote.to_string(),
        detail,
    };

    let mut source =
        File::open(local).map_err(|e| TransferError::io(format!("opening {}", local.display()), e))?;
    let total = source
        .metadata()
        .map_err(|e| TransferError::io(format!("reading {}", local.display()), e))?
        .len();

    let sftp = session
        .sftp()
        .map_err(|e| upload_err(format!("opening SFTP channel: {}", e)))?;
    let mut target = sftp
        .create(Path::new(remote))
        .map_err(|e| upload_err(format!("creating remote file: {}", e)))?;

    if total == 0 {
        observer.on_progress(ProgressSample::new(0, 0));
    }

    let mut transferred: u64 = 0;
    let mut buf = vec![0u8; chunk_size];
    loop {
        if cancel.is_cancelled() {
            return Err(TransferError::Interrupted);
        }
        let n = source
            .read(&mut buf)
            .map_err(|e| TransferError::io(format!("reading {}", local.display()), e))?;
        if n == 0 {
            break;
        }

        target
            .write_all(&buf[..n])
            .map_err(|e| upload_err(e.to_string()))?;
        session
            .keepalive_send()
            .map_err(|e| upload_err(format!("keepalive: {}", e)))?;

        transferred += n as u64;
        observer.on_progress(ProgressSample::new(transferred, total.max(transferred)));
    }

    target
        .flush()
        .map_err(|e| upload_err(format!("flushing remote file: {}", e)))?;
    target
        .close()
        .map_err(|e| upload_err(format!("closing remote file: {}", e)))?;

    Ok(transferred)
}

fn join_error(err: tokio::task::JoinError) -> TransferError {
    TransferError::io("ssh worker", io::Error::other(err))
}

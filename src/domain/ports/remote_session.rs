//! Remote Session Port
//!
//! One authenticated connection to the remote host, used for command
//! execution and file upload. `SessionConnector` produces sessions so the
//! orchestrator can be driven by an in-process fake in tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::transfer_events::ProgressObserver;
use crate::domain::entities::ConnectionProfile;
use crate::error::TransferResult;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Ready,
    Closed,
}

/// Captured output of one remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[async_trait]
pub trait RemoteSession: Send {
    fn state(&self) -> SessionState;

    /// Run one command on a fresh exec channel.
    ///
    /// A non-zero exit status is returned as `TransferError::RemoteCommand`
    /// carrying the captured stderr.
    async fn execute(&mut self, command: &str) -> TransferResult<CommandOutput>;

    /// Stream `local` to `remote`, reporting each written chunk.
    ///
    /// Samples are non-decreasing and none arrive after this returns.
    /// Returns the number of bytes written. `cancel` is checked between
    /// chunks and ends the upload with `Interrupted`.
    async fn upload(
        &mut self,
        local: &Path,
        remote: &str,
        observer: Arc<dyn ProgressObserver>,
        cancel: &CancellationToken,
    ) -> TransferResult<u64>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&mut self) -> TransferResult<()>;
}

#[async_trait]
pub trait SessionConnector: Send + Sync {
    type Session: RemoteSession + 'static;

    /// Open and authenticate a session. Returned sessions are `Ready`.
    async fn connect(&self, profile: &ConnectionProfile) -> TransferResult<Self::Session>;
}

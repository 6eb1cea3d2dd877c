//! Preflight validation
//!
//! Confirms on a live session that the destination exists (creating it if
//! needed), is writable, and that `unzip` is on the remote PATH. Nothing
//! is uploaded.

use uuid::Uuid;

use super::remote_commands;
use crate::domain::ports::RemoteSession;
use crate::domain::value_objects::remote_path;
use crate::error::{TransferError, TransferResult};

/// Tool the unpack step depends on
pub const REQUIRED_TOOL: &str = "unzip";

/// Destination as confirmed on the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Absolute path after `~` expansion
    pub path: String,
    /// The directory did not exist and was created
    pub created: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreflightValidator;

impl PreflightValidator {
    pub fn new() -> Self {
        Self
    }

    pub async fn validate<S>(
        &self,
        session: &mut S,
        destination: &str,
    ) -> TransferResult<ResolvedDestination>
    where
        S: RemoteSession + ?Sized,
    {
        let path = resolve_home(session, destination).await?;
        let created = ensure_directory(session, &path).await?;
        check_writable(session, &path).await?;
        check_tool(session, REQUIRED_TOOL).await?;

        tracing::info!(destination = %path, created, "preflight passed");
        Ok(ResolvedDestination { path, created })
    }
}

async fn resolve_home<S>(session: &mut S, destination: &str) -> TransferResult<String>
where
    S: RemoteSession + ?Sized,
{
    if !remote_path::needs_home_expansion(destination) {
        return Ok(destination.to_string());
    }

    let output = session
        .execute(remote_commands::HOME_QUERY)
        .await
        .map_err(|e| environment_error(destination, e))?;
    let home = output.stdout.trim();
    if home.is_empty() {
        return Err(TransferError::RemoteEnvironment {
            path: destination.to_string(),
            detail: "remote $HOME is empty".to_string(),
        });
    }

    let expanded = remote_path::expand_home(destination, home);
    tracing::debug!(from = destination, to = %expanded, "expanded remote home");
    Ok(expanded)
}

/// Returns whether the directory had to be created.
async fn ensure_directory<S>(session: &mut S, path: &str) -> TransferResult<bool>
where
    S: RemoteSession + ?Sized,
{
    let probe = session
        .execute(&remote_commands::dir_exists(path))
        .await
        .map_err(|e| environment_error(path, e))?;
    if probe.stdout.trim() == remote_commands::EXISTS_MARKER {
        return Ok(false);
    }

    tracing::info!(path, "creating remote directory");
    session
        .execute(&remote_commands::make_dir(path))
        .await
        .map_err(|e| environment_error(path, e))?;
    Ok(true)
}

async fn check_writable<S>(session: &mut S, path: &str) -> TransferResult<()>
where
    S: RemoteSession + ?Sized,
{
    let token = Uuid::new_v4().simple().to_string();
    match session
        .execute(&remote_commands::write_probe(path, &token))
        .await
    {
        Ok(_) => Ok(()),
        Err(TransferError::RemoteCommand {
            exit_code, stderr, ..
        }) => Err(TransferError::Permission {
            path: path.to_string(),
            detail: describe_failure(exit_code, stderr),
        }),
        Err(other) => Err(other),
    }
}

async fn check_tool<S>(session: &mut S, tool: &str) -> TransferResult<()>
where
    S: RemoteSession + ?Sized,
{
    match session
        .execute(&remote_commands::tool_available(tool))
        .await
    {
        Ok(_) => Ok(()),
        Err(TransferError::RemoteCommand { .. }) => Err(TransferError::MissingDependency {
            tool: tool.to_string(),
        }),
        Err(other) => Err(other),
    }
}

/// Non-zero remote exits become `RemoteEnvironment`; transport errors pass through.
fn environment_error(path: &str, err: TransferError) -> TransferError {
    match err {
        TransferError::RemoteCommand {
            exit_code, stderr, ..
        } => TransferError::RemoteEnvironment {
            path: path.to_string(),
            detail: describe_failure(exit_code, stderr),
        },
        other => other,
    }
}

fn describe_failure(exit_code: i32, stderr: String) -> String {
    if stderr.is_empty() {
        format!("exit status {}", exit_code)
    } else {
        stderr
    }
}

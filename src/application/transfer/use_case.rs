//! Transfer Use Case
//!
//! Runs the stages strictly in order and stops at the first failure:
//! 1. Packaging - archive the local source
//! 2. Connecting - open an authenticated session
//! 3. Validating - preflight checks on the destination
//! 4. Uploading - stream the archive next to the destination
//! 5. RemoteUnpacking - extract and delete the remote archive
//! 6. CleaningUp - close the session and delete the local archive
//!
//! Cleanup runs on every path. Cancelling the run's token (Ctrl-C) ends
//! the current stage with `Interrupted` and goes through the same cleanup;
//! the archive handle and session drop guards cover a run that is dropped
//! outright.

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::options::TransferOptions;
use super::outcome::{Outcome, StageFailure};
use super::progress::SinkProgress;
use crate::application::preflight::{PreflightValidator, ResolvedDestination};
use crate::application::remote_commands;
use crate::domain::entities::{ArchiveHandle, ConnectionProfile};
use crate::domain::ports::{
    NoopEventSink, Packager, RemoteSession, SessionConnector, TransferEvent, TransferEventSink,
};
use crate::domain::value_objects::{remote_path, ExclusionSet, Stage};
use crate::error::{TransferError, TransferResult};

/// Resources one run owns until CleaningUp
struct RunState<S> {
    archive: Option<ArchiveHandle>,
    session: Option<S>,
}

/// Transfer use case - orchestrates one run
///
/// Parameterized by its ports so tests can drive it with an in-process
/// remote.
pub struct TransferUseCase<P, C>
where
    P: Packager + 'static,
    C: SessionConnector,
{
    packager: Arc<P>,
    connector: C,
    validator: PreflightValidator,
    options: TransferOptions,
    cancel: CancellationToken,
}

impl<P, C> TransferUseCase<P, C>
where
    P: Packager + 'static,
    C: SessionConnector,
{
    pub fn new(packager: P, connector: C, options: TransferOptions) -> Self {
        Self {
            packager: Arc::new(packager),
            connector,
            validator: PreflightValidator::new(),
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to interrupt runs of this use case.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Run without reporting events
    pub async fn execute(&self, profile: &ConnectionProfile) -> Outcome {
        self.run(profile, Arc::new(NoopEventSink)).await
    }

    /// Run the full pipeline, reporting to `sink`.
    pub async fn run(&self, profile: &ConnectionProfile, sink: Arc<dyn TransferEventSink>) -> Outcome {
        let mut state = RunState {
            archive: None,
            session: None,
        };

        let result = self.run_stages(profile, &sink, &mut state).await;

        sink.on_event(TransferEvent::StageStarted {
            stage: Stage::CleaningUp,
        });
        let cleanup = cleanup(&mut state).await;

        let outcome = match (result, cleanup) {
            (Ok(bytes_transferred), Ok(())) => Outcome::Success { bytes_transferred },
            (Ok(_), Err(error)) => Outcome::Failure {
                stage: Stage::CleaningUp,
                error,
            },
            (Err(failure), _) => failure.into(),
        };

        match &outcome {
            Outcome::Success { bytes_transferred } => {
                tracing::info!(bytes = bytes_transferred, "transfer complete");
                sink.on_event(TransferEvent::Succeeded {
                    bytes_transferred: *bytes_transferred,
                });
            }
            Outcome::Failure { stage, error } => {
                tracing::error!(%stage, kind = error.kind(), %error, "transfer failed");
                sink.on_event(TransferEvent::Failed {
                    stage: *stage,
                    kind: error.kind(),
                    message: error.to_string(),
                });
            }
        }

        outcome
    }

    /// Connect and run preflight only, without packaging or uploading.
    pub async fn check(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<ResolvedDestination, StageFailure> {
        let mut session = self
            .connector
            .connect(profile)
            .await
            .map_err(at(Stage::Connecting))?;

        let resolved = self
            .validator
            .validate(&mut session, profile.remote_destination())
            .await
            .map_err(at(Stage::Validating));

        let closed = session.close().await;
        let resolved = resolved?;
        closed.map_err(at(Stage::CleaningUp))?;
        Ok(resolved)
    }

    async fn run_stages(
        &self,
        profile: &ConnectionProfile,
        sink: &Arc<dyn TransferEventSink>,
        state: &mut RunState<C::Session>,
    ) -> Result<u64, StageFailure> {
        enter(sink, Stage::Packaging);
        let archive = self.guarded(Stage::Packaging, self.package(profile)).await?;
        sink.on_event(TransferEvent::Packaged {
            size: archive.size(),
            entry_count: archive.entry_count(),
        });
        let archive_path = archive.path().to_path_buf();
        state.archive = Some(archive);

        enter(sink, Stage::Connecting);
        let session = self
            .guarded(Stage::Connecting, self.connector.connect(profile))
            .await?;
        sink.on_event(TransferEvent::Connected {
            target: profile.target(),
        });
        let session = state.session.insert(session);

        enter(sink, Stage::Validating);
        let destination = self
            .guarded(
                Stage::Validating,
                self.validator.validate(&mut *session, profile.remote_destination()),
            )
            .await?;
        sink.on_event(TransferEvent::Validated {
            destination: destination.path.clone(),
            created: destination.created,
        });

        enter(sink, Stage::Uploading);
        let remote_archive = remote_path::join(&destination.path, remote_commands::UPLOAD_FILE_NAME);
        let observer = Arc::new(SinkProgress::new(Arc::clone(sink)));
        let upload = session.upload(&archive_path, &remote_archive, observer, &self.cancel);
        let bytes = match self.guarded(Stage::Uploading, upload).await {
            Ok(bytes) => bytes,
            Err(failure) if matches!(failure.error, TransferError::Interrupted) => {
                tracing::debug!(path = %remote_archive, "upload interrupted; partial file left for the next run");
                return Err(failure);
            }
            Err(StageFailure { error, .. }) => {
                if let Err(e) = session
                    .execute(&remote_commands::remove_file(&remote_archive))
                    .await
                {
                    tracing::warn!(path = %remote_archive, error = %e, "failed to remove partial upload");
                }
                return Err(StageFailure::new(Stage::Uploading, error));
            }
        };

        enter(sink, Stage::RemoteUnpacking);
        let unpack = remote_commands::unpack(&destination.path);
        self.guarded(Stage::RemoteUnpacking, session.execute(&unpack))
            .await?;

        Ok(bytes)
    }

    async fn package(&self, profile: &ConnectionProfile) -> TransferResult<ArchiveHandle> {
        profile.validate_local_source()?;
        let exclusions = ExclusionSet::with_patterns(&self.options.exclude)?;
        let destination = self
            .options
            .work_dir
            .join(format!("dcr-{}.zip", Uuid::new_v4()));

        let packager = Arc::clone(&self.packager);
        let source = profile.local_source().to_path_buf();
        let cancel = self.cancel.clone();
        tokio::task::spawn_blocking(move || {
            packager.compress(&source, &destination, &exclusions, &cancel)
        })
        .await
        .map_err(|e| TransferError::io("packaging worker", io::Error::other(e)))?
    }

    /// Run one stage's work unless the run is cancelled first.
    ///
    /// Blocking workers behind `work` watch the same token and stop at
    /// their next checkpoint.
    async fn guarded<T, F>(&self, stage: Stage, work: F) -> Result<T, StageFailure>
    where
        F: Future<Output = TransferResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!(%stage, "run interrupted");
                Err(StageFailure::new(stage, TransferError::Interrupted))
            }
            result = work => result.map_err(at(stage)),
        }
    }
}

fn enter(sink: &Arc<dyn TransferEventSink>, stage: Stage) {
    tracing::info!(%stage, "stage started");
    sink.on_event(TransferEvent::StageStarted { stage });
}

fn at(stage: Stage) -> impl FnOnce(TransferError) -> StageFailure {
    move |error| StageFailure::new(stage, error)
}

/// Close the session, then delete the archive. The first error wins; the
/// rest are logged.
async fn cleanup<S: RemoteSession>(state: &mut RunState<S>) -> TransferResult<()> {
    let mut first_error = None;

    if let Some(mut session) = state.session.take() {
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close session");
            first_error.get_or_insert(e);
        }
    }

    if let Some(archive) = state.archive.take() {
        let path = archive.path().display().to_string();
        match archive.remove() {
            Ok(()) => tracing::debug!(%path, "removed local archive"),
            Err(e) => {
                tracing::warn!(%path, error = %e, "failed to remove local archive");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

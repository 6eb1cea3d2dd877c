//! Run command - package, upload and unpack using the saved profile

use std::sync::Arc;

use anyhow::Result;
use dcr::domain::ports::{ProfileRepository, TransferEventSink};
use dcr::infrastructure::JsonEventSink;
use dcr::presentation::factory::create_transfer_use_case_with_exclude;
use dcr::TransferError;
use tokio_util::sync::CancellationToken;

use super::{load_connection, Interrupted, EXIT_INTERRUPTED};
use crate::ui::console::ConsoleEventSink;
use crate::ui::context::UiContext;
use crate::ui::theme::dim;

pub async fn cmd_run(
    ui: &UiContext,
    repo: &impl ProfileRepository,
    exclude: Vec<String>,
) -> Result<()> {
    let (record, profile) = load_connection(repo)?;
    let use_case = create_transfer_use_case_with_exclude(&record, exclude);

    let sink: Arc<dyn TransferEventSink> = if ui.json {
        Arc::new(JsonEventSink::stdout("run"))
    } else {
        eprintln!(
            "{}",
            dim(
                &format!(
                    "{} -> {}:{}",
                    profile.local_source().display(),
                    profile.target(),
                    profile.remote_destination()
                ),
                ui.color
            )
        );
        Arc::new(ConsoleEventSink::stderr(*ui))
    };

    let watcher = tokio::spawn(watch_interrupts(use_case.cancellation_token()));
    let outcome = use_case.run(&profile, sink).await;
    watcher.abort();

    match outcome.into_result() {
        Ok(_) => Ok(()),
        Err(failure) if matches!(failure.error, TransferError::Interrupted) => {
            Err(Interrupted.into())
        }
        Err(failure) => Err(failure.into()),
    }
}

/// First Ctrl-C cancels the run and lets cleanup finish. A second one
/// exits immediately.
async fn watch_interrupts(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        return;
    }
    tracing::warn!("interrupt received; cleaning up");
    cancel.cancel();

    if tokio::signal::ctrl_c().await.is_ok() {
        eprintln!("Interrupted");
        std::process::exit(i32::from(EXIT_INTERRUPTED));
    }
}

//! dcr CLI - package a local directory and deliver it over SSH
//!
//! Usage: dcr [COMMAND]
//!
//! Commands:
//!   run     Package, upload and unpack (default)
//!   config  Create or update the saved profile
//!   test    Check the connection and destination
//!   show    Print the saved profile
//!   reset   Delete the saved profile

mod commands;
mod ui;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dcr::presentation::{create_profile_repository, Cli, Commands};
use dcr::StageFailure;
use tracing_subscriber::EnvFilter;

use crate::commands::{Interrupted, EXIT_INTERRUPTED};
use crate::ui::context::UiContext;

/// How long shutdown waits for blocking workers left behind by an
/// interrupted run
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(dispatch(&cli));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is::<Interrupted>() => {
            eprintln!("Interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            match err.downcast_ref::<StageFailure>() {
                Some(failure) => eprintln!("{}", failure),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);
    let repo = create_profile_repository(cli.config_dir.clone())?;

    match cli.command_or_default() {
        Commands::Run { exclude } => commands::run::cmd_run(&ui, &repo, exclude).await,
        Commands::Config { skip_test } => {
            commands::configure::cmd_config(&ui, &repo, skip_test).await
        }
        Commands::Test => commands::test::cmd_test(&ui, &repo).await,
        Commands::Show => commands::show::cmd_show(&ui, &repo),
        Commands::Reset { yes } => commands::reset::cmd_reset(&ui, &repo, yes),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "dcr=info",
        2 => "dcr=debug",
        _ => "trace",
    }
}

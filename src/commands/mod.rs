//! Subcommand handlers. Each returns `anyhow::Result`; `main` maps errors
//! to exit codes.

pub mod configure;
pub mod reset;
pub mod run;
pub mod show;

use std::fmt;

use anyhow::{anyhow, Context, Result};
use dcr::domain::ports::ProfileRepository;
use dcr::{ConnectionProfile, ProfileRecord};

/// Exit status after Ctrl-C
pub const EXIT_INTERRUPTED: u8 = 130;

/// Returned when the user pressed Ctrl-C during a run.
#[derive(Debug)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Load the saved profile, failing with a hint when there is none.
pub(crate) fn load_profile(repo: &impl ProfileRepository) -> Result<ProfileRecord> {
    repo.load()
        .context("loading saved profile")?
        .ok_or_else(|| {
            anyhow!(
                "no saved profile at {}; run 'dcr config' first",
                repo.location().display()
            )
        })
}

/// Load and validate the saved profile.
pub(crate) fn load_connection(
    repo: &impl ProfileRepository,
) -> Result<(ProfileRecord, ConnectionProfile)> {
    let record = load_profile(repo)?;
    let profile = ConnectionProfile::try_from(&record)
        .with_context(|| format!("invalid profile at {}", repo.location().display()))?;
    Ok((record, profile))
}

//! Use Case Factory
//!
//! Wires the transfer use case to its production adapters.

use std::path::PathBuf;

use crate::application::{TransferOptions, TransferUseCase};
use crate::config::ProfileRecord;
use crate::error::ConfigError;
use crate::infrastructure::{SshConnector, SshOptions, TomlProfileRepository, ZipPackager};

/// The transfer use case with the zip packager and ssh2 connector
pub type ConcreteTransferUseCase = TransferUseCase<ZipPackager, SshConnector>;

/// Create a transfer use case configured from a saved profile.
pub fn create_transfer_use_case(record: &ProfileRecord) -> ConcreteTransferUseCase {
    create_transfer_use_case_with_exclude(record, Vec::<String>::new())
}

/// Like [`create_transfer_use_case`], with extra exclusion patterns for
/// this run only.
pub fn create_transfer_use_case_with_exclude<I, S>(
    record: &ProfileRecord,
    extra_exclude: I,
) -> ConcreteTransferUseCase
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options = TransferOptions::from_settings(&record.transfer).with_exclude(extra_exclude);
    let connector = SshConnector::new(SshOptions::from_settings(&record.transfer));
    TransferUseCase::new(ZipPackager::new(), connector, options)
}

/// Profile repository at `config_dir`, or the default location when absent.
pub fn create_profile_repository(
    config_dir: Option<PathBuf>,
) -> Result<TomlProfileRepository, ConfigError> {
    match config_dir {
        Some(dir) => Ok(TomlProfileRepository::new(dir)),
        None => TomlProfileRepository::from_env(),
    }
}

//! dcr - package a local directory and deliver it to a remote host over SSH
//!
//! One run archives the source directory, opens an authenticated SSH
//! session, checks the destination, uploads the archive over SFTP and
//! unpacks it remotely. Local and remote temporaries are removed on every
//! exit path.
//!
//! ## Layers
//!
//! - `domain` - entities, value objects and the ports the pipeline talks to
//! - `application` - the preflight validator and the transfer use case
//! - `infrastructure` - zip packager, ssh2 session, TOML profile store, event sinks
//! - `presentation` - CLI definitions and the use case factory

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{Outcome, PreflightValidator, StageFailure, TransferOptions, TransferUseCase};
pub use config::ProfileRecord;
pub use domain::entities::{ArchiveHandle, ConnectionProfile, Credential};
pub use domain::ports::{TransferEvent, TransferEventSink};
pub use domain::value_objects::{ExclusionSet, Stage};
pub use error::{ConfigError, ProfileError, TransferError, TransferResult};

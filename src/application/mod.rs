//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `TransferUseCase` - package, connect, validate, upload, unpack, clean up
//! - `PreflightValidator` - remote destination checks, shared by `run` and `test`

pub mod preflight;
pub mod remote_commands;
pub mod transfer;

pub use preflight::{PreflightValidator, ResolvedDestination};
pub use transfer::{Outcome, SinkProgress, StageFailure, TransferOptions, TransferUseCase};

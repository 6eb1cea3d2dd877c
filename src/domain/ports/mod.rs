//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod packager;
pub mod profile_repository;
pub mod remote_session;
pub mod transfer_events;

pub use packager::Packager;
pub use profile_repository::ProfileRepository;
pub use remote_session::{CommandOutput, RemoteSession, SessionConnector, SessionState};
pub use transfer_events::{
    NoopEventSink, ProgressObserver, ProgressSample, TransferEvent, TransferEventSink,
};

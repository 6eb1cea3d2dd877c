//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `archive/` - Zip packager
//! - `ssh/` - libssh2 connector and session
//! - `config/` - TOML profile repository
//! - `events/` - Event sinks (NDJSON, channel)

pub mod archive;
pub mod config;
pub mod events;
pub mod ssh;

// Re-export for convenience
pub use archive::ZipPackager;
pub use config::TomlProfileRepository;
pub use events::{ChannelEventSink, JsonEventSink};
pub use ssh::{SshConnector, SshOptions, SshSession};

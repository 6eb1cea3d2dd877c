//! SSH transport built on libssh2

mod connector;
mod host_keys;
mod session;

pub use connector::{SshConnector, SshOptions, DEFAULT_CHUNK_SIZE, DEFAULT_IO_TIMEOUT};
pub use host_keys::HostKeyPolicy;
pub use session::SshSession;

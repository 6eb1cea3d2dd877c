//! Domain Entities
//!
//! - `ConnectionProfile` - where data comes from and where it goes
//! - `ArchiveHandle` - a packaged archive owned by one run

mod archive;
mod profile;

pub use archive::ArchiveHandle;
pub use profile::{ConnectionProfile, Credential};

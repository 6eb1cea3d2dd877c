//! Domain Layer
//!
//! Entities, value objects and the ports the application layer drives.
//!
//! ## Structure
//!
//! - `entities/` - ConnectionProfile, ArchiveHandle
//! - `value_objects/` - ExclusionSet, Stage, remote path helpers
//! - `ports/` - Packager, RemoteSession, event sinks, profile storage
//!
//! Apart from the archive handle's cleanup and the local source check,
//! nothing here touches the file system or the network.

pub mod entities;
pub mod ports;
pub mod value_objects;

//! Value Objects
//!
//! Immutable types with no identity, compared by value.

pub mod exclusions;
pub mod remote_path;
pub mod stage;

pub use exclusions::{ExclusionError, ExclusionSet, DEFAULT_EXCLUSIONS};
pub use stage::Stage;

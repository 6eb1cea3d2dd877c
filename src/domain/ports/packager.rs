//! Packager Port
//!
//! Turns a local directory into a single archive file.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::domain::entities::ArchiveHandle;
use crate::domain::value_objects::ExclusionSet;
use crate::error::TransferResult;

/// Trait for archive builders
///
/// Implementations are blocking; async callers run them on the blocking
/// pool.
pub trait Packager: Send + Sync {
    /// Archive every non-excluded file under `source_dir` into `destination`.
    ///
    /// Fails with `NotFound` (creating nothing) when `source_dir` is not an
    /// existing directory. On any other failure no file is left at
    /// `destination`.
    ///
    /// `cancel` is polled between entries and between buffered reads; once
    /// it fires the partial archive is removed and `Interrupted` returned.
    fn compress(
        &self,
        source_dir: &Path,
        destination: &Path,
        exclusions: &ExclusionSet,
        cancel: &CancellationToken,
    ) -> TransferResult<ArchiveHandle>;
}

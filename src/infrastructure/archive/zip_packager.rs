//! Zip packager
//!
//! Walks the source tree in file-name order and streams every selected
//! file into a deflate-compressed zip archive.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path};

use chrono::{DateTime, Datelike, Local, Timelike};
use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::entities::ArchiveHandle;
use crate::domain::ports::Packager;
use crate::domain::value_objects::ExclusionSet;
use crate::error::{TransferError, TransferResult};

/// Deflate level used for every entry
const COMPRESSION_LEVEL: i32 = 9;

/// Entries at or above this size need zip64 headers
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Read buffer for copying one file into the archive
const COPY_BUFFER: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ZipPackager {
    pub fn new() -> Self {
        Self
    }
}

impl Packager for ZipPackager {
    fn compress(
        &self,
        source_dir: &Path,
        destination: &Path,
        exclusions: &ExclusionSet,
        cancel: &CancellationToken,
    ) -> TransferResult<ArchiveHandle> {
        match std::fs::metadata(source_dir) {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                return Err(TransferError::NotFound {
                    path: source_dir.to_path_buf(),
                })
            }
        }

        let entry_count = match write_archive(source_dir, destination, exclusions, cancel) {
            Ok(count) => count,
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(destination) {
                    if rm.kind() != io::ErrorKind::NotFound {
                        tracing::warn!(path = %destination.display(), error = %rm, "failed to remove partial archive");
                    }
                }
                return Err(e);
            }
        };

        let size = std::fs::metadata(destination)
            .map_err(|e| TransferError::io(format!("reading {}", destination.display()), e))?
            .len();

        tracing::info!(
            source = %source_dir.display(),
            archive = %destination.display(),
            entries = entry_count,
            bytes = size,
            "packaged source directory"
        );

        Ok(ArchiveHandle::new(destination.to_path_buf(), size, entry_count))
    }
}

fn write_archive(
    source_dir: &Path,
    destination: &Path,
    exclusions: &ExclusionSet,
    cancel: &CancellationToken,
) -> TransferResult<usize> {
    let file = File::create(destination)
        .map_err(|e| TransferError::io(format!("creating {}", destination.display()), e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let mut count = 0;

    let walker = WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(source_dir, entry, exclusions));

    for entry in walker {
        if cancel.is_cancelled() {
            return Err(TransferError::Interrupted);
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                tracing::warn!(
                    path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    "skipping dangling symlink"
                );
                continue;
            }
            Err(err) => {
                let context = match err.path() {
                    Some(path) => format!("walking {}", path.display()),
                    None => "walking source tree".to_string(),
                };
                return Err(TransferError::io(context, io::Error::other(err)));
            }
        };

        if !entry.file_type().is_file() || entry.path() == destination {
            continue;
        }

        let Some(name) = entry_name(source_dir, entry.path()) else {
            continue;
        };

        add_file(&mut writer, entry.path(), &name, cancel)?;
        count += 1;
    }

    let mut inner = writer
        .finish()
        .map_err(|e| TransferError::io("finalizing archive", zip_to_io(e)))?;
    inner.flush().map_err(|e| TransferError::io("finalizing archive", e))?;

    Ok(count)
}

fn add_file<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    cancel: &CancellationToken,
) -> TransferResult<()> {
    let read_err = |e| TransferError::io(format!("reading {}", path.display()), e);

    let mut source = File::open(path).map_err(read_err)?;
    let meta = source.metadata().map_err(read_err)?;

    let mut options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .large_file(meta.len() >= ZIP64_THRESHOLD);
    if let Some(time) = meta.modified().ok().and_then(zip_time) {
        options = options.last_modified_time(time);
    }
    if let Some(mode) = unix_mode(&meta) {
        options = options.unix_permissions(mode);
    }

    tracing::debug!(entry = name, bytes = meta.len(), "adding entry");

    writer
        .start_file(name, options)
        .map_err(|e| TransferError::io(format!("adding {}", name), zip_to_io(e)))?;

    let copy_err = |e| TransferError::io(format!("compressing {}", path.display()), e);
    let mut buf = vec![0u8; COPY_BUFFER];
    loop {
        if cancel.is_cancelled() {
            return Err(TransferError::Interrupted);
        }
        let n = match source.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(copy_err(e)),
        };
        writer.write_all(&buf[..n]).map_err(copy_err)?;
    }
}

/// Excluded entries are dropped here so excluded directories are never
/// descended into.
fn is_pruned(root: &Path, entry: &DirEntry, exclusions: &ExclusionSet) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    match entry.path().strip_prefix(root) {
        Ok(rel) => exclusions.is_excluded(rel, entry.file_type().is_dir()),
        Err(_) => false,
    }
}

fn is_dangling_link(err: &walkdir::Error) -> bool {
    err.loop_ancestor().is_none()
        && err
            .io_error()
            .map(|e| e.kind() == io::ErrorKind::NotFound)
            .unwrap_or(false)
        && err
            .path()
            .and_then(|p| std::fs::symlink_metadata(p).ok())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

/// `/`-separated path of `path` relative to `root`.
///
/// `None` for the root itself or anything that would not stay inside the
/// archive.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn zip_time(modified: std::time::SystemTime) -> Option<zip::DateTime> {
    let local: DateTime<Local> = modified.into();
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}

#[cfg(unix)]
fn unix_mode(meta: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(_meta: &std::fs::Metadata) -> Option<u32> {
    None
}

fn zip_to_io(err: zip::result::ZipError) -> io::Error {
    match err {
        zip::result::ZipError::Io(e) => e,
        other => io::Error::other(other),
    }
}

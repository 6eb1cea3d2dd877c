//! Remote command builders
//!
//! Every command the transfer sends to the remote shell. Paths are always
//! single-quoted; the remote is assumed to run a POSIX `sh`.

use crate::domain::value_objects::remote_path::{join, shell_quote};

/// Name of the uploaded archive inside the destination directory
pub const UPLOAD_FILE_NAME: &str = ".dcr-upload.zip";

/// Prefix of the sentinel file written by the permission probe
pub const WRITE_PROBE_PREFIX: &str = ".dcr-write-probe-";

/// Printed by `dir_exists` when the directory is present
pub const EXISTS_MARKER: &str = "EXISTS";

pub const HOME_QUERY: &str = "echo $HOME";

pub fn dir_exists(dir: &str) -> String {
    format!(
        "test -d {} && echo {} || echo NOT_EXISTS",
        shell_quote(dir),
        EXISTS_MARKER
    )
}

pub fn make_dir(dir: &str) -> String {
    format!("mkdir -p {}", shell_quote(dir))
}

/// Create and delete a sentinel file; fails when `dir` is not writable.
pub fn write_probe(dir: &str, token: &str) -> String {
    let probe = shell_quote(&join(dir, &format!("{}{}", WRITE_PROBE_PREFIX, token)));
    format!("touch {} && rm -f {}", probe, probe)
}

pub fn tool_available(tool: &str) -> String {
    format!("command -v {}", shell_quote(tool))
}

/// Extract the uploaded archive into `dest`, overwriting existing files.
///
/// The archive is removed whether or not extraction succeeds, and the
/// command exits non-zero if either step failed.
pub fn unpack(dest: &str) -> String {
    let archive = shell_quote(UPLOAD_FILE_NAME);
    format!(
        "cd {} || exit 1; unzip -o -q {}; status=$?; rm -f {} || status=1; exit $status",
        shell_quote(dest),
        archive,
        archive
    )
}

pub fn remove_file(path: &str) -> String {
    format!("rm -f {}", shell_quote(path))
}

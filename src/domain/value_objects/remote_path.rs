//! Remote (POSIX) path helpers
//!
//! Remote paths are plain strings: the remote host is assumed to be POSIX
//! regardless of the local platform, so `std::path` is the wrong tool.

/// Quote a string for safe use as one POSIX shell word.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Join a remote directory and a file name with exactly one `/`.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", dir.trim_end_matches('/'), name.trim_start_matches('/'))
}

/// Whether the path needs `$HOME` expansion before SFTP can use it.
pub fn needs_home_expansion(path: &str) -> bool {
    path == "~" || path.starts_with("~/")
}

/// Expand a leading `~` against the given remote home.
pub fn expand_home(path: &str, home: &str) -> String {
    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        join(home, rest)
    } else {
        path.to_string()
    }
}

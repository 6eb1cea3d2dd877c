//! Exclusion set value object
//!
//! Decides which entries of a source tree stay out of the archive, using
//! gitignore semantics from the `ignore` crate.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fmt;
use std::path::Path;

/// Patterns every exclusion set starts with.
///
/// Version-control metadata, dependency caches, build output, editor
/// metadata, OS metadata files and logs.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    ".vscode",
    ".idea",
    "dist",
    "build",
    "*.log",
    ".DS_Store",
    "Thumbs.db",
];

/// Maximum number of caller-supplied patterns
const MAX_PATTERNS: usize = 1000;

/// Ordered set of glob patterns matched against paths relative to the
/// source root.
///
/// A pattern without a `/` matches an entry name at any depth; a pattern
/// containing `/` is anchored to the root. Defaults can be extended but
/// never removed: negated (`!pattern`) lines are rejected.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    matcher: Gitignore,
    patterns: Vec<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ExclusionSet {
    /// The built-in defaults only.
    pub fn defaults() -> Self {
        // Defaults are static and known-valid
        match Self::build(DEFAULT_EXCLUSIONS.iter().map(|p| p.to_string()).collect()) {
            Ok(set) => set,
            Err(e) => unreachable!("default exclusions must compile: {e}"),
        }
    }

    /// Defaults plus `extra`, in that order.
    pub fn with_patterns<I, S>(extra: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<String> = DEFAULT_EXCLUSIONS.iter().map(|p| p.to_string()).collect();

        let mut added = 0;
        for raw in extra {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('!') {
                return Err(ExclusionError::NegationNotAllowed {
                    pattern: trimmed.to_string(),
                });
            }
            added += 1;
            if added > MAX_PATTERNS {
                return Err(ExclusionError::TooManyPatterns {
                    count: added,
                    limit: MAX_PATTERNS,
                });
            }
            patterns.push(trimmed.to_string());
        }

        Self::build(patterns)
    }

    fn build(patterns: Vec<String>) -> Result<Self, ExclusionError> {
        // Root is irrelevant: callers always pass relative paths
        let mut builder = GitignoreBuilder::new("");
        for pattern in &patterns {
            builder
                .add_line(None, pattern)
                .map_err(|e| ExclusionError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        let matcher = builder
            .build()
            .map_err(|e| ExclusionError::BuildFailed(e.to_string()))?;

        Ok(Self { matcher, patterns })
    }

    /// Check whether an entry is excluded.
    ///
    /// `rel_path` is relative to the source root. An entry inside an
    /// excluded directory is excluded too.
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        if rel_path.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    /// Patterns in match order (defaults first).
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Number of patterns beyond the defaults.
    pub fn extra_count(&self) -> usize {
        self.patterns.len() - DEFAULT_EXCLUSIONS.len()
    }
}

/// Errors raised while building an exclusion set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionError {
    /// `!pattern` would re-include something the defaults exclude
    NegationNotAllowed { pattern: String },
    /// Too many caller-supplied patterns
    TooManyPatterns { count: usize, limit: usize },
    /// A pattern has invalid glob syntax
    InvalidPattern { pattern: String, message: String },
    /// The matcher could not be built
    BuildFailed(String),
}

impl fmt::Display for ExclusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegationNotAllowed { pattern } => write!(
                f,
                "exclusion '{}' is negated; default exclusions cannot be bypassed",
                pattern
            ),
            Self::TooManyPatterns { count, limit } => {
                write!(f, "{} exclusion patterns exceed the {} limit", count, limit)
            }
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid exclusion pattern '{}': {}", pattern, message)
            }
            Self::BuildFailed(msg) => write!(f, "failed to build exclusion matcher: {}", msg),
        }
    }
}

impl std::error::Error for ExclusionError {}

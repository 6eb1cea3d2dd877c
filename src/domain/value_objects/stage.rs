//! Transfer stages

use std::fmt;

/// One named step of a transfer run.
///
/// Stages only move forward; a failure is always attributed to the stage
/// in which it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Packaging,
    Connecting,
    Validating,
    Uploading,
    RemoteUnpacking,
    CleaningUp,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::Packaging,
        Stage::Connecting,
        Stage::Validating,
        Stage::Uploading,
        Stage::RemoteUnpacking,
        Stage::CleaningUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Packaging => "Packaging",
            Stage::Connecting => "Connecting",
            Stage::Validating => "Validating",
            Stage::Uploading => "Uploading",
            Stage::RemoteUnpacking => "RemoteUnpacking",
            Stage::CleaningUp => "CleaningUp",
        }
    }

    /// Short lowercase label for event streams.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Packaging => "packaging",
            Stage::Connecting => "connecting",
            Stage::Validating => "validating",
            Stage::Uploading => "uploading",
            Stage::RemoteUnpacking => "unpacking",
            Stage::CleaningUp => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

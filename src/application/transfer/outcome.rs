//! Transfer Outcome

use std::fmt;

use crate::domain::value_objects::Stage;
use crate::error::TransferError;

/// A failure attributed to the stage it happened in.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: TransferError,
}

impl StageFailure {
    pub fn new(stage: Stage, error: TransferError) -> Self {
        Self { stage, error }
    }
}

/// `<Stage>: <ErrorKind>: <message>`
impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.stage, self.error.kind(), self.error)
    }
}

impl std::error::Error for StageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of one transfer run
#[derive(Debug)]
pub enum Outcome {
    Success { bytes_transferred: u64 },
    Failure { stage: Stage, error: TransferError },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { stage, .. } => Some(*stage),
        }
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<u64, StageFailure> {
        match self {
            Outcome::Success { bytes_transferred } => Ok(bytes_transferred),
            Outcome::Failure { stage, error } => Err(StageFailure::new(stage, error)),
        }
    }
}

impl From<StageFailure> for Outcome {
    fn from(failure: StageFailure) -> Self {
        Outcome::Failure {
            stage: failure.stage,
            error: failure.error,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { bytes_transferred } => {
                write!(f, "transferred {} bytes", bytes_transferred)
            }
            Outcome::Failure { stage, error } => {
                write!(f, "{}: {}: {}", stage, error.kind(), error)
            }
        }
    }
}

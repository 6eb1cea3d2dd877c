//! Transfer Event Port
//!
//! Provides an observable interface for transfer runs.
//! Enables progress bars, JSON event streams, and debugging.

use crate::domain::value_objects::Stage;

/// One upload progress reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSample {
    pub bytes_transferred: u64,
    pub bytes_total: u64,
}

impl ProgressSample {
    pub fn new(bytes_transferred: u64, bytes_total: u64) -> Self {
        Self {
            bytes_transferred,
            bytes_total,
        }
    }

    /// Completion in the 0.0..=1.0 range. An empty upload is complete.
    pub fn fraction(&self) -> f64 {
        if self.bytes_total == 0 {
            1.0
        } else {
            (self.bytes_transferred as f64 / self.bytes_total as f64).min(1.0)
        }
    }
}

/// Receives upload progress.
///
/// Called from the upload task, possibly off the async executor, so it
/// must not block.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, sample: ProgressSample);
}

/// Event emitted during a transfer run
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// A stage began
    StageStarted { stage: Stage },

    /// The archive is ready
    Packaged { size: u64, entry_count: usize },

    /// The session is authenticated
    Connected { target: String },

    /// Preflight passed; `destination` is the resolved remote path
    Validated { destination: String, created: bool },

    /// Upload progress
    Progress(ProgressSample),

    /// Run finished successfully
    Succeeded { bytes_transferred: u64 },

    /// Run failed
    Failed {
        stage: Stage,
        kind: &'static str,
        message: String,
    },
}

/// Trait for receiving transfer events
///
/// Implementations can be:
/// - ConsoleEventSink: progress bar in the terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - ChannelEventSink: forwards events to an async consumer
/// - NoopEventSink: silent operation
pub trait TransferEventSink: Send + Sync {
    fn on_event(&self, event: TransferEvent);

    /// Whether per-chunk `Progress` events are wanted
    fn wants_progress(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl TransferEventSink for NoopEventSink {
    fn on_event(&self, _event: TransferEvent) {}

    fn wants_progress(&self) -> bool {
        false
    }
}

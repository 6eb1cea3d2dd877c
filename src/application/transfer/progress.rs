//! Upload progress forwarding

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::ports::{ProgressObserver, ProgressSample, TransferEvent, TransferEventSink};

/// Turns upload samples into `TransferEvent::Progress`.
///
/// A sample that would move backwards is dropped, so the sink always sees
/// a non-decreasing sequence.
pub struct SinkProgress {
    sink: Arc<dyn TransferEventSink>,
    high_water: AtomicU64,
}

impl SinkProgress {
    pub fn new(sink: Arc<dyn TransferEventSink>) -> Self {
        Self {
            sink,
            high_water: AtomicU64::new(0),
        }
    }
}

impl ProgressObserver for SinkProgress {
    fn on_progress(&self, sample: ProgressSample) {
        let previous = self
            .high_water
            .fetch_max(sample.bytes_transferred, Ordering::AcqRel);
        if sample.bytes_transferred < previous {
            return;
        }
        if self.sink.wants_progress() {
            self.sink.on_event(TransferEvent::Progress(sample));
        }
    }
}

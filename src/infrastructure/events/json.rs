//! JSON Event Sink
//!
//! Outputs transfer events as NDJSON for CI/automation consumption.

use crate::domain::ports::{TransferEvent, TransferEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    command: &'static str,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            command,
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl TransferEventSink for JsonEventSink {
    fn on_event(&self, event: TransferEvent) {
        let command = self.command;
        let json = match event {
            TransferEvent::StageStarted { stage } => {
                serde_json::json!({
                    "event": "stage",
                    "command": command,
                    "stage": stage.label(),
                })
            }

            TransferEvent::Packaged { size, entry_count } => {
                serde_json::json!({
                    "event": "packaged",
                    "command": command,
                    "bytes": size,
                    "entries": entry_count,
                })
            }

            TransferEvent::Connected { target } => {
                serde_json::json!({
                    "event": "connected",
                    "command": command,
                    "target": target,
                })
            }

            TransferEvent::Validated {
                destination,
                created,
            } => {
                serde_json::json!({
                    "event": "validated",
                    "command": command,
                    "destination": destination,
                    "created": created,
                })
            }

            TransferEvent::Progress(sample) => {
                serde_json::json!({
                    "event": "progress",
                    "command": command,
                    "transferred": sample.bytes_transferred,
                    "total": sample.bytes_total,
                })
            }

            TransferEvent::Succeeded { bytes_transferred } => {
                serde_json::json!({
                    "event": "complete",
                    "command": command,
                    "status": "success",
                    "bytes": bytes_transferred,
                })
            }

            TransferEvent::Failed {
                stage,
                kind,
                message,
            } => {
                serde_json::json!({
                    "event": "complete",
                    "command": command,
                    "status": "failed",
                    "stage": stage.as_str(),
                    "kind": kind,
                    "message": message,
                })
            }
        };

        self.write_event(json);
    }
}

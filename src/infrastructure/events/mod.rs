//! Event Sink Implementations
//!
//! Provides concrete implementations of TransferEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - ChannelEventSink: forwards events over a tokio channel

mod channel;
mod json;

pub use channel::ChannelEventSink;
pub use json::JsonEventSink;

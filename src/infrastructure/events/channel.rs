//! Channel Event Sink
//!
//! Hands events to an async consumer over an unbounded tokio channel.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::ports::{TransferEvent, TransferEventSink};

pub struct ChannelEventSink {
    tx: UnboundedSender<TransferEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, UnboundedReceiver<TransferEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TransferEventSink for ChannelEventSink {
    fn on_event(&self, event: TransferEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.tx.send(event);
    }
}

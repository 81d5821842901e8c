use serde::Serialize;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

/// Events held per subscriber before new ones are dropped
pub const EVENT_BACKLOG: usize = 1024;

/// Notification published after a buffer mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BufferEvent {
    Inserted { id: u64, clock: u64 },
    Evicted { id: u64, score: f64 },
    Queried { id: u64, usage: u32, score: f64 },
    Rescored { clock: u64, items: usize },
    Cleared { removed: usize },
}

/// Fan-out of events to any number of receivers. Delivery is best-effort:
/// a full backlog drops the event, and a receiver that has been dropped is
/// pruned on the next publish.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Vec<SyncSender<BufferEvent>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> Receiver<BufferEvent> {
        let (tx, rx) = sync_channel(EVENT_BACKLOG);
        self.senders.push(tx);
        rx
    }

    pub(crate) fn publish(&mut self, event: BufferEvent) {
        self.senders.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

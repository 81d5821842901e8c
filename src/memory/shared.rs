use parking_lot::Mutex;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use super::config::{ConfigError, RetentionConfig};
use super::entry::Item;
use super::events::BufferEvent;
use super::retention::{BufferStats, InsertOutcome, RetentionBuffer, SnapshotEntry};
use super::selector::Selector;

/// Cloneable handle that serializes every operation behind one lock
#[derive(Clone)]
pub struct SharedBuffer {
    inner: Arc<Mutex<RetentionBuffer>>,
}

impl SharedBuffer {
    pub fn new(config: RetentionConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_buffer(RetentionBuffer::new(config)?))
    }

    pub fn from_buffer(buffer: RetentionBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    pub fn insert(&self, text: impl Into<String>, confidence: f64, decay_rate: f64) -> InsertOutcome {
        self.inner.lock().insert(text, confidence, decay_rate)
    }

    pub fn advance_clock(&self, delta: u64, decay_rate: f64) {
        self.inner.lock().advance_clock(delta, decay_rate)
    }

    /// The selector runs while the lock is held and must not call back into
    /// this buffer; the lock is not reentrant and doing so deadlocks.
    pub fn query(&self, selector: &mut dyn Selector) -> Option<Item> {
        self.inner.lock().query(selector)
    }

    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.inner.lock().snapshot()
    }

    pub fn clear(&self) -> usize {
        self.inner.lock().clear()
    }

    pub fn subscribe(&self) -> Receiver<BufferEvent> {
        self.inner.lock().subscribe()
    }

    pub fn stats(&self) -> BufferStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Runs `f` with exclusive access for multi-step sequences. Use the
    /// `&mut RetentionBuffer` it is given; touching this handle from inside
    /// `f` deadlocks.
    pub fn with<R>(&self, f: impl FnOnce(&mut RetentionBuffer) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

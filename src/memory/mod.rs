//! Scored retention buffer: bounded storage with decaying relevance.

pub mod config;
pub mod entry;
pub mod events;
pub mod retention;
pub mod scoring;
pub mod selector;
pub mod shared;

pub use config::{ConfigError, RetentionConfig};
pub use entry::Item;
pub use events::BufferEvent;
pub use retention::{BufferStats, Eviction, InsertOutcome, RetentionBuffer, SnapshotEntry};
pub use selector::{ByIdSelector, RandomSelector, RoundRobinSelector, Selector};
pub use shared::SharedBuffer;

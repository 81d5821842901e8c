//! SCTM: a fixed-capacity memory whose items carry a relevance score that
//! decays over a logical clock and is boosted by use. Inserting into a full
//! buffer evicts the weakest item.

pub mod memory;
pub mod sim;
pub mod telemetry;

pub use memory::{
    BufferEvent, ConfigError, Item, RetentionBuffer, RetentionConfig, Selector, SharedBuffer,
    SnapshotEntry,
};

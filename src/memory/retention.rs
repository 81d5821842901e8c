//! Fixed-capacity store of scored items.
//!
//! Relevance decays over a logical clock, queries boost it, and inserting
//! into a full buffer evicts the weakest item first.

use serde::Serialize;
use std::cmp::Ordering;
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

use super::config::{ConfigError, RetentionConfig};
use super::entry::Item;
use super::events::{BufferEvent, Subscribers};
use super::selector::Selector;

/// Identity of an item removed under capacity pressure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eviction {
    pub id: u64,
    pub score: f64,
    pub text: String,
}

/// Result of an insertion
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub item: Item,
    pub evicted: Option<Eviction>,
}

/// One row of a snapshot, ordered by score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    #[serde(flatten)]
    pub item: Item,
    /// Item carries the most recently assigned id
    pub is_latest: bool,
    /// Score is under the configured fading threshold
    pub is_fading: bool,
}

pub struct RetentionBuffer {
    items: Vec<Item>, // Insertion order
    config: RetentionConfig,
    decay_rate: f64, // Rate used by the most recent rescoring
    clock: u64,
    next_id: u64,
    evictions: u64,
    queries: u64,
    subscribers: Subscribers,
}

impl RetentionBuffer {
    pub fn new(config: RetentionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            items: Vec::new(),
            decay_rate: config.decay_rate,
            clock: 0,
            next_id: config.first_id,
            evictions: 0,
            queries: 0,
            subscribers: Subscribers::default(),
            config,
        })
    }

    /// Buffer with the default configuration and the given capacity
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::new(RetentionConfig::default().with_capacity(capacity))
    }

    /// Stores a new item, evicting the lowest scoring one if the buffer is full
    pub fn insert(&mut self, text: impl Into<String>, confidence: f64, decay_rate: f64) -> InsertOutcome {
        let evicted = if self.items.len() >= self.config.capacity {
            self.evict_lowest_scoring()
        } else {
            None
        };

        let id = self.next_id;
        self.next_id += 1;
        self.decay_rate = decay_rate;

        let item = Item::new(id, text.into(), confidence, self.clock, decay_rate);
        debug!(id, clock = self.clock, confidence, "item inserted");
        self.items.push(item.clone());
        self.subscribers.publish(BufferEvent::Inserted { id, clock: self.clock });

        InsertOutcome { item, evicted }
    }

    /// Moves the logical clock forward and rescores every item
    pub fn advance_clock(&mut self, delta: u64, decay_rate: f64) {
        self.clock = self.clock.saturating_add(delta);
        self.decay_rate = decay_rate;

        for item in self.items.iter_mut() {
            item.rescore(decay_rate, self.clock);
        }

        debug!(clock = self.clock, delta, decay_rate, items = self.items.len(), "buffer rescored");
        self.subscribers.publish(BufferEvent::Rescored {
            clock: self.clock,
            items: self.items.len(),
        });
    }

    /// Touches the item picked by `selector` and returns its updated state
    pub fn query(&mut self, selector: &mut dyn Selector) -> Option<Item> {
        let index = selector.select(&self.items)?;
        let item = self.items.get_mut(index)?;

        item.touch(
            self.clock,
            self.config.confidence_boost,
            self.config.confidence_cap,
            self.decay_rate,
        );
        self.queries += 1;

        let item = item.clone();
        debug!(id = item.id(), usage = item.usage(), score = item.score(), "item queried");
        self.subscribers.publish(BufferEvent::Queried {
            id: item.id(),
            usage: item.usage(),
            score: item.score(),
        });
        Some(item)
    }

    /// Items ordered by descending score, ties by ascending id
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let latest = self.latest_id();
        let mut ranked: Vec<&Item> = self.items.iter().collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()).then(a.id().cmp(&b.id())));

        ranked
            .into_iter()
            .map(|item| SnapshotEntry {
                is_latest: Some(item.id()) == latest,
                is_fading: item.score() < self.config.fading_threshold,
                item: item.clone(),
            })
            .collect()
    }

    /// Drops every item; the clock and id sequence carry on
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        info!(removed, "buffer cleared");
        self.subscribers.publish(BufferEvent::Cleared { removed });
        removed
    }

    /// Registers a receiver for buffer events
    pub fn subscribe(&mut self) -> Receiver<BufferEvent> {
        self.subscribers.subscribe()
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Most recently assigned id, if any item was ever inserted
    pub fn latest_id(&self) -> Option<u64> {
        (self.next_id > self.config.first_id).then(|| self.next_id - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Removes the minimum-score item (lowest id on ties)
    fn evict_lowest_scoring(&mut self) -> Option<Eviction> {
        let (index, _) = self
            .items
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| weaker_first(a, b))?;

        let removed = self.items.remove(index);
        self.evictions += 1;

        info!(id = removed.id(), score = removed.score(), "evicted lowest scoring item");
        self.subscribers.publish(BufferEvent::Evicted {
            id: removed.id(),
            score: removed.score(),
        });

        Some(Eviction {
            id: removed.id(),
            score: removed.score(),
            text: removed.text().to_string(),
        })
    }

    /// Returns buffer statistics
    pub fn stats(&self) -> BufferStats {
        let count = self.items.len();
        let mean = |total: f64| if count == 0 { 0.0 } else { total / count as f64 };

        BufferStats {
            total_items: count,
            capacity: self.config.capacity,
            clock: self.clock,
            avg_score: mean(self.items.iter().map(Item::score).sum()),
            avg_confidence: mean(self.items.iter().map(Item::confidence).sum()),
            total_usage: self.items.iter().map(|item| item.usage() as u64).sum(),
            evictions: self.evictions,
            queries: self.queries,
        }
    }
}

fn weaker_first(a: &Item, b: &Item) -> Ordering {
    a.score().total_cmp(&b.score()).then(a.id().cmp(&b.id()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferStats {
    pub total_items: usize,
    pub capacity: usize,
    pub clock: u64,
    pub avg_score: f64,
    pub avg_confidence: f64,
    pub total_usage: u64,
    pub evictions: u64,
    pub queries: u64,
}

use serde::Serialize;

use super::scoring;

/// A single retained item in the buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: u64,           // Assigned once at insertion, never reused
    text: String,      // Opaque payload
    confidence: f64,   // Trust weight, raised by queries
    usage: u32,        // Number of times queried
    last_touched: u64, // Logical clock at insertion or last query
    score: f64,        // Cached output of the scoring function
}

impl Item {
    /// Creates a fresh item stamped at the given clock value
    pub(crate) fn new(id: u64, text: String, confidence: f64, clock: u64, decay_rate: f64) -> Self {
        let mut item = Self {
            id,
            text,
            confidence,
            usage: 0,
            last_touched: clock,
            score: 0.0,
        };
        item.rescore(decay_rate, clock);
        item
    }

    // Getters
    pub fn id(&self) -> u64 { self.id }
    pub fn text(&self) -> &str { &self.text }
    pub fn confidence(&self) -> f64 { self.confidence }
    pub fn usage(&self) -> u32 { self.usage }
    pub fn last_touched(&self) -> u64 { self.last_touched }
    pub fn score(&self) -> f64 { self.score }

    /// Logical time elapsed since the item was last touched
    pub fn elapsed_at(&self, clock: u64) -> f64 {
        clock as f64 - self.last_touched as f64
    }

    /// Recomputes the cached score against the given clock
    pub(crate) fn rescore(&mut self, decay_rate: f64, clock: u64) {
        self.score = scoring::score(self.confidence, self.usage, decay_rate, self.elapsed_at(clock));
    }

    /// Records a query hit: bumps usage, refreshes the timestamp and boosts confidence
    pub(crate) fn touch(&mut self, clock: u64, boost: f64, cap: f64, decay_rate: f64) {
        self.usage = self.usage.saturating_add(1);
        self.last_touched = clock;
        self.confidence = (self.confidence + boost).min(cap);
        self.rescore(decay_rate, clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new(7, "Env: Prod".to_string(), 0.8, 15, 0.05);
        assert_eq!(item.id(), 7);
        assert_eq!(item.text(), "Env: Prod");
        assert_eq!(item.usage(), 0);
        assert_eq!(item.last_touched(), 15);
        assert_eq!(item.score(), 0.0); // log2(1 + 0) kills the score
    }

    #[test]
    fn test_touch_boosts_and_caps() {
        let mut item = Item::new(1, "IP: 10.0.0.1".to_string(), 0.95, 0, 0.05);
        item.touch(20, 0.1, 1.0, 0.05);
        assert_eq!(item.usage(), 1);
        assert_eq!(item.last_touched(), 20);
        assert_eq!(item.confidence(), 1.0);
        assert!((item.score() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rescore_uses_elapsed() {
        let mut item = Item::new(1, "Backup: On".to_string(), 0.8, 0, 0.05);
        item.touch(0, 0.0, 1.0, 0.05);
        item.rescore(0.05, 10);
        assert!((item.score() - 0.8 * (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(item.elapsed_at(10), 10.0);
    }
}

//! Strategies for choosing which item a query touches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::entry::Item;

/// Picks one of the buffer's items by position
pub trait Selector {
    /// Returns an index into `items`, or `None` to select nothing
    fn select(&mut self, items: &[Item]) -> Option<usize>;
}

impl<F> Selector for F
where
    F: FnMut(&[Item]) -> Option<usize>,
{
    fn select(&mut self, items: &[Item]) -> Option<usize> {
        self(items)
    }
}

/// Uniformly random choice
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible selection sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector for RandomSelector {
    fn select(&mut self, items: &[Item]) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(0..items.len()))
    }
}

/// Cycles through positions in insertion order
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    cursor: usize,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for RoundRobinSelector {
    fn select(&mut self, items: &[Item]) -> Option<usize> {
        if items.is_empty() {
            return None;
        }
        let index = self.cursor % items.len();
        self.cursor = index + 1;
        Some(index)
    }
}

/// Selects the item carrying a specific id
#[derive(Debug, Clone, Copy)]
pub struct ByIdSelector(pub u64);

impl Selector for ByIdSelector {
    fn select(&mut self, items: &[Item]) -> Option<usize> {
        items.iter().position(|item| item.id() == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u64) -> Vec<Item> {
        (1..=n)
            .map(|id| Item::new(id, format!("fact {id}"), 0.8, 0, 0.05))
            .collect()
    }

    #[test]
    fn test_empty_selects_nothing() {
        assert_eq!(RandomSelector::seeded(1).select(&[]), None);
        assert_eq!(RoundRobinSelector::new().select(&[]), None);
        assert_eq!(ByIdSelector(1).select(&[]), None);
    }

    #[test]
    fn test_random_stays_in_bounds() {
        let items = items(5);
        let mut selector = RandomSelector::seeded(42);
        for _ in 0..100 {
            assert!(selector.select(&items).unwrap() < items.len());
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let items = items(8);
        let mut a = RandomSelector::seeded(7);
        let mut b = RandomSelector::seeded(7);
        for _ in 0..20 {
            assert_eq!(a.select(&items), b.select(&items));
        }
    }

    #[test]
    fn test_round_robin_wraps() {
        let items = items(3);
        let mut selector = RoundRobinSelector::new();
        let picks: Vec<_> = (0..5).filter_map(|_| selector.select(&items)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_by_id() {
        let items = items(4);
        assert_eq!(ByIdSelector(3).select(&items), Some(2));
        assert_eq!(ByIdSelector(99).select(&items), None);
    }

    #[test]
    fn test_closure_selector() {
        let items = items(4);
        let mut last = |items: &[Item]| items.len().checked_sub(1);
        assert_eq!(last.select(&items), Some(3));
    }
}

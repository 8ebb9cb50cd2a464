//! Bounded best-K retention.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A scored catalog key.
///
/// Ordering is by score, then by key reversed, so that "greater" means
/// "ranks higher": equal scores rank the lexicographically smaller key first.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub key: String,
    pub score: f64,
}

impl Scored {
    pub fn new(key: impl Into<String>, score: f64) -> Self {
        Self {
            key: key.into(),
            score,
        }
    }
}

impl Eq for Scored {}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.key.cmp(&self.key))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort best-first.
pub fn rank(items: &mut [Scored]) {
    items.sort_unstable_by(|a, b| b.cmp(a));
}

/// Fixed-capacity min-heap keeping the best `capacity` items seen.
#[derive(Debug)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<Reverse<Scored>>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offer an item; the worst one is evicted once full.
    pub fn push(&mut self, item: Scored) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
            return;
        }
        if let Some(Reverse(worst)) = self.heap.peek()
            && item > *worst
        {
            self.heap.pop();
            self.heap.push(Reverse(item));
        }
    }

    pub fn merge(&mut self, other: TopK) {
        for Reverse(item) in other.heap {
            self.push(item);
        }
    }

    /// Retained items, best first.
    pub fn into_ranked(self) -> Vec<Scored> {
        let mut items: Vec<Scored> = self.heap.into_iter().map(|Reverse(s)| s).collect();
        rank(&mut items);
        items
    }
}

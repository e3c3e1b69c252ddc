use crate::error::SearchError;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct FrontierEntry<T> {
    priority: f64,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for FrontierEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for FrontierEntry<T> {}

impl<T> PartialOrd for FrontierEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for FrontierEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped so the max-heap pops the lowest priority,
        // earlier insertions first on ties.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority open list, stable under equal priority.
#[derive(Debug)]
pub struct Frontier<T> {
    heap: BinaryHeap<FrontierEntry<T>>,
    pushed: u64,
}

impl<T> Default for Frontier<T> {
    fn default() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            pushed: 0,
        }
    }
}

impl<T> Frontier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: f64, item: T) {
        debug_assert!(priority >= 0.0, "negative frontier priority {priority}");
        self.heap.push(FrontierEntry {
            priority,
            sequence: self.pushed,
            item,
        });
        self.pushed += 1;
    }

    pub fn pop_min(&mut self) -> Result<T, SearchError> {
        self.heap
            .pop()
            .map(|entry| entry.item)
            .ok_or(SearchError::EmptyFrontier)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

//! Deferred operations keyed by the time they become due.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Scheduled<T> {
    due: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so the max-heap pops the earliest due item first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of items by due time; items with equal due times come out in
/// the order they were scheduled.
pub struct DelayedQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    next_seq: u64,
}

impl<T> DelayedQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: f64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, item });
    }

    /// Removes and returns every item due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut ready = Vec::new();
        while self.heap.peek().is_some_and(|next| next.due <= now) {
            if let Some(scheduled) = self.heap.pop() {
                ready.push(scheduled.item);
            }
        }
        ready
    }

    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|s| s.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for DelayedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_time() {
        let mut queue = DelayedQueue::new();
        queue.schedule(1.0, "a");
        assert!(queue.drain_due(0.99).is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(1.0));
    }

    #[test]
    fn test_drains_in_due_order() {
        let mut queue = DelayedQueue::new();
        queue.schedule(3.0, "c");
        queue.schedule(1.0, "a");
        queue.schedule(2.0, "b");

        assert_eq!(queue.drain_due(2.5), vec!["a", "b"]);
        assert_eq!(queue.drain_due(3.0), vec!["c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_due_times_keep_schedule_order() {
        let mut queue = DelayedQueue::new();
        for i in 0..10 {
            queue.schedule(5.0, i);
        }
        assert_eq!(queue.drain_due(5.0), (0..10).collect::<Vec<_>>());
    }
}

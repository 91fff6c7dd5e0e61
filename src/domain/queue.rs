//! Min-priority queue over task names
//!
//! Entries are keyed by [`OrderKey`] and an insertion sequence, so equal keys
//! always come out in the order they went in. The queue never owns tasks; it
//! may hold stale entries for tasks that were completed or compacted away,
//! which are discarded lazily when they reach the front.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::task::OrderKey;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    key: OrderKey,
    seq: u64,
    name: String,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, key: OrderKey, seq: u64) {
        self.heap.push(Reverse(QueueEntry {
            key,
            seq,
            name: name.into(),
        }));
    }

    /// Returns the name at the front of the queue for which `is_live` holds.
    ///
    /// Stale entries in front of it are popped and dropped. The live entry
    /// stays in the heap, so asking again without intervening mutation is
    /// O(1) and yields the same name.
    pub fn peek_live<F>(&mut self, mut is_live: F) -> Option<&str>
    where
        F: FnMut(&str) -> bool,
    {
        while let Some(Reverse(front)) = self.heap.peek() {
            if is_live(&front.name) {
                break;
            }
            self.heap.pop();
        }

        self.heap.peek().map(|Reverse(entry)| entry.name.as_str())
    }

    /// Replaces the contents with exactly the given entries
    pub fn rebuild<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, OrderKey, u64)>,
        S: Into<String>,
    {
        self.heap = entries
            .into_iter()
            .map(|(name, key, seq)| {
                Reverse(QueueEntry {
                    key,
                    seq,
                    name: name.into(),
                })
            })
            .collect();
    }

    /// Number of entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(priority: i64, day: u32) -> OrderKey {
        OrderKey {
            priority,
            due_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        }
    }

    #[test]
    fn empty_queue_has_no_front() {
        let mut queue = TaskQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek_live(|_| true), None);
    }

    #[test]
    fn front_is_lowest_priority_then_earliest_date() {
        let mut queue = TaskQueue::new();
        queue.push("late", key(1, 20), 0);
        queue.push("low", key(5, 1), 1);
        queue.push("early", key(1, 2), 2);

        assert_eq!(queue.peek_live(|_| true), Some("early"));
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut queue = TaskQueue::new();
        queue.push("second", key(1, 1), 7);
        queue.push("first", key(1, 1), 3);

        assert_eq!(queue.peek_live(|_| true), Some("first"));
        assert_eq!(queue.peek_live(|_| true), Some("first"));
    }

    #[test]
    fn stale_entries_are_dropped_lazily() {
        let mut queue = TaskQueue::new();
        queue.push("done-1", key(1, 1), 0);
        queue.push("done-2", key(1, 2), 1);
        queue.push("live", key(2, 1), 2);
        queue.push("later", key(3, 1), 3);

        let front = queue
            .peek_live(|name| !name.starts_with("done"))
            .map(str::to_string);
        assert_eq!(front.as_deref(), Some("live"));
        assert_eq!(queue.len(), 2);

        // Live front is kept in place
        assert_eq!(queue.peek_live(|_| true), Some("live"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn all_stale_empties_queue() {
        let mut queue = TaskQueue::new();
        queue.push("a", key(1, 1), 0);
        queue.push("b", key(2, 1), 1);

        assert_eq!(queue.peek_live(|_| false), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn rebuild_replaces_contents() {
        let mut queue = TaskQueue::new();
        queue.push("old", key(0, 1), 0);

        queue.rebuild([("b", key(2, 1), 1), ("a", key(1, 1), 2)]);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek_live(|_| true), Some("a"));
    }
}

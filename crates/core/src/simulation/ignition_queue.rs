//! Pending ignition event queue
//!
//! A min-priority queue of scheduled ignitions ordered by time, then row, then
//! column, which makes pop order fully deterministic.
//!
//! # Design
//!
//! - **Lazy deletion**: a cell may have several events queued as better
//!   candidates are found. Superseded events stay in the heap and are dropped by
//!   the driver when popped for a cell that already left `Unburned`.
//! - **Counters** for pushed, committed and discarded events feed the run summary.

use crate::core_types::units::Seconds;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A scheduled ignition of one cell
#[derive(Debug, Clone, Copy)]
pub struct PendingIgnition {
    /// When the cell should catch fire
    pub ignite_time: Seconds,
    /// Target row
    pub row: usize,
    /// Target column
    pub col: usize,
    /// Travel delay from the neighbour that produced this event
    pub travel_delay: Seconds,
}

impl PendingIgnition {
    /// Create a new event
    pub fn new(ignite_time: Seconds, row: usize, col: usize, travel_delay: Seconds) -> Self {
        Self {
            ignite_time,
            row,
            col,
            travel_delay,
        }
    }
}

impl PartialEq for PendingIgnition {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingIgnition {}

impl PartialOrd for PendingIgnition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingIgnition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ignite_time
            .cmp(&other.ignite_time)
            .then(self.row.cmp(&other.row))
            .then(self.col.cmp(&other.col))
            .then(self.travel_delay.cmp(&other.travel_delay))
    }
}

/// Min-heap of pending ignitions with bookkeeping counters
#[derive(Debug, Default)]
pub struct IgnitionQueue {
    heap: BinaryHeap<Reverse<PendingIgnition>>,
    pushed: u64,
    committed: u64,
    discarded: u64,
}

impl IgnitionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event
    pub fn push(&mut self, event: PendingIgnition) {
        self.pushed += 1;
        self.heap.push(Reverse(event));
    }

    /// Pop the earliest event if it is due at or before `now`
    pub fn pop_due(&mut self, now: Seconds) -> Option<PendingIgnition> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.ignite_time <= now => self.heap.pop().map(|Reverse(e)| e),
            _ => None,
        }
    }

    /// Time of the earliest pending event
    pub fn next_time(&self) -> Option<Seconds> {
        self.heap.peek().map(|Reverse(e)| e.ignite_time)
    }

    /// Count an event that ignited its target
    pub fn note_committed(&mut self) {
        self.committed += 1;
    }

    /// Count a stale event dropped at pop time
    pub fn note_discarded(&mut self) {
        self.discarded += 1;
    }

    /// Events still queued (including stale ones)
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no events are queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total events ever pushed
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Events that ignited their target
    pub fn committed(&self) -> u64 {
        self.committed
    }

    /// Stale events dropped
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Snapshot of queued events in pop order
    pub fn pending(&self) -> Vec<PendingIgnition> {
        let mut events: Vec<_> = self.heap.iter().map(|Reverse(e)| *e).collect();
        events.sort_unstable();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(t: f64, row: usize, col: usize) -> PendingIgnition {
        PendingIgnition::new(Seconds::new(t), row, col, Seconds::new(1.0))
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut q = IgnitionQueue::new();
        q.push(ev(30.0, 0, 0));
        q.push(ev(10.0, 5, 5));
        q.push(ev(20.0, 1, 1));

        assert_eq!(q.pop_due(Seconds::new(100.0)), Some(ev(10.0, 5, 5)));
        assert_eq!(q.pop_due(Seconds::new(100.0)), Some(ev(20.0, 1, 1)));
        assert_eq!(q.pop_due(Seconds::new(100.0)), Some(ev(30.0, 0, 0)));
        assert!(q.is_empty());
        assert_eq!(q.pushed(), 3);
    }

    #[test]
    fn test_ties_break_on_row_then_col() {
        let mut q = IgnitionQueue::new();
        q.push(ev(5.0, 2, 0));
        q.push(ev(5.0, 1, 3));
        q.push(ev(5.0, 1, 1));

        let order: Vec<_> = std::iter::from_fn(|| q.pop_due(Seconds::new(5.0)))
            .map(|e| (e.row, e.col))
            .collect();
        assert_eq!(order, vec![(1, 1), (1, 3), (2, 0)]);
    }

    #[test]
    fn test_future_events_stay_queued() {
        let mut q = IgnitionQueue::new();
        q.push(ev(15.0, 0, 0));
        assert_eq!(q.pop_due(Seconds::new(10.0)), None);
        assert_eq!(q.next_time(), Some(Seconds::new(15.0)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_counters() {
        let mut q = IgnitionQueue::new();
        q.push(ev(1.0, 0, 0));
        q.note_committed();
        q.note_discarded();
        q.note_discarded();
        assert_eq!((q.pushed(), q.committed(), q.discarded()), (1, 1, 2));
        assert_eq!(q.pending(), vec![ev(1.0, 0, 0)]);
    }

    #[test]
    fn test_equality_agrees_with_ordering() {
        let never = ev(f64::NAN, 3, 4);
        assert_eq!(never, never);
        assert_eq!(never.cmp(&never), Ordering::Equal);

        assert_ne!(ev(-0.0, 0, 0), ev(0.0, 0, 0));
        assert!(ev(-0.0, 0, 0) < ev(0.0, 0, 0));
    }
}

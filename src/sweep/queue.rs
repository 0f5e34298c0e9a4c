//! The event queue: halfsegments discovered mid-sweep, waiting their turn.

use std::collections::VecDeque;

use crate::geom::Halfsegment;

/// A priority queue of pending halfsegment events, smallest-first in
/// halfsegment order.
///
/// Implemented as a sorted vector: the sweep pops from the front and
/// inserts with an upper-bound binary search, so equal events drain in
/// insertion order. Inside a strip the queue stays short, and the vector
/// trades worst-case complexity for cache friendliness.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Halfsegment>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, keeping the queue sorted.
    ///
    /// Events equal to `h` (by endpoints) stay in front of it.
    pub fn insert(&mut self, h: Halfsegment) {
        let idx = self
            .events
            .binary_search_by(|e| {
                if e <= &h {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Greater
                }
            })
            .unwrap_or_else(|idx| idx);
        self.events.insert(idx, h);
    }

    /// The smallest pending event, if any.
    pub fn peek(&self) -> Option<&Halfsegment> {
        self.events.front()
    }

    /// Remove and return the smallest pending event.
    pub fn pop(&mut self) -> Option<Halfsegment> {
        self.events.pop_front()
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Is the queue empty?
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

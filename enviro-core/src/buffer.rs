//! Insertion-Ordered Measurement History
//!
//! ## Overview
//!
//! Each store variable keeps its samples in a [`History`]: a deque ordered
//! oldest-first. Unlike a ring buffer, appends never silently overwrite;
//! the store decides when to drop old data and drops it in bulk (see
//! [`crate::store`]), which keeps the per-append cost to a single push.
//!
//! ## Why `VecDeque`?
//!
//! Bulk trimming removes a prefix. A `Vec` would shift every remaining
//! element on each trim, while `VecDeque::drain(..n)` only moves the head
//! index, so a one-day trim of a one-week history costs the drop of the
//! trimmed elements and nothing more.
//!
//! ## Lenient Queries
//!
//! Queries never fail. A live dashboard asking for "the last 1000 samples"
//! two minutes after boot gets the samples that exist:
//!
//! ```text
//! len = 10
//! last(5)          -> samples 5..=9
//! last(1000)       -> samples 0..=9
//! range(7, 2)      -> range(2, 7) -> samples 2..=7
//! range(0, 1000)   -> span > len  -> samples 0..=9
//! range(8, 12)     -> end >= len  -> samples 8..=9
//! ```
//!
//! ```rust
//! use enviro_core::buffer::History;
//! use enviro_core::{Measurement, Variable};
//!
//! let mut history = History::new();
//! for t in 0..10 {
//!     history.push(Measurement::new(Variable::Light, t as f64, t));
//! }
//! assert_eq!(history.last_n(3).len(), 3);
//! assert_eq!(history.range(0, 1000).len(), 10);
//! ```

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::measurement::Measurement;

/// Oldest-first sequence of measurements for one variable
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: VecDeque<Measurement>,
}

impl History {
    pub const fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Append the newest sample
    pub fn push(&mut self, measurement: Measurement) {
        self.samples.push_back(measurement);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&Measurement> {
        self.samples.back()
    }

    /// Remove up to `count` of the oldest samples, returning how many were removed
    pub fn trim_oldest(&mut self, count: usize) -> usize {
        let removed = count.min(self.samples.len());
        self.samples.drain(..removed);
        removed
    }

    /// The most recent `count` samples, oldest first
    pub fn last_n(&self, count: usize) -> Vec<Measurement> {
        let skip = self.samples.len().saturating_sub(count);
        self.samples.iter().skip(skip).copied().collect()
    }

    /// Inclusive index range, resolved leniently (see module docs)
    pub fn range(&self, start: usize, end: usize) -> Vec<Measurement> {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let len = self.samples.len();
        let span = end.saturating_sub(start).saturating_add(1);

        if span > len {
            return self.samples.iter().copied().collect();
        }

        let stop = if end >= len { len } else { end + 1 };
        if start >= stop {
            return Vec::new();
        }

        self.samples.range(start..stop).copied().collect()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.samples.iter()
    }
}

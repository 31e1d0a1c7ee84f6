//! Fixed-capacity sample history
//!
//! A [`BoundedSeries`] keeps the newest `capacity` samples in chronological
//! order. Pushing into a full series evicts the oldest sample first, so the
//! buffer always describes a sliding window ending at the latest reading.

use alloc::collections::VecDeque;

/// Sliding window of samples with FIFO eviction.
///
/// The capacity is chosen at runtime (it is the display width in pixels, one
/// bar per sample), so the storage comes from the heap rather than a const
/// generic buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedSeries {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl BoundedSeries {
    /// Create an empty series holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample at the tail.
    ///
    /// Returns the evicted sample when the series was already full.
    pub fn push(&mut self, value: f32) -> Option<f32> {
        if self.capacity == 0 {
            return Some(value);
        }

        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from the oldest to the newest sample.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Smallest and largest sample, or `None` for an empty series.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.iter();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
    }

    /// Arithmetic mean of the newest `count` samples.
    ///
    /// Returns `None` when `count` is zero or the series holds fewer samples.
    pub fn mean_of_last(&self, count: usize) -> Option<f32> {
        if count == 0 || self.samples.len() < count {
            return None;
        }

        let sum: f32 = self.samples.iter().rev().take(count).sum();
        Some(sum / count as f32)
    }
}

//! Sampling cadence
//!
//! A tick is one sampling period measured from the start of the iteration.
//! Runners poll in short slices so they can service input while waiting.

/// Default polling slice while waiting for the next tick
pub const DEFAULT_POLL_MS: u32 = 100;

/// Millisecond clock, monotonic since boot.
pub trait Monotonic {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPacer {
    pub period_ms: u64,
    pub poll_ms: u32,
}

impl TickPacer {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            poll_ms: DEFAULT_POLL_MS,
        }
    }

    /// Time left in the tick that began at `start_ms`, or `None` once it is over.
    ///
    /// The result is capped at `poll_ms`, so callers can sleep for it directly.
    pub fn remaining(&self, start_ms: u64, now_ms: u64) -> Option<u32> {
        let elapsed = now_ms.saturating_sub(start_ms);
        let left = self.period_ms.checked_sub(elapsed).filter(|left| *left > 0)?;
        Some(left.min(self.poll_ms as u64) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_is_capped_by_poll_slice() {
        let pacer = TickPacer::new(10_000);

        assert_eq!(pacer.remaining(1_000, 1_000), Some(100));
        assert_eq!(pacer.remaining(1_000, 10_950), Some(50));
        assert_eq!(pacer.remaining(1_000, 11_000), None);
        assert_eq!(pacer.remaining(1_000, 20_000), None);
    }

    #[test]
    fn test_clock_behind_start_waits_full_slice() {
        let pacer = TickPacer::new(500);
        assert_eq!(pacer.remaining(1_000, 900), Some(100));
    }
}

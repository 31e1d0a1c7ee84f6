use log::debug;

use super::BoundedSeries;
use crate::sensors::Reading;

/// Outcome of appending one reading to the [`SampleAggregator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationEvent {
    /// A new downsampled point was pushed to the long-term series
    pub long_term_updated: bool,
    /// The value of that point, when one was produced
    pub long_term_value: Option<f32>,
}

impl AggregationEvent {
    const NONE: Self = Self {
        long_term_updated: false,
        long_term_value: None,
    };

    fn updated(value: f32) -> Self {
        Self {
            long_term_updated: true,
            long_term_value: Some(value),
        }
    }
}

/// Two-tier temperature history
///
/// Holds a high-resolution series with one sample per sampling period and a
/// downsampled series with one sample per aggregation window. Both are capped
/// at the display width.
///
/// ## Downsampling
///
/// Every `window` appends (counted by a monotonically increasing counter) the
/// mean of the newest `window` recent samples becomes one long-term sample.
/// With the default 10 s period the window is 90 samples, i.e. one long-term
/// point every 15 minutes.
#[derive(Debug, Clone)]
pub struct SampleAggregator {
    recent: BoundedSeries,
    long_term: BoundedSeries,
    /// Number of appends so far
    counter: u64,
    /// Recent samples folded into each long-term sample (always >= 1)
    window: usize,
}

impl SampleAggregator {
    /// Create an aggregator with both series capped at `capacity`.
    ///
    /// `window` must be at least 1; [`crate::config::ThermoConfig::validate`]
    /// guarantees this for configured values.
    pub fn new(capacity: usize, window: usize) -> Self {
        Self {
            recent: BoundedSeries::new(capacity),
            long_term: BoundedSeries::new(capacity),
            counter: 0,
            window: window.max(1),
        }
    }

    /// Record the temperature of `reading` and downsample when a window closes.
    pub fn append(&mut self, reading: &Reading) -> AggregationEvent {
        self.recent.push(reading.temperature);
        self.counter += 1;

        if self.counter % self.window as u64 != 0 {
            return AggregationEvent::NONE;
        }

        match self.recent.mean_of_last(self.window) {
            Some(mean) => {
                self.long_term.push(mean);
                debug!(
                    "Long-term point #{} = {:.2} (window of {} samples)",
                    self.counter / self.window as u64,
                    mean,
                    self.window
                );
                AggregationEvent::updated(mean)
            }
            None => AggregationEvent::NONE,
        }
    }

    /// High-resolution history, one sample per sampling period.
    pub fn recent(&self) -> &BoundedSeries {
        &self.recent
    }

    /// Downsampled history, one mean per aggregation window.
    pub fn long_term(&self) -> &BoundedSeries {
        &self.long_term
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

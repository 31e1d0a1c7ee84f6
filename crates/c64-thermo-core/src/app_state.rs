//! Loop-owned state and error types for the thermometer

use core::fmt::{Debug, Write};

use thiserror_no_std::Error;

use crate::config::{ConfigError, Settings};
use crate::render::Fingerprint;
use crate::sensors::{Reading, SensorError};
use crate::storage::{GraphSource, SampleAggregator};

/// What the screen is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Boot splash, before the first reading
    Splash,
    /// Live dashboard
    Live,
    /// Splash shown again in the middle of a live session
    SplashInterrupt,
}

/// Everything the main loop mutates between iterations.
///
/// Owned by the loop and lent to the aggregator, change detector and
/// renderers; there is no global state.
#[derive(Debug)]
pub struct AppState {
    pub aggregator: SampleAggregator,
    /// Last fingerprint rendered; `None` forces the next redraw
    pub fingerprint: Option<Fingerprint>,
    /// Most recent successful reading
    pub last_reading: Option<Reading>,
    /// 1-based number of the next iteration
    pub iteration: u64,
    pub screen: Screen,
    pub graph_source: GraphSource,
}

impl AppState {
    pub fn new(settings: &Settings<'_>) -> Self {
        Self {
            aggregator: SampleAggregator::new(
                settings.series_capacity,
                settings.aggregation_window,
            ),
            fingerprint: None,
            last_reading: None,
            iteration: 1,
            screen: Screen::Splash,
            graph_source: settings.graph_source,
        }
    }

    /// Forget what was rendered so the dashboard is drawn unconditionally.
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Sensor error: {0}")]
    Sensor(SensorError),
    #[error("Display error: {0}")]
    Display(heapless::String<64>),
    #[error("Configuration error: {0}")]
    Config(ConfigError),
}

impl From<SensorError> for AppError {
    fn from(error: SensorError) -> Self {
        Self::Sensor(error)
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl AppError {
    /// Wrap a backend-specific canvas error, keeping its debug text.
    pub fn display<E: Debug>(error: E) -> Self {
        let mut text = heapless::String::new();
        // Truncated output is still useful
        write!(text, "{:?}", error).ok();
        Self::Display(text)
    }
}

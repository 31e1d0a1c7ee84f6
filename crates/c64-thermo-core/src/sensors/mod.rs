//! Sensor abstraction
//!
//! The thermometer only needs one combined temperature/humidity measurement per
//! loop iteration. Concrete sensors (the SHT40 driver in the firmware, the
//! synthetic generator in the simulator) implement [`Sensor`].

use thiserror_no_std::Error;

/// A single temperature/humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
    /// Milliseconds on the device's monotonic clock when the reading was taken
    pub timestamp_ms: u64,
}

impl Reading {
    pub const fn new(temperature: f32, humidity: f32, timestamp_ms: u64) -> Self {
        Self {
            temperature,
            humidity,
            timestamp_ms,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: {operation} failed ({details})")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
    #[error("{sensor}: measurement checksum mismatch")]
    Checksum { sensor: &'static str },
    #[error("{sensor}: not responding")]
    NotResponding { sensor: &'static str },
}

/// Blocking temperature/humidity sensor.
///
/// There is no timeout around `measure`; a sensor that never returns stalls the
/// loop that calls it.
pub trait Sensor {
    /// Take one measurement.
    fn measure(&mut self) -> Result<Reading, SensorError>;
}

impl<S: Sensor + ?Sized> Sensor for &mut S {
    fn measure(&mut self) -> Result<Reading, SensorError> {
        (**self).measure()
    }
}

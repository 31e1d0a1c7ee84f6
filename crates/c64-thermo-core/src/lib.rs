//! Hardware-independent core of the C64-styled thermometer.
//!
//! Samples temperature and humidity on a fixed period, keeps a recent and a
//! downsampled long-term history sized to the display width, and draws a
//! retro dashboard through the [`display::Canvas`] trait. Sensors, canvases,
//! publishers, delays and random sources are all injected, so the same loop
//! runs on the ESP32 firmware and in the desktop simulator.

#![no_std]

extern crate alloc;

pub mod app_state;
pub mod config;
pub mod display;
pub mod pacing;
pub mod publish;
pub mod render;
pub mod sensors;
pub mod storage;
pub mod thermometer;

#[cfg(test)]
mod testing;

pub use app_state::{AppError, AppState, Screen};
pub use config::{NetworkConfig, SensorFailurePolicy, Settings, ThermoConfig};
pub use sensors::{Reading, Sensor, SensorError};
pub use thermometer::{StepReport, Thermometer};

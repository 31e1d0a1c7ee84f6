use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::storage::GraphSource;

const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

/// What the loop runner does when a measurement fails
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SensorFailurePolicy {
    /// Log the failure and try again on the next tick
    #[default]
    RetryNextTick,
    /// Stop the loop and hand the error back to the caller
    Abort,
}

/// User-facing thermometer configuration.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct ThermoConfig<'a> {
    /// Seconds between two sensor readings. Better if it divides 60.
    pub sampling_period_secs: u32,
    pub display_width: u32,
    pub display_height: u32,
    /// Recent samples folded into one long-term sample.
    /// Defaults to a quarter hour worth of samples.
    pub aggregation_window: Option<u32>,
    /// The splash screen interrupts the dashboard with probability
    /// `1 / splash_one_in` per iteration. Zero disables it.
    pub splash_one_in: u32,
    pub graph_source: GraphSource,
    pub sensor_failure_policy: SensorFailurePolicy,
    /// First segment of every MQTT topic
    pub device_class: &'a str,
}

impl Default for ThermoConfig<'_> {
    fn default() -> Self {
        Self {
            sampling_period_secs: 10,
            display_width: 160,
            display_height: 128,
            aggregation_window: None,
            splash_one_in: 32,
            graph_source: GraphSource::Recent,
            sensor_failure_policy: SensorFailurePolicy::RetryNextTick,
            device_class: "64-thermometer",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sampling period must be at least one second")]
    ZeroSamplingPeriod,
    #[error("display size {width}x{height} has a zero dimension")]
    EmptyDisplay { width: u32, height: u32 },
    #[error("aggregation window must be at least 1 sample (got {0})")]
    EmptyAggregationWindow(u32),
    #[error("device class must not be empty")]
    EmptyDeviceClass,
    #[error("configured display {configured:?} does not match the {actual:?} panel")]
    DisplayMismatch {
        configured: (u32, u32),
        actual: (u32, u32),
    },
}

/// Validated runtime settings derived from a [`ThermoConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings<'a> {
    pub sampling_period_ms: u32,
    pub display_width: u32,
    pub display_height: u32,
    /// History capacity, one sample per pixel column
    pub series_capacity: usize,
    /// Recent samples per long-term sample, always >= 1
    pub aggregation_window: usize,
    /// Recent samples per color band (one minute)
    pub recent_color_step: usize,
    /// Long-term samples per color band (one hour)
    pub long_term_color_step: usize,
    pub splash_one_in: u32,
    pub graph_source: GraphSource,
    pub sensor_failure_policy: SensorFailurePolicy,
    pub device_class: &'a str,
}

impl<'a> ThermoConfig<'a> {
    /// Samples taken per hour at the configured period.
    pub const fn samples_per_hour(&self) -> u32 {
        if self.sampling_period_secs == 0 {
            0
        } else {
            SECONDS_PER_HOUR / self.sampling_period_secs
        }
    }

    /// Check the invariants the loop relies on and derive the runtime settings.
    ///
    /// Configuration errors are only ever reported here, at startup.
    pub fn validate(&self) -> Result<Settings<'a>, ConfigError> {
        if self.sampling_period_secs == 0 {
            return Err(ConfigError::ZeroSamplingPeriod);
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(ConfigError::EmptyDisplay {
                width: self.display_width,
                height: self.display_height,
            });
        }
        if self.device_class.is_empty() {
            return Err(ConfigError::EmptyDeviceClass);
        }

        let samples_per_hour = self.samples_per_hour();
        let window = self
            .aggregation_window
            .unwrap_or(samples_per_hour / 4);
        if window == 0 {
            return Err(ConfigError::EmptyAggregationWindow(window));
        }

        let recent_color_step = (SECONDS_PER_MINUTE / self.sampling_period_secs).max(1);
        let long_term_color_step = (samples_per_hour / window).max(1);

        Ok(Settings {
            sampling_period_ms: self.sampling_period_secs.saturating_mul(1000),
            display_width: self.display_width,
            display_height: self.display_height,
            series_capacity: self.display_width as usize,
            aggregation_window: window as usize,
            recent_color_step: recent_color_step as usize,
            long_term_color_step: long_term_color_step as usize,
            splash_one_in: self.splash_one_in,
            graph_source: self.graph_source,
            sensor_failure_policy: self.sensor_failure_policy,
            device_class: self.device_class,
        })
    }
}

impl Settings<'_> {
    /// The history holds one sample per pixel column, so the configured size
    /// must be the size of the panel actually drawn on.
    pub fn check_display(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if (width, height) != (self.display_width, self.display_height) {
            return Err(ConfigError::DisplayMismatch {
                configured: (self.display_width, self.display_height),
                actual: (width, height),
            });
        }
        Ok(())
    }

    /// Color band width for the given graph source.
    pub const fn color_step(&self, source: GraphSource) -> usize {
        match source {
            GraphSource::Recent => self.recent_color_step,
            GraphSource::LongTerm => self.long_term_color_step,
        }
    }
}

/// Network credentials for the firmware build.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct NetworkConfig<'a> {
    pub internet: InternetConfig<'a>,
    pub mqtt: MqttConfig<'a>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MqttConfig<'a> {
    /// Broker IPv4 address in dotted notation
    pub broker: &'a str,
    pub port: u16,
}

impl Default for MqttConfig<'_> {
    fn default() -> Self {
        Self {
            broker: "",
            port: 1883,
        }
    }
}

impl MqttConfig<'_> {
    /// Publishing is optional; an empty broker turns it off.
    pub fn is_enabled(&self) -> bool {
        !self.broker.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ThermoConfig::default().validate().unwrap();

        assert_eq!(settings.sampling_period_ms, 10_000);
        assert_eq!(settings.series_capacity, 160);
        // 360 samples per hour, a quarter of it per long-term point
        assert_eq!(settings.aggregation_window, 90);
        assert_eq!(settings.recent_color_step, 6);
        assert_eq!(settings.long_term_color_step, 4);
        assert_eq!(settings.color_step(GraphSource::LongTerm), 4);
    }

    #[test]
    fn test_explicit_window_overrides_default() {
        let config = ThermoConfig {
            aggregation_window: Some(3),
            ..Default::default()
        };
        let settings = config.validate().unwrap();
        assert_eq!(settings.aggregation_window, 3);
        assert_eq!(settings.long_term_color_step, 120);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let config = ThermoConfig {
            aggregation_window: Some(0),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyAggregationWindow(0))
        );
    }

    #[test]
    fn test_long_period_leaves_no_default_window() {
        // One sample every 20 minutes is 3 per hour; a quarter of that is 0.
        let config = ThermoConfig {
            sampling_period_secs: 1200,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyAggregationWindow(0))
        );
    }

    #[test]
    fn test_slow_sampling_keeps_color_step_positive() {
        let config = ThermoConfig {
            sampling_period_secs: 120,
            aggregation_window: Some(1),
            ..Default::default()
        };
        let settings = config.validate().unwrap();
        assert_eq!(settings.recent_color_step, 1);
    }

    #[test]
    fn test_invalid_display_and_period() {
        let no_width = ThermoConfig {
            display_width: 0,
            ..Default::default()
        };
        assert_eq!(
            no_width.validate(),
            Err(ConfigError::EmptyDisplay {
                width: 0,
                height: 128
            })
        );

        let no_period = ThermoConfig {
            sampling_period_secs: 0,
            ..Default::default()
        };
        assert_eq!(no_period.validate(), Err(ConfigError::ZeroSamplingPeriod));
    }

    #[test]
    fn test_display_must_match_panel() {
        let settings = ThermoConfig {
            display_width: 200,
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(settings.check_display(200, 128), Ok(()));
        assert_eq!(
            settings.check_display(160, 128),
            Err(ConfigError::DisplayMismatch {
                configured: (200, 128),
                actual: (160, 128)
            })
        );
    }

    #[test]
    fn test_mqtt_disabled_without_broker() {
        let network = NetworkConfig::default();
        assert!(!network.mqtt.is_enabled());
        assert_eq!(network.mqtt.port, 1883);
    }
}

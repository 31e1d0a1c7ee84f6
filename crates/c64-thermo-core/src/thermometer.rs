//! The thermometer main loop
//!
//! [`Thermometer`] ties the sensor, history, change detection, rendering and
//! publishing together. It does one iteration per [`Thermometer::step`]; the
//! caller owns the clock and decides how to wait for the next tick (blocking
//! delay, async timer, or an event loop that keeps a window responsive).
//!
//! ```text
//!   start()             step() ...
//!  [Splash] ───────────▶ [Live] ──(1/splash_one_in)──▶ [SplashInterrupt]
//!                          ▲                                  │
//!                          └──────── fingerprint reset ───────┘
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};
use rand_core::RngCore;

use crate::app_state::{AppError, AppState, Screen};
use crate::config::{SensorFailurePolicy, Settings};
use crate::display::{Canvas, Palette};
use crate::publish::{Publisher, keys};
use crate::render::splash::BOOT_COMMANDS;
use crate::render::{ChangeDetector, Dashboard, Fingerprint, Splash};
use crate::sensors::{Reading, Sensor};
use crate::storage::{AggregationEvent, BoundedSeries, GraphSource};

/// What one iteration did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub reading: Reading,
    /// The dashboard was drawn this iteration
    pub redrawn: bool,
    /// The splash screen interrupted the dashboard this iteration
    pub splash_shown: bool,
    pub aggregation: AggregationEvent,
}

pub struct Thermometer<'a, C, S, P, D, R>
where
    C: Canvas,
{
    settings: Settings<'a>,
    state: AppState,
    canvas: C,
    palette: Palette<C::Color>,
    sensor: S,
    publisher: Option<P>,
    delay: D,
    rng: R,
}

impl<'a, C, S, P, D, R> Thermometer<'a, C, S, P, D, R>
where
    C: Canvas,
    S: Sensor,
    P: Publisher,
    D: DelayNs,
    R: RngCore,
{
    /// Fails with [`ConfigError::DisplayMismatch`] when the settings were made
    /// for a different panel size than `canvas`.
    ///
    /// [`ConfigError::DisplayMismatch`]: crate::config::ConfigError::DisplayMismatch
    pub fn new(
        settings: Settings<'a>,
        canvas: C,
        sensor: S,
        publisher: Option<P>,
        delay: D,
        rng: R,
    ) -> Result<Self, AppError> {
        settings.check_display(canvas.width(), canvas.height())?;

        let palette = Palette::for_canvas(&canvas);
        Ok(Self {
            state: AppState::new(&settings),
            settings,
            canvas,
            palette,
            sensor,
            publisher,
            delay,
            rng,
        })
    }

    /// Show the boot splash and switch to the live dashboard.
    pub fn start(&mut self) -> Result<(), AppError> {
        self.state.screen = Screen::Splash;
        self.show_splash()?;
        self.state.screen = Screen::Live;
        info!(
            "Thermometer live: period {} ms, window {} samples, graph {}",
            self.settings.sampling_period_ms,
            self.settings.aggregation_window,
            self.state.graph_source.label()
        );
        Ok(())
    }

    /// Run one loop iteration.
    ///
    /// A sensor failure is returned before anything is recorded or drawn.
    pub fn step(&mut self) -> Result<StepReport, AppError> {
        let iteration = self.state.iteration;
        self.state.iteration += 1;

        let reading = self.sensor.measure()?;
        let aggregation = self.state.aggregator.append(&reading);
        self.state.last_reading = Some(reading);
        self.publish(&reading, &aggregation);

        let splash_shown = iteration > 1 && self.roll_splash();
        if splash_shown {
            info!("Splash interrupt on iteration {}", iteration);
            self.state.screen = Screen::SplashInterrupt;
            self.show_splash()?;
            self.state.screen = Screen::Live;
            self.state.invalidate();
        }

        let (redraw, fingerprint) = ChangeDetector::should_redraw(&reading, self.state.fingerprint);
        if redraw {
            self.render(&reading)?;
            self.state.fingerprint = Some(fingerprint);
        }

        let recent = self.state.aggregator.recent();
        let long_term = self.state.aggregator.long_term();
        debug!(
            "iteration {}: {:.1} C {:.1} %, recent {} {:?}, long-term {} {:?}",
            iteration,
            reading.temperature,
            reading.humidity,
            recent.len(),
            recent.min_max(),
            long_term.len(),
            long_term.min_max()
        );

        Ok(StepReport {
            reading,
            redrawn: redraw,
            splash_shown,
            aggregation,
        })
    }

    /// Run one iteration and apply the configured [`SensorFailurePolicy`].
    ///
    /// Returns `Ok(None)` when a failed measurement is skipped until the next
    /// tick. Display errors are always returned.
    pub fn tick(&mut self) -> Result<Option<StepReport>, AppError> {
        match self.step() {
            Ok(report) => Ok(Some(report)),
            Err(AppError::Sensor(e))
                if self.settings.sensor_failure_policy == SensorFailurePolicy::RetryNextTick =>
            {
                error!("Sensor read failed, retrying next tick: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Draw the dashboard for the last reading right away, outside the tick.
    ///
    /// Returns `false` when there is nothing to show yet.
    pub fn redraw(&mut self) -> Result<bool, AppError> {
        let Some(reading) = self.state.last_reading else {
            return Ok(false);
        };
        self.render(&reading)?;
        self.state.fingerprint = Some(Fingerprint::of(&reading));
        Ok(true)
    }

    /// Select the series drawn by the graph. Forces a redraw on change.
    pub fn set_graph_source(&mut self, source: GraphSource) {
        if self.state.graph_source != source {
            info!("Graph source: {}", source.label());
            self.state.graph_source = source;
            self.state.invalidate();
        }
    }

    pub fn toggle_graph_source(&mut self) -> GraphSource {
        let source = self.state.graph_source.toggled();
        self.set_graph_source(source);
        source
    }

    /// Tear the publisher down. The loop must not be stepped afterwards.
    pub fn shutdown(&mut self) {
        if let Some(publisher) = self.publisher.as_mut() {
            info!("Closing publisher");
            publisher.close();
        }
    }

    pub fn settings(&self) -> &Settings<'a> {
        &self.settings
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn publisher(&self) -> Option<&P> {
        self.publisher.as_ref()
    }

    /// Series the graph currently draws.
    pub fn graph_series(&self) -> &BoundedSeries {
        match self.state.graph_source {
            GraphSource::Recent => self.state.aggregator.recent(),
            GraphSource::LongTerm => self.state.aggregator.long_term(),
        }
    }

    fn roll_splash(&mut self) -> bool {
        let one_in = self.settings.splash_one_in;
        one_in != 0 && self.rng.next_u32() % one_in == 0
    }

    fn show_splash(&mut self) -> Result<(), AppError> {
        Splash::show(
            &mut self.canvas,
            &self.palette,
            &mut self.delay,
            &mut self.rng,
            &BOOT_COMMANDS,
        )
        .map_err(AppError::display)
    }

    fn render(&mut self, reading: &Reading) -> Result<(), AppError> {
        let color_step = self.settings.color_step(self.state.graph_source);
        let series = match self.state.graph_source {
            GraphSource::Recent => self.state.aggregator.recent(),
            GraphSource::LongTerm => self.state.aggregator.long_term(),
        };
        Dashboard::render(&mut self.canvas, &self.palette, reading, series, color_step)
            .map_err(AppError::display)
    }

    fn publish(&mut self, reading: &Reading, aggregation: &AggregationEvent) {
        let Some(publisher) = self.publisher.as_mut() else {
            return;
        };

        let mut value: heapless::String<16> = heapless::String::new();
        let mut send = |key: &str, number: f32| {
            value.clear();
            write!(value, "{:.1}", number).ok();
            if let Err(e) = publisher.publish(key, &value) {
                warn!("Failed to publish {}: {}", key, e);
            }
        };

        send(keys::TEMPERATURE, reading.temperature);
        send(keys::HUMIDITY, reading.humidity);
        if let Some(average) = aggregation.long_term_value {
            send(keys::TEMPERATURE_AVG, average);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ThermoConfig};
    use crate::sensors::SensorError;
    use crate::testing::{FixedRng, NoDelay, RecordingCanvas, RecordingPublisher, ScriptedSensor};
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    type TestThermometer<'a> =
        Thermometer<'a, RecordingCanvas, ScriptedSensor, RecordingPublisher, NoDelay, FixedRng>;

    /// FixedRng(1) never hits `% 32 == 0`, FixedRng(0) always does.
    fn thermometer(config: ThermoConfig<'_>, sensor: ScriptedSensor, rng: u32) -> TestThermometer<'_> {
        Thermometer::new(
            config.validate().unwrap(),
            RecordingCanvas::new(160, 128),
            sensor,
            Some(RecordingPublisher::default()),
            NoDelay::default(),
            FixedRng(rng),
        )
        .unwrap()
    }

    fn published(thermometer: &TestThermometer<'_>) -> Vec<(String, String)> {
        thermometer.publisher().unwrap().published.clone()
    }

    #[test]
    fn test_start_shows_splash_then_goes_live() {
        let mut thermometer = thermometer(ThermoConfig::default(), ScriptedSensor::readings(&[]), 1);

        thermometer.start().unwrap();

        assert_eq!(thermometer.state().screen, Screen::Live);
        assert!(thermometer.canvas().texts().iter().any(|t| t == "** C64 BASIC **"));
        assert!(thermometer.canvas().texts().iter().any(|t| t == "RUN"));
    }

    #[test]
    fn test_identical_readings_are_drawn_once() {
        let sensor = ScriptedSensor::readings(&[(21.3, 45.1), (21.3, 45.1), (21.4, 45.1)]);
        let mut thermometer = thermometer(ThermoConfig::default(), sensor, 1);

        let first = thermometer.step().unwrap();
        assert!(first.redrawn);
        assert_eq!(thermometer.canvas().fills(), 1);

        let second = thermometer.step().unwrap();
        assert!(!second.redrawn);
        assert_eq!(thermometer.canvas().fills(), 1);
        // history still grows while the screen is left alone
        assert_eq!(thermometer.state().aggregator.recent().len(), 2);

        let third = thermometer.step().unwrap();
        assert!(third.redrawn);
        assert_eq!(thermometer.canvas().fills(), 2);
    }

    #[test]
    fn test_splash_interrupt_forces_redraw() {
        let config = ThermoConfig {
            splash_one_in: 1,
            ..ThermoConfig::default()
        };
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0), (20.0, 40.0)]);
        let mut thermometer = thermometer(config, sensor, 0);

        // never on the first iteration
        let first = thermometer.step().unwrap();
        assert!(!first.splash_shown);

        thermometer.canvas_mut().clear();
        let second = thermometer.step().unwrap();
        assert!(second.splash_shown);
        assert!(second.redrawn, "unchanged reading must be redrawn after the splash");
        assert_eq!(thermometer.state().screen, Screen::Live);

        let texts = thermometer.canvas().texts();
        let banner = texts.iter().position(|t| t == "** C64 BASIC **").unwrap();
        let value = texts.iter().position(|t| t == "20.0").unwrap();
        assert!(banner < value);
    }

    #[test]
    fn test_zero_probability_disables_splash() {
        let config = ThermoConfig {
            splash_one_in: 0,
            ..ThermoConfig::default()
        };
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0); 3]);
        let mut thermometer = thermometer(config, sensor, 0);

        for _ in 0..3 {
            assert!(!thermometer.step().unwrap().splash_shown);
        }
    }

    #[test]
    fn test_sensor_failure_records_nothing() {
        let sensor = ScriptedSensor::new([
            Ok((21.0, 40.0)),
            Err(SensorError::Checksum { sensor: "script" }),
        ]);
        let mut thermometer = thermometer(ThermoConfig::default(), sensor, 1);
        thermometer.step().unwrap();
        thermometer.canvas_mut().clear();

        let result = thermometer.step();

        assert_eq!(
            result,
            Err(AppError::Sensor(SensorError::Checksum { sensor: "script" }))
        );
        assert_eq!(thermometer.state().aggregator.recent().len(), 1);
        assert!(thermometer.canvas().ops.is_empty());
        assert_eq!(published(&thermometer).len(), 2);
    }

    #[test]
    fn test_failure_policy() {
        let failing = || ScriptedSensor::new([Err(SensorError::NotResponding { sensor: "script" })]);

        let mut retrying = thermometer(ThermoConfig::default(), failing(), 1);
        assert_eq!(retrying.tick(), Ok(None));

        let config = ThermoConfig {
            sensor_failure_policy: SensorFailurePolicy::Abort,
            ..ThermoConfig::default()
        };
        let mut aborting = thermometer(config, failing(), 1);
        assert!(matches!(aborting.tick(), Err(AppError::Sensor(_))));
    }

    #[test]
    fn test_publishes_readings_and_window_average() {
        let config = ThermoConfig {
            aggregation_window: Some(2),
            ..ThermoConfig::default()
        };
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0), (21.0, 41.5)]);
        let mut thermometer = thermometer(config, sensor, 1);

        thermometer.step().unwrap();
        let report = thermometer.step().unwrap();

        assert!(report.aggregation.long_term_updated);
        let expected: Vec<(String, String)> = [
            ("temperature", "20.0"),
            ("humidity", "40.0"),
            ("temperature", "21.0"),
            ("humidity", "41.5"),
            ("temperature_avg", "20.5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(published(&thermometer), expected);
    }

    #[test]
    fn test_publish_failure_does_not_stop_rendering() {
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0)]);
        let mut thermometer = Thermometer::new(
            ThermoConfig::default().validate().unwrap(),
            RecordingCanvas::new(160, 128),
            sensor,
            Some(RecordingPublisher {
                fail: true,
                ..RecordingPublisher::default()
            }),
            NoDelay::default(),
            FixedRng(1),
        )
        .unwrap();

        let report = thermometer.step().unwrap();

        assert!(report.redrawn);
        assert!(published(&thermometer).is_empty());
    }

    #[test]
    fn test_switching_graph_source_forces_redraw() {
        let config = ThermoConfig {
            aggregation_window: Some(1),
            ..ThermoConfig::default()
        };
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0), (20.0, 40.0)]);
        let mut thermometer = thermometer(config, sensor, 1);
        thermometer.step().unwrap();

        assert_eq!(thermometer.toggle_graph_source(), GraphSource::LongTerm);
        assert_eq!(thermometer.state().fingerprint, None);
        assert_eq!(thermometer.graph_series().len(), 1);

        thermometer.canvas_mut().clear();
        assert!(thermometer.step().unwrap().redrawn);
        assert_eq!(thermometer.canvas().vlines().len(), 2);
    }

    #[test]
    fn test_redraw_uses_last_reading() {
        let sensor = ScriptedSensor::readings(&[(20.0, 40.0), (20.0, 40.0)]);
        let mut thermometer = thermometer(ThermoConfig::default(), sensor, 1);
        assert_eq!(thermometer.redraw(), Ok(false));

        thermometer.step().unwrap();
        thermometer.canvas_mut().clear();
        assert_eq!(thermometer.redraw(), Ok(true));
        assert_eq!(thermometer.canvas().fills(), 1);

        // the explicit redraw counts as the last render
        assert!(!thermometer.step().unwrap().redrawn);
    }

    #[test]
    fn test_shutdown_closes_publisher() {
        let mut thermometer = thermometer(ThermoConfig::default(), ScriptedSensor::readings(&[]), 1);
        thermometer.shutdown();
        assert!(thermometer.publisher().unwrap().closed);
    }

    #[test]
    fn test_history_width_must_match_canvas() {
        let settings = ThermoConfig {
            display_width: 200,
            ..ThermoConfig::default()
        }
        .validate()
        .unwrap();

        let result = Thermometer::new(
            settings,
            RecordingCanvas::new(160, 128),
            ScriptedSensor::readings(&[]),
            None::<RecordingPublisher>,
            NoDelay::default(),
            FixedRng(1),
        );

        assert_eq!(
            result.err(),
            Some(AppError::Config(ConfigError::DisplayMismatch {
                configured: (200, 128),
                actual: (160, 128),
            }))
        );
    }
}

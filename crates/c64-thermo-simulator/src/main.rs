//! Desktop simulator for the C64-styled thermometer.
//!
//! Runs the c64-thermo-core main loop in an SDL2 window via
//! `embedded-graphics-simulator`, fed by a synthetic sensor so the splash,
//! dashboard and history graph can be exercised without hardware.
//! Published values are logged instead of being sent to a broker.
//!
//! # Key bindings
//!
//! | Key | Action                                  |
//! |-----|-----------------------------------------|
//! | H   | Toggle recent / long-term history graph |
//! | Q   | Quit                                    |

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{Arg, ArgAction, Command, value_parser};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use c64_thermo_core::display::GraphicsCanvas;
use c64_thermo_core::pacing::{Monotonic, TickPacer};
use c64_thermo_core::publish::{LogPublisher, TopicNamespace};
use c64_thermo_core::storage::GraphSource;
use c64_thermo_core::{Reading, Sensor, SensorError, ThermoConfig, Thermometer};

/// Default pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic readings that drift slowly over simulated time.
///
/// Values are rounded to one decimal like the dashboard shows them, so
/// consecutive identical readings (and skipped redraws) do happen.
struct MockSensorGenerator {
    /// Simulated seconds since start
    elapsed_secs: f64,
    step_secs: f64,
    started: Instant,
    /// Report a read failure every `fail_every` measurements (0: never)
    fail_every: u64,
    measurements: u64,
}

impl MockSensorGenerator {
    fn new(step_secs: u32, fail_every: u64) -> Self {
        Self {
            elapsed_secs: 0.0,
            step_secs: step_secs as f64,
            started: Instant::now(),
            fail_every,
            measurements: 0,
        }
    }
}

impl Sensor for MockSensorGenerator {
    fn measure(&mut self) -> Result<Reading, SensorError> {
        self.measurements += 1;
        if self.fail_every != 0 && self.measurements % self.fail_every == 0 {
            return Err(SensorError::NotResponding { sensor: "mock" });
        }

        self.elapsed_secs += self.step_secs;
        let t = self.elapsed_secs;

        // Temperature: 20–26 °C over roughly an hour
        let temperature = 23.0 + 3.0 * (t / 600.0).sin() + 0.3 * (t / 37.0).cos();
        // Humidity: 40–60 % with a different period
        let humidity = 50.0 + 8.0 * (t / 900.0).sin() + 2.0 * (t / 23.0).cos();

        let round = |v: f64| ((v * 10.0).round() / 10.0) as f32;
        Ok(Reading::new(
            round(temperature),
            round(humidity),
            self.started.elapsed().as_millis() as u64,
        ))
    }
}

// ---------------------------------------------------------------------------
// Display plumbing
// ---------------------------------------------------------------------------

type Display = SimulatorDisplay<Rgb565>;

/// Simulator display shared between the canvas and the window refresher.
#[derive(Clone)]
struct SharedDisplay(Rc<RefCell<Display>>);

impl OriginDimensions for SharedDisplay {
    fn size(&self) -> Size {
        self.0.borrow().size()
    }
}

impl DrawTarget for SharedDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.borrow_mut().draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.0.borrow_mut().clear(color)
    }
}

/// SDL window plus the display it shows.
struct Screen {
    display: SharedDisplay,
    window: Rc<RefCell<Window>>,
}

impl Screen {
    fn refresh(&self) {
        self.window.borrow_mut().update(&self.display.0.borrow());
    }

    /// Drain pending SDL events.
    fn events(&self) -> Vec<SimulatorEvent> {
        self.window.borrow_mut().events().collect()
    }
}

/// Blocking delay that keeps the window painted, so the splash typing is
/// visible while the loop sleeps.
struct WindowDelay {
    screen: Rc<Screen>,
}

impl DelayNs for WindowDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.screen.refresh();
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

/// Milliseconds since the simulator started.
struct StdClock(Instant);

impl Monotonic for StdClock {
    fn now_ms(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("JSON thermometer configuration; missing fields use defaults")
                .required(false),
        )
        .arg(
            Arg::new("period")
                .short('p')
                .long("period")
                .help("Sampling period in seconds (overrides the config file)")
                .value_parser(value_parser!(u32))
                .required(false),
        )
        .arg(
            Arg::new("scale")
                .short('s')
                .long("scale")
                .help("Window pixel scale")
                .value_parser(value_parser!(u32))
                .default_value("4"),
        )
        .arg(
            Arg::new("long-term")
                .short('l')
                .long("long-term")
                .help("Start with the long-term history graph")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("hardware-id")
                .long("hardware-id")
                .help("Hardware id used in published topics")
                .default_value("simulator"),
        )
        .arg(
            Arg::new("fail-every")
                .long("fail-every")
                .help("Make every Nth measurement fail (0: never)")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
}

fn load_config(path: Option<&String>) -> Result<String, String> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e)),
        None => Ok(String::from("{}")),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let matches = command().get_matches();

    let config_text = match load_config(matches.get_one::<String>("config")) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read config: {}", e);
            std::process::exit(1);
        }
    };
    let mut config: ThermoConfig = match serde_json::from_str(&config_text) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(period) = matches.get_one::<u32>("period") {
        config.sampling_period_secs = *period;
    }
    if matches.get_flag("long-term") {
        config.graph_source = GraphSource::LongTerm;
    }
    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let scale = matches.get_one::<u32>("scale").copied().unwrap_or(WINDOW_SCALE);
    let hardware_id = matches
        .get_one::<String>("hardware-id")
        .map(String::as_str)
        .unwrap_or("simulator");
    let fail_every = matches.get_one::<u64>("fail-every").copied().unwrap_or(0);

    info!("Starting c64-thermo simulator");
    info!(
        "Display: {}×{} (scale {}×), sampling every {} ms",
        settings.display_width, settings.display_height, scale, settings.sampling_period_ms
    );
    info!("Keys: H=toggle history graph  Q=Quit");

    // SDL2 display and window
    let display = SharedDisplay(Rc::new(RefCell::new(Display::new(Size::new(
        settings.display_width,
        settings.display_height,
    )))));
    let output_settings = OutputSettingsBuilder::new().scale(scale).build();
    let window = Window::new("C64 Thermometer", &output_settings);
    let screen = Rc::new(Screen {
        display: display.clone(),
        window: Rc::new(RefCell::new(window)),
    });

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    screen.refresh();

    let namespace = TopicNamespace::new(settings.device_class, hardware_id);
    let mut thermometer = match Thermometer::new(
        settings,
        GraphicsCanvas::new(display),
        MockSensorGenerator::new(config.sampling_period_secs, fail_every),
        Some(LogPublisher::new(namespace)),
        WindowDelay {
            screen: screen.clone(),
        },
        rand::rng(),
    ) {
        Ok(thermometer) => thermometer,
        Err(e) => {
            error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = thermometer.start() {
        error!("Splash failed: {}", e);
        std::process::exit(1);
    }

    let clock = StdClock(Instant::now());
    let pacer = TickPacer::new(settings.sampling_period_ms as u64);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let tick_start = clock.now_ms();

        match thermometer.tick() {
            Ok(Some(report)) if report.splash_shown => info!("Splash interrupt"),
            Ok(_) => {}
            Err(e) => {
                error!("Stopping: {}", e);
                break 'running;
            }
        }
        screen.refresh();

        // --- Wait for the next tick, staying responsive -------------------
        while let Some(slice) = pacer.remaining(tick_start, clock.now_ms()) {
            for event in screen.events() {
                match event {
                    SimulatorEvent::Quit => break 'running,

                    SimulatorEvent::KeyDown { keycode, .. } => {
                        if keycode == Keycode::Q || keycode == Keycode::Escape {
                            break 'running;
                        }
                        if keycode == Keycode::H {
                            thermometer.toggle_graph_source();
                            // Redraw now rather than at the next tick
                            if let Err(e) = thermometer.redraw() {
                                warn!("Redraw failed: {}", e);
                            }
                            screen.refresh();
                        }
                    }

                    _ => {}
                }
            }
            std::thread::sleep(Duration::from_millis(slice as u64));
        }
    }

    thermometer.shutdown();
    info!("Simulator exiting");
}

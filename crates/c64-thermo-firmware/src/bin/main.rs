#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::{IpAddress, IpEndpoint, Ipv4Address, StackResources};
use embassy_time::{Delay, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::efuse::Efuse;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info, warn};

// Display-LCD panel specific imports
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use mipidsi::interface::SpiInterface;
use mipidsi::options::{Orientation, Rotation};
use mipidsi::{Builder as MipidsiBuilder, models::ST7735s};

use c64_thermo_core::display::GraphicsCanvas;
use c64_thermo_core::pacing::{Monotonic, TickPacer};
use c64_thermo_core::publish::{TopicNamespace, hardware_id_hex};
use c64_thermo_core::{ThermoConfig, Thermometer};
use c64_thermo_firmware::network::mqtt::mqtt_task;
use c64_thermo_firmware::network::{net_task, wifi_task};
use c64_thermo_firmware::platform::{EmbassyClock, HardwareRng};
use c64_thermo_firmware::publisher::ChannelPublisher;
use c64_thermo_firmware::secrets::NETWORK;
use c64_thermo_firmware::sensors::Sht40Sensor;

/// Native panel size; rotated to 160x128 landscape below.
const PANEL_WIDTH: u16 = 128;
const PANEL_HEIGHT: u16 = 160;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

macro_rules! mk_static {
    ($t:ty,$val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    let thermo_config: ThermoConfig<'static> = ThermoConfig::default();
    let settings = thermo_config
        .validate()
        .expect("Built-in configuration is invalid");

    // Configure and initialize the display

    // 1. Configure SPI bus
    let spi_bus = Spi::new(
        peripherals.SPI2,
        SpiConfig::default().with_frequency(Rate::from_mhz(26)),
    )
    .unwrap()
    .with_sck(peripherals.GPIO12)
    .with_mosi(peripherals.GPIO11);

    // 2. Chip select, driven by the SPI device wrapper
    let cs = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());

    // 3. Wrap the SPI bus as a SPI device (required by embedded-hal traits)
    let spi_device = ExclusiveDevice::new_no_delay(spi_bus, cs).unwrap();

    // 4. Data/Command, reset and backlight pins
    let dc = Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO2, Level::High, OutputConfig::default());
    let _backlight = Output::new(peripherals.GPIO5, Level::High, OutputConfig::default());

    // 5. Create a buffer for SPI batching (larger = faster, uses more RAM)
    let mut spi_buffer = [0u8; 64];

    // 6. Create display interface
    let di = SpiInterface::new(spi_device, dc, &mut spi_buffer);

    // 7. Build and initialize the display driver
    let display = MipidsiBuilder::new(ST7735s, di)
        .display_size(PANEL_WIDTH, PANEL_HEIGHT)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .reset_pin(rst)
        .init(&mut Delay)
        .expect("Failed to initialize display");

    info!("Display initialized!");

    // SHT40 on the default I2C bus
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .unwrap()
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9);
    let sensor = Sht40Sensor::new(i2c);

    let rng = Rng::new();
    let mut publisher = None;

    if NETWORK.internet.ssid.is_empty() {
        warn!("No Wi-Fi credentials, running offline");
    } else {
        let radio = &*mk_static!(
            esp_radio::Controller<'static>,
            esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller")
        );
        let (controller, interfaces) =
            esp_radio::wifi::new(radio, peripherals.WIFI, Default::default())
                .expect("Failed to initialize Wi-Fi controller");

        let seed = (rng.random() as u64) << 32 | rng.random() as u64;
        let (stack, runner) = embassy_net::new(
            interfaces.sta,
            embassy_net::Config::dhcpv4(Default::default()),
            mk_static!(StackResources<3>, StackResources::<3>::new()),
            seed,
        );

        if let Err(e) = spawner.spawn(net_task(runner)) {
            error!("Failed to spawn network task: {:?}", e);
        }
        if let Err(e) = spawner.spawn(wifi_task(
            controller,
            stack,
            NETWORK.internet.ssid,
            NETWORK.internet.password,
        )) {
            error!("Failed to spawn Wi-Fi task: {:?}", e);
        }

        if !NETWORK.mqtt.is_enabled() {
            warn!("No MQTT broker configured, publishing disabled");
        } else if let Ok(address) = NETWORK.mqtt.broker.parse::<Ipv4Address>() {
            let hardware_id: &'static heapless::String<32> =
                mk_static!(heapless::String<32>, hardware_id_hex(&Efuse::mac_address()));
            let namespace = TopicNamespace::new(settings.device_class, hardware_id.as_str());

            match namespace.client_id() {
                Ok(client_id) => {
                    let client_id: &'static heapless::String<96> =
                        mk_static!(heapless::String<96>, client_id);
                    let broker = IpEndpoint::new(IpAddress::Ipv4(address), NETWORK.mqtt.port);

                    if let Err(e) = spawner.spawn(mqtt_task(stack, broker, client_id.as_str())) {
                        error!("Failed to spawn MQTT task: {:?}", e);
                    } else {
                        info!("Publishing under /{}/{}/", settings.device_class, hardware_id);
                        publisher = Some(ChannelPublisher::new(namespace));
                    }
                }
                Err(e) => warn!("Cannot build MQTT client id: {}", e),
            }
        } else {
            warn!(
                "MQTT_BROKER {} is not an IPv4 address, publishing disabled",
                NETWORK.mqtt.broker
            );
        }
    }

    let mut thermometer = Thermometer::new(
        settings,
        GraphicsCanvas::new(display),
        sensor,
        publisher,
        Delay,
        HardwareRng(rng),
    )
    .expect("Panel size does not match the configuration");

    if let Err(e) = thermometer.start() {
        error!("Splash failed: {}", e);
    }

    let clock = EmbassyClock;
    let pacer = TickPacer::new(settings.sampling_period_ms as u64);

    loop {
        let tick_start = clock.now_ms();

        if let Err(e) = thermometer.tick() {
            error!("Thermometer stopped: {}", e);
            thermometer.shutdown();
            // Give the MQTT task a chance to send the disconnect
            Timer::after_secs(1).await;
            esp_hal::system::software_reset();
        }

        while let Some(slice) = pacer.remaining(tick_start, clock.now_ms()) {
            Timer::after_millis(slice as u64).await;
        }
    }
}

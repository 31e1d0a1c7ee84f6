//! Bakes the network credentials from `.env` into the firmware.
//!
//! Writes `$OUT_DIR/secrets.rs`, included by `src/secrets.rs`. A missing
//! `.env` is fine: every value falls back to the process environment and
//! then to an empty string, which leaves Wi-Fi and MQTT disabled.

use std::env;
use std::fs;
use std::path::Path;

const KEYS: [&str; 4] = ["WIFI_SSID", "WIFI_PASSWORD", "MQTT_BROKER", "MQTT_PORT"];
const DEFAULT_MQTT_PORT: u16 = 1883;

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    if let Err(e) = dotenvy::from_filename(".env") {
        println!("cargo:warning=no usable .env ({e}), networking falls back to the environment");
    }

    let value = |key: &str| env::var(key).unwrap_or_default();

    let port = match value("MQTT_PORT") {
        port if port.is_empty() => DEFAULT_MQTT_PORT,
        port => port
            .parse::<u16>()
            .unwrap_or_else(|_| panic!("MQTT_PORT must be a port number, got {port:?}")),
    };

    let generated = format!(
        "pub const WIFI_SSID: &str = {:?};\n\
         pub const WIFI_PASSWORD: &str = {:?};\n\
         pub const MQTT_BROKER: &str = {:?};\n\
         pub const MQTT_PORT: u16 = {};\n",
        value("WIFI_SSID"),
        value("WIFI_PASSWORD"),
        value("MQTT_BROKER"),
        port,
    );

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("secrets.rs"), generated).expect("write secrets.rs");
}

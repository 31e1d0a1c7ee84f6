//! Network credentials baked in by `build.rs`

use c64_thermo_core::config::{InternetConfig, MqttConfig, NetworkConfig};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/secrets.rs"));
}

pub const NETWORK: NetworkConfig<'static> = NetworkConfig {
    internet: InternetConfig {
        ssid: generated::WIFI_SSID,
        password: generated::WIFI_PASSWORD,
    },
    mqtt: MqttConfig {
        broker: generated::MQTT_BROKER,
        port: generated::MQTT_PORT,
    },
};

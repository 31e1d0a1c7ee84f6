//! Wi-Fi station and network stack tasks

pub mod mqtt;

use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};
use log::{info, warn};

const DHCP_TIMEOUT: Duration = Duration::from_secs(30);
const LINK_POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_BACKOFF_SECS: u64 = 60;

/// Exponential back-off, 5 s doubling up to a minute.
pub fn backoff(consecutive_failures: u32) -> Duration {
    let secs = 5u64.saturating_mul(1 << consecutive_failures.min(4));
    Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
}

/// Keep the station associated and the DHCP lease up, forever.
#[embassy_executor::task]
pub async fn wifi_task(
    mut controller: WifiController<'static>,
    stack: Stack<'static>,
    ssid: &'static str,
    password: &'static str,
) {
    let mut failures = 0u32;

    loop {
        if !controller.is_started().unwrap_or(false) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_password(password.into()),
            );
            if let Err(e) = controller.set_config(&client_config) {
                warn!("Wi-Fi config rejected: {:?}", e);
            }
            if let Err(e) = controller.start_async().await {
                warn!("Wi-Fi start failed: {:?}", e);
                Timer::after(backoff(failures)).await;
                failures = failures.saturating_add(1);
                continue;
            }
        }

        info!("Connecting to {}", ssid);
        if let Err(e) = controller.connect_async().await {
            warn!("Wi-Fi connect failed: {:?}", e);
            let _ = controller.disconnect_async().await;
            Timer::after(backoff(failures)).await;
            failures = failures.saturating_add(1);
            continue;
        }

        if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
            warn!("DHCP timeout, reconnecting");
            let _ = controller.disconnect_async().await;
            Timer::after(backoff(failures)).await;
            failures = failures.saturating_add(1);
            continue;
        }
        if let Some(config) = stack.config_v4() {
            info!("Wi-Fi up, address {}", config.address);
        }
        failures = 0;

        while stack.is_link_up() && matches!(controller.is_connected(), Ok(true)) {
            Timer::after(LINK_POLL_INTERVAL).await;
        }

        warn!("Wi-Fi link lost, reconnecting");
        let _ = controller.disconnect_async().await;
        Timer::after(backoff(failures)).await;
    }
}

#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

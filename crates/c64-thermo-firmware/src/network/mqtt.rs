//! MQTT session task
//!
//! Owns the broker connection. Connects once the network is up, forwards
//! queued publishes, pings when idle and reconnects with back-off after any
//! failure. Queued requests survive a reconnect.

use embassy_futures::select::{Either, select};
use embassy_net::tcp::{ConnectError, TcpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use log::{info, warn};
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;
use thiserror_no_std::Error;

use super::backoff;
use crate::publisher::{MQTT_QUEUE, MqttCommand};

const KEEP_ALIVE_SECS: u16 = 60;
/// Idle time before a PINGREQ, well inside the keep-alive
const PING_INTERVAL: Duration = Duration::from_secs(KEEP_ALIVE_SECS as u64 / 2);
const CONNACK_TIMEOUT: Duration = Duration::from_secs(5);
const SOCKET_TIMEOUT: Duration = Duration::from_secs(15);
const SOCKET_BUFFER_SIZE: usize = 512;
const PACKET_BUFFER_SIZE: usize = 256;
const MAX_PROPERTIES: usize = 5;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("TCP connect failed: {0:?}")]
    Connect(ConnectError),
    #[error("broker did not answer in time")]
    Timeout,
    #[error("MQTT error: {0:?}")]
    Mqtt(ReasonCode),
}

impl From<ReasonCode> for SessionError {
    fn from(code: ReasonCode) -> Self {
        Self::Mqtt(code)
    }
}

#[embassy_executor::task]
pub async fn mqtt_task(stack: Stack<'static>, broker: IpEndpoint, client_id: &'static str) {
    let mut failures = 0u32;

    loop {
        stack.wait_config_up().await;

        match run_session(stack, broker, client_id).await {
            Ok(()) => {
                info!("MQTT disconnected");
                return;
            }
            Err(e) => {
                warn!("MQTT session ended: {}", e);
                Timer::after(backoff(failures)).await;
                failures = failures.saturating_add(1);
            }
        }
    }
}

/// One broker connection. Returns `Ok` only after a requested disconnect.
async fn run_session(
    stack: Stack<'static>,
    broker: IpEndpoint,
    client_id: &str,
) -> Result<(), SessionError> {
    let mut rx_buffer = [0u8; SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; SOCKET_BUFFER_SIZE];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(SOCKET_TIMEOUT));
    socket.connect(broker).await.map_err(SessionError::Connect)?;

    let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20_000));
    config.add_client_id(client_id);
    config.keep_alive = KEEP_ALIVE_SECS;
    config.max_packet_size = PACKET_BUFFER_SIZE as u32;

    let mut write_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut recv_buffer = [0u8; PACKET_BUFFER_SIZE];
    let mut client = MqttClient::<_, MAX_PROPERTIES, _>::new(
        socket,
        &mut write_buffer,
        PACKET_BUFFER_SIZE,
        &mut recv_buffer,
        PACKET_BUFFER_SIZE,
        config,
    );

    with_timeout(CONNACK_TIMEOUT, client.connect_to_broker())
        .await
        .map_err(|_| SessionError::Timeout)??;
    info!("MQTT connected to {} as {}", broker, client_id);

    let receiver = MQTT_QUEUE.receiver();
    loop {
        match select(receiver.receive(), Timer::after(PING_INTERVAL)).await {
            Either::First(MqttCommand::Publish { topic, payload }) => {
                client
                    .send_message(&topic, payload.as_bytes(), QualityOfService::QoS0, false)
                    .await?;
            }
            Either::First(MqttCommand::Disconnect) => {
                client.disconnect().await?;
                return Ok(());
            }
            Either::Second(()) => client.send_ping().await?,
        }
    }
}

//! Main-loop side of MQTT publishing
//!
//! The render loop must never wait on the network, so [`ChannelPublisher`]
//! only enqueues; the MQTT task drains the queue and owns the socket.

use c64_thermo_core::publish::{PublishError, Publisher, TopicNamespace};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};

/// Requests waiting for the MQTT task
pub const PUBLISH_QUEUE_DEPTH: usize = 16;

pub type Topic = heapless::String<96>;
pub type Payload = heapless::String<16>;

pub enum MqttCommand {
    Publish { topic: Topic, payload: Payload },
    Disconnect,
}

/// Global queue between the main loop and the MQTT task
pub static MQTT_QUEUE: Channel<CriticalSectionRawMutex, MqttCommand, PUBLISH_QUEUE_DEPTH> =
    Channel::new();

pub struct ChannelPublisher {
    namespace: TopicNamespace<'static>,
    sender: Sender<'static, CriticalSectionRawMutex, MqttCommand, PUBLISH_QUEUE_DEPTH>,
}

impl ChannelPublisher {
    pub fn new(namespace: TopicNamespace<'static>) -> Self {
        Self {
            namespace,
            sender: MQTT_QUEUE.sender(),
        }
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), PublishError> {
        let topic = self.namespace.topic(key)?;
        let payload = Payload::try_from(value).map_err(|_| PublishError::TooLong)?;

        self.sender
            .try_send(MqttCommand::Publish { topic, payload })
            .map_err(|_| PublishError::QueueFull)
    }

    fn close(&mut self) {
        if self.sender.try_send(MqttCommand::Disconnect).is_err() {
            log::warn!("MQTT queue full, dropping disconnect");
        }
    }
}

//! Optional publishing of readings
//!
//! The main loop hands `(key, value)` pairs to a [`Publisher`]; the publisher
//! owns the transport and the topic namespace. Publishing never sits on the
//! display path: failures are logged by the caller and the loop carries on.

mod topic;

pub use topic::{TopicNamespace, hardware_id_hex};

use log::info;
use thiserror_no_std::Error;

/// Topic keys published by the thermometer
pub mod keys {
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    /// Mean temperature of the last aggregation window
    pub const TEMPERATURE_AVG: &str = "temperature_avg";
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    #[error("not connected to the broker")]
    NotConnected,
    #[error("publish queue is full")]
    QueueFull,
    #[error("topic or payload too long")]
    TooLong,
    #[error("transport error: {0}")]
    Transport(&'static str),
}

/// Sink for published readings.
pub trait Publisher {
    /// Publish `value` under `key` within the publisher's namespace.
    fn publish(&mut self, key: &str, value: &str) -> Result<(), PublishError>;

    /// Tear down the transport. Called once when the loop stops.
    fn close(&mut self) {}
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), PublishError> {
        (**self).publish(key, value)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Publisher that only logs the full topic and value.
pub struct LogPublisher<'a> {
    namespace: TopicNamespace<'a>,
}

impl<'a> LogPublisher<'a> {
    pub fn new(namespace: TopicNamespace<'a>) -> Self {
        Self { namespace }
    }
}

impl Publisher for LogPublisher<'_> {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), PublishError> {
        let topic = self.namespace.topic(key)?;
        info!("publish {} = {}", topic, value);
        Ok(())
    }
}

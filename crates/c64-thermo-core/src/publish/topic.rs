use core::fmt::Write;

use super::PublishError;

/// Longest topic the thermometer builds
pub const MAX_TOPIC_LEN: usize = 96;

/// Longest hardware id, in hex characters
pub const MAX_HARDWARE_ID_LEN: usize = 32;

/// `/<device-class>/<hardware-id>/<key>` topic builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicNamespace<'a> {
    pub device_class: &'a str,
    pub hardware_id: &'a str,
}

impl<'a> TopicNamespace<'a> {
    pub const fn new(device_class: &'a str, hardware_id: &'a str) -> Self {
        Self {
            device_class,
            hardware_id,
        }
    }

    /// Full topic for `key`.
    pub fn topic(&self, key: &str) -> Result<heapless::String<MAX_TOPIC_LEN>, PublishError> {
        let mut topic = heapless::String::new();
        write!(topic, "/{}/{}/{}", self.device_class, self.hardware_id, key)
            .map_err(|_| PublishError::TooLong)?;
        Ok(topic)
    }

    /// MQTT client id: `<device-class>-<hardware-id>`.
    pub fn client_id(&self) -> Result<heapless::String<MAX_TOPIC_LEN>, PublishError> {
        let mut id = heapless::String::new();
        write!(id, "{}-{}", self.device_class, self.hardware_id)
            .map_err(|_| PublishError::TooLong)?;
        Ok(id)
    }
}

/// Lowercase hex encoding of a unique device id (e.g. the base MAC address).
///
/// Ids longer than 16 bytes are truncated.
pub fn hardware_id_hex(id: &[u8]) -> heapless::String<MAX_HARDWARE_ID_LEN> {
    let mut hex = heapless::String::new();
    for byte in id.iter().take(MAX_HARDWARE_ID_LEN / 2) {
        write!(hex, "{:02x}", byte).ok();
    }
    hex
}

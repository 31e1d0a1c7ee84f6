//! Clock and randomness backed by the ESP32 peripherals

use c64_thermo_core::pacing::Monotonic;
use embassy_time::Instant;
use esp_hal::rng::Rng;
use rand_core::RngCore;

/// Embassy's monotonic time driver.
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// True random numbers from the radio noise source.
///
/// Only random while the radio (or another entropy source) is running;
/// good enough for splash timing either way.
pub struct HardwareRng(pub Rng);

impl RngCore for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

//! Redraw suppression
//!
//! The dashboard is only redrawn when the displayed values change. Each
//! reading is reduced to a [`Fingerprint`] and compared with the one that was
//! last rendered.

use crate::sensors::Reading;

/// Equality token for the values shown on screen.
///
/// Compares the exact bit patterns of temperature and humidity, so two
/// readings are equal only if they would print identically at any precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    temperature_bits: u32,
    humidity_bits: u32,
}

impl Fingerprint {
    pub fn of(reading: &Reading) -> Self {
        Self {
            temperature_bits: reading.temperature.to_bits(),
            humidity_bits: reading.humidity.to_bits(),
        }
    }
}

/// Stateless change check; the caller keeps the last rendered fingerprint.
pub struct ChangeDetector;

impl ChangeDetector {
    /// Decide whether `reading` differs from what was last rendered.
    ///
    /// `previous` is `None` before the first render and after anything that
    /// overwrote the dashboard (the splash screen, a graph source switch).
    /// Returns the decision and the fingerprint to remember for next time.
    pub fn should_redraw(reading: &Reading, previous: Option<Fingerprint>) -> (bool, Fingerprint) {
        let current = Fingerprint::of(reading);
        (previous != Some(current), current)
    }
}

//! Test doubles shared by the unit tests of this crate

use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::display::palette::Rgb;
use crate::display::{Canvas, TextSize};
use crate::publish::{PublishError, Publisher};
use crate::sensors::{Reading, Sensor, SensorError};

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rgb),
    Rect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb,
        filled: bool,
    },
    VLine {
        base_y: i32,
        top_y: i32,
        x: i32,
        color: Rgb,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        fg: Rgb,
        bg: Rgb,
    },
    LargeText {
        x: i32,
        y: i32,
        text: String,
        fg: Rgb,
    },
}

/// Canvas that records every call, with 8x8 normal and 16x16 large glyphs.
pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn vlines(&self) -> Vec<(i32, i32, i32, Rgb)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::VLine {
                    base_y,
                    top_y,
                    x,
                    color,
                } => Some((*base_y, *top_y, *x, *color)),
                _ => None,
            })
            .collect()
    }

    /// Every string drawn, in order, regardless of size.
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } | DrawOp::LargeText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Canvas for RecordingCanvas {
    type Color = Rgb;
    type Error = Infallible;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_from_rgb(&self, r: u8, g: u8, b: u8) -> Rgb {
        (r, g, b)
    }

    fn fill(&mut self, color: Rgb) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Fill(color));
        Ok(())
    }

    fn rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb,
        filled: bool,
    ) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
            filled,
        });
        Ok(())
    }

    fn vline(&mut self, base_y: i32, top_y: i32, x: i32, color: Rgb) -> Result<(), Infallible> {
        self.ops.push(DrawOp::VLine {
            base_y,
            top_y,
            x,
            color,
        });
        Ok(())
    }

    fn text(&mut self, x: i32, y: i32, text: &str, fg: Rgb, bg: Rgb) -> Result<(), Infallible> {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            fg,
            bg,
        });
        Ok(())
    }

    fn large_text(&mut self, x: i32, y: i32, text: &str, fg: Rgb) -> Result<(), Infallible> {
        self.ops.push(DrawOp::LargeText {
            x,
            y,
            text: text.to_string(),
            fg,
        });
        Ok(())
    }

    fn glyph_size(&self, size: TextSize) -> (u32, u32) {
        match size {
            TextSize::Normal => (8, 8),
            TextSize::Large => (16, 16),
        }
    }
}

/// Sensor replaying a fixed script; runs dry with `NotResponding`.
pub struct ScriptedSensor {
    script: VecDeque<Result<(f32, f32), SensorError>>,
    now_ms: u64,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Result<(f32, f32), SensorError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            now_ms: 0,
        }
    }

    pub fn readings(values: &[(f32, f32)]) -> Self {
        Self::new(values.iter().copied().map(Ok))
    }
}

impl Sensor for ScriptedSensor {
    fn measure(&mut self) -> Result<Reading, SensorError> {
        self.now_ms += 10_000;
        let (temperature, humidity) = self
            .script
            .pop_front()
            .unwrap_or(Err(SensorError::NotResponding { sensor: "script" }))?;
        Ok(Reading::new(temperature, humidity, self.now_ms))
    }
}

/// Publisher remembering every `(key, value)`; optionally failing.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Vec<(String, String)>,
    pub fail: bool,
    pub closed: bool,
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, key: &str, value: &str) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::NotConnected);
        }
        self.published.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

/// Delay that returns immediately but tallies the requested time.
#[derive(Default)]
pub struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

/// RNG returning the same word forever.
pub struct FixedRng(pub u32);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        ((self.0 as u64) << 32) | self.0 as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.0.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

use c64_thermo_core::sensors::{Reading, Sensor, SensorError};
use embassy_time::{Delay, Instant};
use embedded_hal::i2c::I2c;
use sht4x::{Precision, Sht4x};

/// Blocking SHT40 temperature/humidity sensor on I2C.
pub struct Sht40Sensor<I> {
    sensor: Sht4x<I, Delay>,
}

impl<I: I2c> Sht40Sensor<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            sensor: Sht4x::<I, Delay>::new(i2c),
        }
    }
}

impl<I: I2c> Sensor for Sht40Sensor<I> {
    fn measure(&mut self) -> Result<Reading, SensorError> {
        let measurement = self
            .sensor
            .measure(Precision::High, &mut Delay)
            .map_err(|e| {
                log::error!("SHT40 measurement failed: {:?}", e);
                SensorError::ReadFailed {
                    sensor: "SHT40",
                    operation: "measure temperature/humidity",
                    details: "I2C communication error or sensor not responding",
                }
            })?;

        Ok(Reading::new(
            measurement.temperature_celsius().to_num::<f32>(),
            measurement.humidity_percent().to_num::<f32>(),
            Instant::now().as_millis(),
        ))
    }
}

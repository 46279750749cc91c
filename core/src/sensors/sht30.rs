//! SHT30 temperature / humidity sensor.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{SensorError, checked_word};

/// Default bus address (ADDR pin high, as wired on this board).
pub const DEFAULT_ADDRESS: u8 = 0x45;

/// Single-shot measurement, high repeatability, no clock stretching.
const CMD_MEASURE_SINGLE_HIGH: [u8; 2] = [0x24, 0x00];

/// One climate measurement. Both temperature scales are derived from the
/// same raw conversion; the caller picks one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climate {
    pub celsius: f32,
    pub fahrenheit: f32,
    /// Relative humidity percentage.
    pub humidity: f32,
}

#[derive(Debug)]
pub struct Sht30 {
    address: u8,
}

impl Sht30 {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Runs one single-shot high-repeatability measurement (up to 15 ms
    /// conversion time).
    pub fn measure<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<Climate, SensorError<I2C::Error>> {
        i2c.write(self.address, &CMD_MEASURE_SINGLE_HIGH)
            .map_err(SensorError::Bus)?;
        delay.delay_ms(15);
        let mut buf = [0u8; 6];
        i2c.read(self.address, &mut buf)
            .map_err(SensorError::Bus)?;
        let raw_temperature = checked_word(&buf[0..3])? as f32 / 65535.0;
        let raw_humidity = checked_word(&buf[3..6])? as f32 / 65535.0;
        Ok(Climate {
            celsius: -45.0 + 175.0 * raw_temperature,
            fahrenheit: -49.0 + 315.0 * raw_temperature,
            humidity: 100.0 * raw_humidity,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sensors::testbus::{FakeBus, NoopDelay};

    #[test]
    fn raw_conversion_matches_the_datasheet_formulas() {
        // Raw temperature 0x6666 is exactly 25 C / 77 F; raw humidity
        // 0x8000 is 50 %RH.
        let mut bus =
            FakeBus::new().with_read(DEFAULT_ADDRESS, &[0x66, 0x66, 0x93, 0x80, 0x00, 0xA2]);
        let mut sensor = Sht30::new(DEFAULT_ADDRESS);
        let climate = sensor.measure(&mut bus, &mut NoopDelay).unwrap();
        assert!((climate.celsius - 25.0).abs() < 0.01);
        assert!((climate.fahrenheit - 77.0).abs() < 0.01);
        assert!((climate.humidity - 50.0).abs() < 0.01);
        assert_eq!(bus.written, vec![(DEFAULT_ADDRESS, vec![0x24, 0x00])]);
    }

    #[test]
    fn corrupt_temperature_word_is_rejected() {
        let mut bus =
            FakeBus::new().with_read(DEFAULT_ADDRESS, &[0x66, 0x66, 0x00, 0x80, 0x00, 0xA2]);
        let mut sensor = Sht30::new(DEFAULT_ADDRESS);
        assert_eq!(
            sensor.measure(&mut bus, &mut NoopDelay),
            Err(SensorError::Crc)
        );
    }

    #[test]
    fn bus_error_is_surfaced() {
        let mut bus = FakeBus::new().with_failing(DEFAULT_ADDRESS);
        let mut sensor = Sht30::new(DEFAULT_ADDRESS);
        assert!(matches!(
            sensor.measure(&mut bus, &mut NoopDelay),
            Err(SensorError::Bus(_))
        ));
    }
}

//! SGP30 air quality sensor (eCO2 / TVOC).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{SensorError, checked_word};

/// Fixed bus address of the SGP30.
pub const DEFAULT_ADDRESS: u8 = 0x58;

const CMD_IAQ_INIT: [u8; 2] = [0x20, 0x03];
const CMD_MEASURE_IAQ: [u8; 2] = [0x20, 0x08];
const CMD_GET_SERIAL_ID: [u8; 2] = [0x36, 0x82];

/// One IAQ measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirQuality {
    /// Estimated CO2 in ppm. Inferred from VOC sensing, not a direct CO2
    /// measurement; the on-chip algorithm reports its 400 ppm baseline
    /// during the warm-up phase after init.
    pub eco2: u16,
    /// Total volatile organic compounds in ppb.
    pub tvoc: u16,
}

#[derive(Debug)]
pub struct Sgp30 {
    address: u8,
}

impl Sgp30 {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Starts the on-chip IAQ algorithm. Must run once before measuring.
    pub fn init<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<(), SensorError<I2C::Error>> {
        i2c.write(self.address, &CMD_IAQ_INIT)
            .map_err(SensorError::Bus)?;
        delay.delay_ms(10);
        Ok(())
    }

    /// Reads the 48-bit device serial as three words.
    pub fn serial<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<[u16; 3], SensorError<I2C::Error>> {
        i2c.write(self.address, &CMD_GET_SERIAL_ID)
            .map_err(SensorError::Bus)?;
        delay.delay_ms(1);
        let mut buf = [0u8; 9];
        i2c.read(self.address, &mut buf)
            .map_err(SensorError::Bus)?;
        Ok([
            checked_word(&buf[0..3])?,
            checked_word(&buf[3..6])?,
            checked_word(&buf[6..9])?,
        ])
    }

    /// Runs one IAQ measurement. The device needs 12 ms between the
    /// command and the readout.
    pub fn measure<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
    ) -> Result<AirQuality, SensorError<I2C::Error>> {
        i2c.write(self.address, &CMD_MEASURE_IAQ)
            .map_err(SensorError::Bus)?;
        delay.delay_ms(12);
        let mut buf = [0u8; 6];
        i2c.read(self.address, &mut buf)
            .map_err(SensorError::Bus)?;
        Ok(AirQuality {
            eco2: checked_word(&buf[0..3])?,
            tvoc: checked_word(&buf[3..6])?,
        })
    }
}

//! BH1750 ambient light sensor.

use embedded_hal::i2c::I2c;

use super::SensorError;

/// Default bus address (ADDR pin low).
pub const DEFAULT_ADDRESS: u8 = 0x23;

const CMD_POWER_ON: u8 = 0x01;
const CMD_CONTINUOUS_HIGH_RES: u8 = 0x10;

/// Datasheet scale factor between the raw conversion and lux.
const LUX_SCALE: f32 = 1.2;

/// BH1750 driven in continuous high-resolution mode (1 lx resolution,
/// 120 ms conversion time). Once started the device always has a fresh
/// conversion available, so a read is just a two-byte fetch.
#[derive(Debug)]
pub struct Bh1750 {
    address: u8,
}

impl Bh1750 {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Powers the device on and starts continuous high-resolution
    /// measurements.
    pub fn init<I2C: I2c>(&mut self, i2c: &mut I2C) -> Result<(), SensorError<I2C::Error>> {
        i2c.write(self.address, &[CMD_POWER_ON])
            .map_err(SensorError::Bus)?;
        i2c.write(self.address, &[CMD_CONTINUOUS_HIGH_RES])
            .map_err(SensorError::Bus)?;
        Ok(())
    }

    /// Fetches the current light level in lux.
    pub fn read_lux<I2C: I2c>(&mut self, i2c: &mut I2C) -> Result<u16, SensorError<I2C::Error>> {
        let mut raw = [0u8; 2];
        i2c.read(self.address, &mut raw)
            .map_err(SensorError::Bus)?;
        Ok((u16::from_be_bytes(raw) as f32 / LUX_SCALE) as u16)
    }
}

//! One sampling pass across the sensor set.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::readings::{SamplePassStatus, SensorReadings, TemperatureUnit};
use crate::sensors::{Bh1750, Sgp30, Sht30, bh1750, sgp30, sht30};

/// The three sensors sharing the node's I2C bus.
pub struct SensorBank {
    pub light: Bh1750,
    pub air: Sgp30,
    pub climate: Sht30,
}

impl SensorBank {
    /// Bank with every sensor on its default address.
    pub const fn new() -> Self {
        Self {
            light: Bh1750::new(bh1750::DEFAULT_ADDRESS),
            air: Sgp30::new(sgp30::DEFAULT_ADDRESS),
            climate: Sht30::new(sht30::DEFAULT_ADDRESS),
        }
    }

    /// Reads the light level into the store.
    ///
    /// The light metric carries no failure marker: a failed bus read
    /// leaves the previous value in place and the line still renders
    /// numerically on the next document.
    pub fn read_light<I2C: I2c>(&mut self, i2c: &mut I2C, store: &mut SensorReadings) {
        if let Ok(lux) = self.light.read_lux(i2c) {
            store.light_level = lux;
        }
    }

    /// Reads eCO2/TVOC into the store. A failed read leaves both fields
    /// unchanged and reports failure.
    pub fn read_air<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
        store: &mut SensorReadings,
    ) -> bool {
        match self.air.measure(i2c, delay) {
            Ok(air) => {
                store.eco2 = air.eco2;
                store.tvoc = air.tvoc;
                true
            }
            Err(_) => false,
        }
    }

    /// Reads temperature/humidity into the store, selecting the requested
    /// temperature scale. A failed read leaves both fields unchanged and
    /// reports failure.
    pub fn read_climate<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
        store: &mut SensorReadings,
        unit: TemperatureUnit,
    ) -> bool {
        match self.climate.measure(i2c, delay) {
            Ok(climate) => {
                store.temperature = match unit {
                    TemperatureUnit::Celsius => climate.celsius,
                    TemperatureUnit::Fahrenheit => climate.fahrenheit,
                };
                store.humidity = climate.humidity;
                true
            }
            Err(_) => false,
        }
    }

    /// One full pass in fixed order: light, then air, then climate. No
    /// retries; a failed sub-read is reported in the returned status and
    /// the caller may simply sample again on the next request.
    pub fn sample<I2C: I2c, D: DelayNs>(
        &mut self,
        i2c: &mut I2C,
        delay: &mut D,
        store: &mut SensorReadings,
        unit: TemperatureUnit,
    ) -> SamplePassStatus {
        self.read_light(i2c, store);
        let air_ok = self.read_air(i2c, delay, store);
        let climate_ok = self.read_climate(i2c, delay, store, unit);
        SamplePassStatus::new(air_ok, climate_ok)
    }
}

impl Default for SensorBank {
    fn default() -> Self {
        Self::new()
    }
}

//! Application context for the request path.
//!
//! Everything a request touches lives here: the sensor bus, the driver
//! bank, the reading store and the device identity. The context is built
//! once at startup and moved into the application task, so no global
//! mutable state is needed and the store is only ever touched from that
//! one task.

use enviro_core::metrics::{self, DeviceIdentity, MetricsDoc};
use enviro_core::readings::{SamplePassStatus, SensorReadings, TemperatureUnit};
use enviro_core::sampler::SensorBank;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::i2c::master::I2c;

pub struct NodeContext {
    i2c: I2c<'static, Blocking>,
    delay: Delay,
    sensors: SensorBank,
    readings: SensorReadings,
    pub identity: DeviceIdentity,
    unit: TemperatureUnit,
}

impl NodeContext {
    pub fn new(
        i2c: I2c<'static, Blocking>,
        sensors: SensorBank,
        identity: DeviceIdentity,
        unit: TemperatureUnit,
    ) -> Self {
        Self {
            i2c,
            delay: Delay::new(),
            sensors,
            readings: SensorReadings::default(),
            identity,
            unit,
        }
    }

    /// One full sampling pass across all three sensors. Blocking bus
    /// reads run inline, so a stuck sensor stalls the request that
    /// triggered the pass.
    pub fn sample(&mut self) -> SamplePassStatus {
        self.sensors
            .sample(&mut self.i2c, &mut self.delay, &mut self.readings, self.unit)
    }

    /// Renders the current store with the given pass status.
    pub fn render(&self, status: SamplePassStatus) -> MetricsDoc {
        metrics::render(&self.readings, status, &self.identity)
    }
}

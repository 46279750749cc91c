#![no_std]

//! ESP32-C3 Environmental Sensor Node Library
//!
//! This library provides modules for implementing a WiFi-enabled sensor
//! node that samples a BH1750 light sensor, an SGP30 air quality sensor
//! and an SHT30 climate sensor over a shared I2C bus and serves the
//! latest readings as a plaintext metrics document over HTTP.

pub mod context;
pub mod server;
pub mod wifi;

/// Project version information
pub const VERSION: &str = "0.1.0-dev";

/// Default configuration constants
pub mod config {
    use enviro_core::readings::TemperatureUnit;

    /// TCP port the metrics endpoint binds to
    pub const HTTP_PORT: u16 = 9926;

    /// Temperature scale used for the `temp` metric
    pub const TEMPERATURE_UNIT: TemperatureUnit = TemperatureUnit::Fahrenheit;

    /// Sensor bus pins (shared by all three sensors)
    pub const I2C_SDA_PIN: u8 = 4;
    pub const I2C_SCL_PIN: u8 = 5;

    /// Sensor bus frequency in kHz
    pub const I2C_FREQUENCY_KHZ: u32 = 100;

    /// WiFi configuration
    /// Read from environment variables at compile time
    pub const WIFI_SSID: &str = env!("WIFI_SSID");
    pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

    /// Optional device hostname, read from the environment at compile
    /// time. Empty means the board default name; otherwise it is
    /// advertised in the DHCP request and becomes the `id` tag on every
    /// metric line.
    pub const DEVICE_HOSTNAME: &str = env!("DEVICE_HOSTNAME");

    /// Delay between WiFi association attempts in milliseconds
    pub const WIFI_RETRY_INTERVAL_MS: u64 = 5000;

    /// Upper bound on association attempts. `None` retries forever; the
    /// node has no offline fallback mode.
    pub const WIFI_MAX_ATTEMPTS: Option<u32> = None;
}

/// Error types for the sensor node
#[derive(Debug, Clone, Copy)]
pub enum NodeError {
    /// WiFi connection error
    WiFiError,
    /// HTTP server error
    ServerError,
    /// Sensor bus error
    BusError,
    /// System error
    SystemError,
}

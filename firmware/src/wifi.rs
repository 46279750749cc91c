//! WiFi module for the ESP32-C3 sensor node
//!
//! Handles station association and DHCP using esp-wifi with embassy-net

use core::fmt::Write as _;

use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use esp_println::println;
use esp_wifi::wifi::{AuthMethod, ClientConfiguration, Configuration, WifiController};
use heapless::String;

use crate::{NodeError, config};

/// WiFi manager for handling network connectivity
pub struct WiFiManager<'a> {
    controller: WifiController<'a>,
    stack: Stack<'a>,
    started: bool,
    is_connected: bool,
}

impl<'a> WiFiManager<'a> {
    /// Create a new WiFi manager instance
    pub fn new(controller: WifiController<'a>, stack: Stack<'a>) -> Self {
        Self {
            controller,
            stack,
            started: false,
            is_connected: false,
        }
    }

    /// Single association attempt against the given network
    pub async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), NodeError> {
        println!("[WIFI] Connecting to WiFi network: {}", ssid);

        let client_config = ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| NodeError::WiFiError)?,
            password: password.try_into().map_err(|_| NodeError::WiFiError)?,
            auth_method: AuthMethod::WPA2Personal,
            ..Default::default()
        };

        self.controller
            .set_configuration(&Configuration::Client(client_config))
            .map_err(|_| NodeError::WiFiError)?;

        if !self.started {
            self.controller.start().map_err(|_| NodeError::WiFiError)?;
            self.started = true;
        }
        self.controller.connect().map_err(|_| NodeError::WiFiError)?;

        // Wait for the association result
        let mut attempts = 0;
        while !self.controller.is_connected().unwrap_or(false) && attempts < 50 {
            attempts += 1;
            Timer::after(Duration::from_millis(100)).await;
        }

        if self.controller.is_connected().unwrap_or(false) {
            self.is_connected = true;
            println!("[WIFI] Successfully connected to WiFi network");
            Ok(())
        } else {
            println!(
                "[WIFI] Failed to connect to WiFi network after {} attempts",
                attempts
            );
            Err(NodeError::WiFiError)
        }
    }

    /// Associate with the configured network, retrying on the configured
    /// interval. With no attempt bound this blocks until association
    /// succeeds; there is no offline fallback mode.
    pub async fn connect_until_associated(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> Result<(), NodeError> {
        let mut attempts: u32 = 0;
        loop {
            match self.connect(ssid, password).await {
                Ok(()) => return Ok(()),
                Err(_) => {
                    attempts = attempts.saturating_add(1);
                    if let Some(max) = config::WIFI_MAX_ATTEMPTS {
                        if attempts >= max {
                            println!("[WIFI] Giving up after {} association attempts", attempts);
                            return Err(NodeError::WiFiError);
                        }
                    }
                    println!("[WIFI] Association attempt {} failed, retrying", attempts);
                    Timer::after(Duration::from_millis(config::WIFI_RETRY_INTERVAL_MS)).await;
                }
            }
        }
    }

    /// Wait for the DHCP lease and return the assigned address
    pub async fn wait_for_ip(&self) -> [u8; 4] {
        self.stack.wait_config_up().await;
        loop {
            if let Some(config) = self.stack.config_v4() {
                return config.address.address().octets();
            }
            Timer::after(Duration::from_millis(100)).await;
        }
    }

    /// Check if WiFi is connected
    pub fn is_connected(&self) -> bool {
        self.is_connected && self.controller.is_connected().unwrap_or(false)
    }
}

/// Formats a MAC address the way the platform reports it
pub fn format_mac(mac: [u8; 6]) -> String<17> {
    let mut s: String<17> = String::new();
    for (idx, byte) in mac.iter().enumerate() {
        let _ = write!(s, "{:02X}", byte);
        if idx != mac.len() - 1 {
            let _ = s.push(':');
        }
    }
    s
}

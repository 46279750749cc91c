//! I2C sensor drivers.
//!
//! Each driver is a small struct holding the device address; operations
//! borrow the shared bus (and a delay where the protocol needs one) so a
//! single I2C master serves all three sensors from one task. Only the
//! handful of commands this node uses are implemented.

pub mod bh1750;
pub mod sgp30;
pub mod sht30;

pub use bh1750::Bh1750;
pub use sgp30::Sgp30;
pub use sht30::Sht30;

/// Error from a sensor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError<E> {
    /// The underlying I2C transfer failed.
    Bus(E),
    /// A response word failed its CRC check.
    Crc,
}

/// CRC-8 used by the Sensirion parts (SGP30, SHT30): polynomial 0x31,
/// initial value 0xFF, computed over each 2-byte word.
pub(crate) fn sensirion_crc8(word: [u8; 2]) -> u8 {
    let mut crc = 0xFFu8;
    for byte in word {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Validates a `word || crc` triplet and returns the word value.
pub(crate) fn checked_word<E>(bytes: &[u8]) -> Result<u16, SensorError<E>> {
    if sensirion_crc8([bytes[0], bytes[1]]) != bytes[2] {
        return Err(SensorError::Crc);
    }
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

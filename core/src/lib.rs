#![cfg_attr(not(test), no_std)]

//! Hardware-independent core of the environmental sensor node.
//!
//! Everything that does not need a real ESP32-C3 lives here: the reading
//! store, the sampling pass, the sensor drivers (written against the
//! `embedded-hal` 1.0 traits), the metrics document renderer and the
//! minimal HTTP request model. The board crate supplies the bus, the
//! network stack and the run loop.

pub mod http;
pub mod metrics;
pub mod readings;
pub mod sampler;
pub mod sensors;

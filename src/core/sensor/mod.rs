// src/core/sensor/mod.rs

//! Sensor file output: atomic single-value writes and the reset pass that
//! returns every output to the "no data" sentinel.

pub mod reset;
pub mod writer;

pub use reset::reset_sensors;
pub use writer::{SENTINEL, SensorWriter, format_value};

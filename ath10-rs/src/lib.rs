#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # ATH10 - Driver for the ATH10 Humidity and Temperature Sensor
//! This crate provides a blocking driver for the ATH10 sensor on a two-wire bus.
//!
//! A measurement cycle writes the measure command, waits out the conversion
//! time through an injected [`DelayNs`](embedded_hal::delay::DelayNs)
//! provider, reads the 6-byte data frame and decodes the two 20-bit fields.
//! The bus is any [`embedded_hal::i2c::I2c`] implementation, or any type
//! implementing [`Transport`].
mod command;
mod device;
mod error;
mod frame;
mod status;
mod transport;

pub use command::{ATH10_ADDRESS, CONVERSION_TIME_MS, Command, FRAME_LEN, SETTLE_TIME_MS};
pub use device::Ath10;
pub use error::Error;
pub use frame::{
    Humidity, Measurement, RawFrame, Temperature, calibrate_humidity, calibrate_temperature,
    decode_humidity, decode_temperature,
};
pub use status::{Status, WorkMode};
pub use transport::Transport;

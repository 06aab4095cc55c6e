use crate::{command::FRAME_LEN, status::Status};

/// Full-scale range of the 20-bit humidity and temperature fields.
const FULL_SCALE: f32 = 1_048_576.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A complete data frame read from the sensor after a measurement.
///
/// Layout: `[status][hum_hi][hum_mid][hum_lo:4 | temp_hi:4][temp_mid][temp_lo]`.
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    /// Wrap six bytes received from the sensor.
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the frame.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// The status byte leading the frame.
    pub fn status(&self) -> Status {
        Status::from_bits(self.0[0])
    }

    /// The humidity field of the frame.
    pub fn humidity(&self) -> Humidity {
        Humidity {
            value: decode_humidity(self),
        }
    }

    /// The temperature field of the frame.
    pub fn temperature(&self) -> Temperature {
        Temperature {
            value: decode_temperature(self),
        }
    }

    /// Both calibrated quantities of the frame.
    pub fn measurement(&self) -> Measurement {
        Measurement {
            temperature: self.temperature().celsius(),
            humidity: self.humidity().percentage(),
        }
    }
}

impl From<[u8; FRAME_LEN]> for RawFrame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

/// Extract the 20-bit humidity value: bytes 1 and 2 and the upper nibble of byte 3.
pub fn decode_humidity(frame: &RawFrame) -> u32 {
    let b = &frame.0;
    ((b[1] as u32) << 16 | (b[2] as u32) << 8 | b[3] as u32) >> 4
}

/// Extract the 20-bit temperature value: the lower nibble of byte 3 and bytes 4 and 5.
pub fn decode_temperature(frame: &RawFrame) -> u32 {
    let b = &frame.0;
    ((b[3] & 0x0f) as u32) << 16 | (b[4] as u32) << 8 | b[5] as u32
}

/// Convert a raw humidity value to relative humidity in percent.
pub fn calibrate_humidity(raw: u32) -> f32 {
    (raw as f32 / FULL_SCALE) * 100.0
}

/// Convert a raw temperature value to degrees Celsius.
pub fn calibrate_temperature(raw: u32) -> f32 {
    (raw as f32 / FULL_SCALE) * 200.0 - 50.0
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a temperature measurement from the ATH10 sensor.
pub struct Temperature {
    pub(crate) value: u32,
}

impl Temperature {
    /// Converts the raw temperature value to Celsius.
    pub fn celsius(&self) -> f32 {
        calibrate_temperature(self.value)
    }

    /// The raw 20-bit value.
    pub fn raw(&self) -> u32 {
        self.value
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Represents a humidity measurement from the ATH10 sensor.
pub struct Humidity {
    pub(crate) value: u32,
}

impl Humidity {
    /// Converts the raw humidity value to percentage (0-100).
    pub fn percentage(&self) -> f32 {
        calibrate_humidity(self.value)
    }

    /// The raw 20-bit value.
    pub fn raw(&self) -> u32 {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Calibrated temperature and humidity from a single conversion.
pub struct Measurement {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

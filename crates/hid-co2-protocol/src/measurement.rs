//! Opcode classification.

use crate::frame::Frame;

/// Opcode of a CO₂ concentration frame.
pub const OPCODE_CO2: u8 = 0x50;

/// Opcode of an ambient temperature frame.
pub const OPCODE_TEMPERATURE: u8 = 0x42;

/// Temperature frames carry Kelvin in 1/16 K steps.
pub const TEMPERATURE_SCALE: f64 = 16.0;

/// Offset from Kelvin to degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// A single typed reading extracted from a validated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// CO₂ concentration in parts per million.
    Co2 { ppm: u16 },
    /// Ambient temperature in degrees Celsius.
    Temperature { celsius: f64 },
}

/// Outcome of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Measurement(Measurement),
    /// Valid frame with an opcode this crate does not interpret, such as
    /// humidity (`0x41`) on some hardware variants. Not an error.
    Ignored { opcode: u8 },
}

impl Classification {
    pub fn measurement(self) -> Option<Measurement> {
        match self {
            Self::Measurement(m) => Some(m),
            Self::Ignored { .. } => None,
        }
    }
}

/// Convert a raw temperature value to degrees Celsius.
pub fn temperature_celsius(raw: u16) -> f64 {
    f64::from(raw) / TEMPERATURE_SCALE - KELVIN_OFFSET
}

/// Map a validated frame to a measurement by its opcode.
pub fn classify(frame: &Frame) -> Classification {
    let value = frame.value();
    match frame.opcode() {
        OPCODE_CO2 => Classification::Measurement(Measurement::Co2 { ppm: value }),
        OPCODE_TEMPERATURE => Classification::Measurement(Measurement::Temperature {
            celsius: temperature_celsius(value),
        }),
        opcode => Classification::Ignored { opcode },
    }
}

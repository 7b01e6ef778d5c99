//! Latest-known readings plus the emission timestamp.

use co2mon_hid_protocol::Measurement;
use serde::Serialize;

/// Aggregated monitor state as emitted on every tick.
///
/// Readings that have never been observed stay `None` and serialize as
/// `null`, never as a numeric default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Unix seconds of the last emission.
    pub time: i64,
    /// CO₂ concentration in ppm.
    pub co2: Option<u16>,
    /// Temperature in degrees Celsius.
    pub temp: Option<f64>,
}

impl Snapshot {
    /// Overwrite the field matching the measurement's kind.
    pub fn apply(&mut self, measurement: Measurement) {
        match measurement {
            Measurement::Co2 { ppm } => self.co2 = Some(ppm),
            Measurement::Temperature { celsius } => self.temp = Some(celsius),
        }
    }

    pub fn stamp(&mut self, time: i64) {
        self.time = time;
    }
}

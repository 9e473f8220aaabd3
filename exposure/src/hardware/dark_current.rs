//! Detector dark current as a function of operating temperature
//!
//! Uses the usual rule of thumb for silicon: dark current doubles for every
//! fixed step in temperature (about 6-8 °C for CCDs).

use serde::{Deserialize, Serialize};

/// Dark current referenced to one measured operating point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkCurrentModel {
    /// Dark current in electrons/pixel/second at the reference temperature
    pub reference_e_per_s: f64,
    /// Reference temperature in degrees Celsius
    pub reference_temp_c: f64,
    /// Temperature increase that doubles the dark current
    pub doubling_temp_c: f64,
}

impl DarkCurrentModel {
    pub fn new(reference_e_per_s: f64, reference_temp_c: f64, doubling_temp_c: f64) -> Self {
        Self {
            reference_e_per_s,
            reference_temp_c,
            doubling_temp_c,
        }
    }

    /// A detector with no measurable dark current
    pub fn none() -> Self {
        Self::new(0.0, 0.0, 8.0)
    }

    /// Electrons/pixel/second at `temp_c`
    pub fn at_temperature(&self, temp_c: f64) -> f64 {
        let doublings = (temp_c - self.reference_temp_c) / self.doubling_temp_c;
        self.reference_e_per_s * 2f64.powf(doublings)
    }
}

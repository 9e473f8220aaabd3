//! Broadband optical filter catalog (Johnson-Cousins UBVRI).
//!
//! Filters are addressed by a short key (`"U"`, `"B"`, `"V"`, `"R"`, `"I"`
//! or `"clear"`) the way an exposure configuration names them. Wavelengths
//! are Angstrom.
//!
//! # Examples
//! ```rust
//! use exposure::photometry::filters;
//!
//! let v = filters::lookup("V").unwrap();
//! assert_eq!(v.at(5400.0), 1.0);
//! assert!(filters::lookup("Z").is_err());
//! ```

use super::curve::TransmissionCurve;
use super::grid::{PIPELINE_END_ANGSTROM, PIPELINE_START_ANGSTROM};
use crate::error::ExposureError;

/// Keys accepted by [`lookup`]
pub const FILTER_KEYS: [&str; 6] = ["U", "B", "V", "R", "I", "clear"];

/// Johnson U passband, format: (wavelength_angstrom, transmission)
const U_FILTER_DATA: [(f64, f64); 17] = [
    (2800.0, 0.0),
    (2900.0, 0.05),
    (3000.0, 0.2),
    (3100.0, 0.4),
    (3200.0, 0.6),
    (3300.0, 0.8),
    (3400.0, 0.95),
    (3500.0, 1.0),
    (3600.0, 0.95),
    (3700.0, 0.8),
    (3800.0, 0.6),
    (3900.0, 0.4),
    (4000.0, 0.2),
    (4100.0, 0.1),
    (4200.0, 0.05),
    (4300.0, 0.0),
    (4400.0, 0.0),
];

/// Johnson B passband
const B_FILTER_DATA: [(f64, f64); 21] = [
    (3500.0, 0.0),
    (3600.0, 0.05),
    (3700.0, 0.1),
    (3800.0, 0.2),
    (3900.0, 0.35),
    (4000.0, 0.55),
    (4100.0, 0.7),
    (4200.0, 0.85),
    (4300.0, 0.95),
    (4400.0, 1.0),
    (4500.0, 1.0),
    (4600.0, 0.95),
    (4700.0, 0.85),
    (4800.0, 0.7),
    (4900.0, 0.55),
    (5000.0, 0.4),
    (5100.0, 0.3),
    (5200.0, 0.2),
    (5300.0, 0.1),
    (5400.0, 0.05),
    (5500.0, 0.0),
];

/// Johnson V passband
const V_FILTER_DATA: [(f64, f64); 23] = [
    (4600.0, 0.0),
    (4700.0, 0.05),
    (4800.0, 0.15),
    (4900.0, 0.3),
    (5000.0, 0.5),
    (5100.0, 0.7),
    (5200.0, 0.85),
    (5300.0, 0.95),
    (5400.0, 1.0),
    (5500.0, 1.0),
    (5600.0, 0.95),
    (5700.0, 0.85),
    (5800.0, 0.7),
    (5900.0, 0.6),
    (6000.0, 0.45),
    (6100.0, 0.35),
    (6200.0, 0.25),
    (6300.0, 0.15),
    (6400.0, 0.1),
    (6500.0, 0.05),
    (6600.0, 0.03),
    (6700.0, 0.01),
    (6800.0, 0.0),
];

/// Cousins R passband (Bessell 1990)
const R_FILTER_DATA: [(f64, f64); 24] = [
    (5500.0, 0.0),
    (5600.0, 0.23),
    (5700.0, 0.74),
    (5800.0, 0.91),
    (5900.0, 0.97),
    (6000.0, 1.0),
    (6100.0, 0.98),
    (6200.0, 0.96),
    (6300.0, 0.93),
    (6400.0, 0.90),
    (6500.0, 0.86),
    (6600.0, 0.81),
    (6700.0, 0.78),
    (6800.0, 0.72),
    (6900.0, 0.67),
    (7000.0, 0.61),
    (7100.0, 0.56),
    (7200.0, 0.51),
    (7300.0, 0.46),
    (7400.0, 0.40),
    (7500.0, 0.35),
    (8000.0, 0.14),
    (8500.0, 0.03),
    (9000.0, 0.0),
];

/// Cousins I passband (Bessell 1990)
const I_FILTER_DATA: [(f64, f64); 23] = [
    (7000.0, 0.0),
    (7100.0, 0.024),
    (7200.0, 0.232),
    (7300.0, 0.555),
    (7400.0, 0.785),
    (7500.0, 0.910),
    (7600.0, 0.965),
    (7700.0, 0.985),
    (7800.0, 0.990),
    (7900.0, 0.995),
    (8000.0, 1.0),
    (8100.0, 1.0),
    (8200.0, 0.990),
    (8300.0, 0.980),
    (8400.0, 0.950),
    (8500.0, 0.910),
    (8600.0, 0.860),
    (8700.0, 0.750),
    (8800.0, 0.560),
    (8900.0, 0.330),
    (9000.0, 0.150),
    (9100.0, 0.030),
    (9200.0, 0.0),
];

/// Unfiltered light path over the whole pipeline range
const CLEAR_FILTER_DATA: [(f64, f64); 2] = [
    (PIPELINE_START_ANGSTROM, 1.0),
    (PIPELINE_END_ANGSTROM, 1.0),
];

fn table_for(key: &str) -> Option<&'static [(f64, f64)]> {
    match key {
        "U" => Some(&U_FILTER_DATA),
        "B" => Some(&B_FILTER_DATA),
        "V" => Some(&V_FILTER_DATA),
        "R" => Some(&R_FILTER_DATA),
        "I" => Some(&I_FILTER_DATA),
        "clear" => Some(&CLEAR_FILTER_DATA),
        _ => None,
    }
}

/// Transmission curve of the filter named `key`
///
/// # Errors
/// `ExposureError::Catalog` for keys outside [`FILTER_KEYS`].
pub fn lookup(key: &str) -> Result<TransmissionCurve, ExposureError> {
    let data = table_for(key).ok_or_else(|| {
        ExposureError::Catalog(format!(
            "optical filter {key:?} (known: {})",
            FILTER_KEYS.join(", ")
        ))
    })?;

    TransmissionCurve::from_pairs(data)
        .map_err(|e| ExposureError::InvalidValue(format!("filter {key} table: {e}")))
}

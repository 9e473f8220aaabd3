//! Detector quantum efficiency by sensor material
//!
//! Curves are representative for CCD families rather than a specific
//! device: thinned back-illuminated, deep-depletion (red-optimised) and
//! front-illuminated. Wavelengths in Angstrom.

use once_cell::sync::Lazy;

use super::curve::TransmissionCurve;
use crate::error::ExposureError;

/// Keys accepted by [`lookup`]
pub const MATERIAL_KEYS: [&str; 3] = ["back-illuminated", "deep-depleted", "front-illuminated"];

static CATALOG: Lazy<Vec<(&'static str, TransmissionCurve)>> = Lazy::new(|| {
    let wavelengths = vec![
        3200.0, 3500.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0, 10000.0,
    ];

    let back = vec![0.55, 0.70, 0.85, 0.93, 0.92, 0.85, 0.65, 0.35, 0.10];
    let deep = vec![0.35, 0.50, 0.75, 0.88, 0.92, 0.93, 0.88, 0.70, 0.35];
    let front = vec![0.05, 0.10, 0.20, 0.35, 0.42, 0.40, 0.30, 0.15, 0.03];

    vec![
        (
            "back-illuminated",
            TransmissionCurve::from_table(wavelengths.clone(), back)
                .expect("back-illuminated QE table is valid"),
        ),
        (
            "deep-depleted",
            TransmissionCurve::from_table(wavelengths.clone(), deep)
                .expect("deep-depleted QE table is valid"),
        ),
        (
            "front-illuminated",
            TransmissionCurve::from_table(wavelengths, front)
                .expect("front-illuminated QE table is valid"),
        ),
    ]
});

/// Quantum efficiency curve for the detector material named `key`
///
/// # Errors
/// `ExposureError::Catalog` for keys outside [`MATERIAL_KEYS`].
pub fn lookup(key: &str) -> Result<&'static TransmissionCurve, ExposureError> {
    CATALOG
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, curve)| curve)
        .ok_or_else(|| {
            ExposureError::Catalog(format!(
                "detector material {key:?} (known: {})",
                MATERIAL_KEYS.join(", ")
            ))
        })
}

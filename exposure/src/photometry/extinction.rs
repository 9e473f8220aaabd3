//! Atmospheric extinction and mirror reflectivity
//!
//! Extinction follows Bouguer's law: a source observed through airmass `X`
//! is dimmed by `k(λ) X` magnitudes, so the transmitted fraction is
//! `10^(-0.4 k(λ) X)`. The coefficient table is a typical dark mountain
//! site; mirror reflectivity is bare aluminium.

use once_cell::sync::Lazy;

use super::grid::SpectralGrid;
use crate::algo::interp;
use crate::error::ExposureError;

/// Extinction coefficient table, format: (wavelength_angstrom, mag per airmass)
const EXTINCTION_DATA: [(f64, f64); 14] = [
    (3200.0, 0.86),
    (3400.0, 0.52),
    (3600.0, 0.42),
    (3800.0, 0.35),
    (4000.0, 0.30),
    (4500.0, 0.22),
    (5000.0, 0.17),
    (5500.0, 0.14),
    (6000.0, 0.12),
    (6500.0, 0.09),
    (7000.0, 0.07),
    (8000.0, 0.05),
    (9000.0, 0.04),
    (10000.0, 0.03),
];

/// Aluminium reflectivity per surface
const ALUMINIUM_DATA: [(f64, f64); 9] = [
    (3200.0, 0.90),
    (4000.0, 0.92),
    (5000.0, 0.915),
    (6000.0, 0.905),
    (7000.0, 0.895),
    (8000.0, 0.87),
    (8500.0, 0.865),
    (9000.0, 0.88),
    (10000.0, 0.93),
];

type Columns = (Vec<f64>, Vec<f64>);

static EXTINCTION_COLUMNS: Lazy<Columns> = Lazy::new(|| EXTINCTION_DATA.iter().copied().unzip());
static ALUMINIUM_COLUMNS: Lazy<Columns> = Lazy::new(|| ALUMINIUM_DATA.iter().copied().unzip());

fn lookup_clamped((xs, ys): &Columns, wavelength_angstrom: f64) -> f64 {
    let last = xs.len() - 1;
    if wavelength_angstrom <= xs[0] {
        return ys[0];
    }
    if wavelength_angstrom >= xs[last] {
        return ys[last];
    }
    interp(wavelength_angstrom, xs, ys).unwrap_or(ys[last])
}

/// Extinction coefficient k(λ) in magnitudes per airmass
///
/// Held constant beyond the ends of the table.
pub fn extinction_coefficient(wavelength_angstrom: f64) -> f64 {
    lookup_clamped(&EXTINCTION_COLUMNS, wavelength_angstrom)
}

/// Extinction coefficient at the V reference wavelength
pub fn v_band_extinction() -> f64 {
    extinction_coefficient(super::spectrum::V_REFERENCE_ANGSTROM)
}

/// Transmitted fraction through `airmass` at one wavelength
pub fn transmission_at(wavelength_angstrom: f64, airmass: f64) -> f64 {
    10f64.powf(-0.4 * extinction_coefficient(wavelength_angstrom) * airmass)
}

/// Atmospheric transmission on the sampling of `template`
///
/// # Errors
/// `InvalidConfiguration` if `airmass` is not finite or below 1.
pub fn atmospheric_transmission(
    template: &SpectralGrid,
    airmass: f64,
) -> Result<SpectralGrid, ExposureError> {
    if !(airmass.is_finite() && airmass >= 1.0) {
        return Err(ExposureError::InvalidConfiguration(format!(
            "airmass must be at least 1, got {airmass}"
        )));
    }

    Ok(SpectralGrid::from_fn(
        template.x0(),
        template.dx(),
        template.len(),
        |x| transmission_at(x, airmass),
    )?)
}

/// Combined reflectivity of `reflections` aluminium surfaces
pub fn mirror_reflectivity(
    template: &SpectralGrid,
    reflections: u32,
) -> Result<SpectralGrid, ExposureError> {
    let exponent = reflections as i32;
    Ok(SpectralGrid::from_fn(
        template.x0(),
        template.dx(),
        template.len(),
        |x| lookup_clamped(&ALUMINIUM_COLUMNS, x).powi(exponent),
    )?)
}

//! Zodiacal light brightness and spectrum
//!
//! Brightness comes from the Leinert et al. (1998) table of V-band surface
//! brightness as a function of solar elongation and ecliptic latitude, as
//! tabulated in the STScI ETC background reference:
//! https://etc.stsci.edu/etcstatic/users_guide/1_ref_9_background.html#zodiacal-light
//!
//! Zodiacal light is scattered sunlight, so its spectral shape is taken from
//! the HST/STIS high-zodiacal spectrum (STIS IHB Table 6.4) and normalised
//! to unity at 5500 Angstrom. The same shape serves for scattered moonlight.
use ndarray::Array2;
use once_cell::sync::Lazy;
use thiserror::Error;

use super::spectrum::{ab_mag_to_photon_flux, V_REFERENCE_ANGSTROM};
use crate::algo::{bracket, interp};

/// Errors that can occur when working with zodiacal light data
#[derive(Error, Debug)]
pub enum ZodicalError {
    #[error("Coordinates out of range: solar elongation {0}, ecliptic latitude {1}")]
    OutOfRange(f64, f64),

    #[error("Solar elongation {0} at ecliptic latitude {1} is inside the solar exclusion zone")]
    ExclusionZone(f64, f64),
}

/// Zodiacal light brightness in V magnitudes per square arcsecond
pub struct ZodicalLight {
    /// Rows are solar elongations, columns ecliptic latitudes
    data: Array2<f64>,
}

const ELONGATIONS: [f64; 20] = [
    0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 60.0, 75.0, 90.0, 105.0, 120.0,
    135.0, 150.0, 165.0, 180.0,
];

const LATITUDES: [f64; 13] = [
    0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 45.0, 50.0, 60.0, 75.0, 90.0,
];

// NaN marks the region too close to the sun to observe
#[rustfmt::skip]
const LEINERT_V_MAG: [[f64; 13]; 20] = [
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.0708, 22.5136, 22.9538, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.0816, 22.5136, 22.9538, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.1033, 22.5210, 22.9538, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.1454, 22.5360, 22.9538, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.2004, 22.5743, 22.9649, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.0808,  22.2586, 22.6141, 22.9762, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 22.1578,  22.3237, 22.6554, 23.0107, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 21.9203,  22.2350,  22.3924, 22.7071, 23.0224, 23.2298],
    [ f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN, 21.8257,  22.0287,  22.3181,  22.4628, 22.7522, 23.0343, 23.2298],
    [ f64::NAN, f64::NAN, 21.0810,  21.3356,  21.5717,  21.7872,  21.9545,  22.1379,  22.3948,  22.5232, 22.7801, 23.0707, 23.2298],
    [ 20.8432,  21.0663,  21.3194,  21.5397,  21.7408,  21.9486,  22.0833,  22.2472,  22.4715,  22.5837, 22.8080, 23.1071, 23.2298],
    [ 21.1844,  21.3356,  21.5842,  21.7872,  21.9859,  22.1525,  22.2937,  22.4437,  22.6304,  22.7237, 22.9104, 23.1212, 23.2298],
    [ 21.6258,  21.6965,  21.8737,  22.0611,  22.2180,  22.3621,  22.4989,  22.6319,  22.7801,  22.8542, 23.0024, 23.1607, 23.2298],
    [ 21.9155,  21.9768,  22.0660,  22.2350,  22.3948,  22.5284,  22.6470,  22.7699,  22.9104,  22.9807, 23.1212, 23.2016, 23.2298],
    [ 22.1315,  22.1419,  22.2124,  22.3686,  22.5136,  22.6387,  22.7614,  22.8912,  22.9990,  23.0529, 23.1607, 23.2298, 23.2298],
    [ 22.2639,  22.2757,  22.3305,  22.4844,  22.5980,  22.7071,  22.8186,  22.9646,  23.0707,  23.1237, 23.2298, 23.2736, 23.2298],
    [ 22.3181,  22.3243,  22.3948,  22.5284,  22.6304,  22.7339,  22.8483,  22.9224,  23.0707,  23.1237, 23.2298, 23.2885, 23.2298],
    [ 22.3181,  22.3243,  22.4014,  22.5210,  22.6060,  22.6896,  22.7801,  22.8639,  22.9990,  23.0665, 23.2016, 23.3037, 23.2298],
    [ 22.2180,  22.2407,  22.3181,  22.4014,  22.4989,  22.5743,  22.6554,  22.7435,  22.9104,  22.9938, 23.1607, 23.3037, 23.2298],
    [ 22.0418,  22.1315,  22.2236,  22.3243,  22.4216,  22.5210,  22.6304,  22.7348,  22.8998,  22.9823, 23.1473, 23.3037, 23.2298],
];

impl Default for ZodicalLight {
    fn default() -> Self {
        Self::new()
    }
}

impl ZodicalLight {
    pub fn new() -> Self {
        let data = Array2::from_shape_fn((ELONGATIONS.len(), LATITUDES.len()), |(i, j)| {
            LEINERT_V_MAG[i][j]
        });
        Self { data }
    }

    /// V-band surface brightness (mag/arcsec²) by bilinear interpolation
    ///
    /// `latitude` is folded to its absolute value. Corners inside the
    /// exclusion zone are dropped and the remaining weights renormalised.
    pub fn get_brightness(&self, elongation: f64, latitude: f64) -> Result<f64, ZodicalError> {
        let abs_lat = latitude.abs();
        let (e1, e2, e_weight) =
            bracket(&ELONGATIONS, elongation).ok_or(ZodicalError::OutOfRange(elongation, latitude))?;
        let (b1, b2, b_weight) =
            bracket(&LATITUDES, abs_lat).ok_or(ZodicalError::OutOfRange(elongation, latitude))?;

        let corners = [
            (self.data[[e1, b1]], e_weight * b_weight),
            (self.data[[e1, b2]], e_weight * (1.0 - b_weight)),
            (self.data[[e2, b1]], (1.0 - e_weight) * b_weight),
            (self.data[[e2, b2]], (1.0 - e_weight) * (1.0 - b_weight)),
        ];

        let (sum, weight) = corners
            .iter()
            .filter(|(value, weight)| !value.is_nan() && *weight > 0.0)
            .fold((0.0, 0.0), |(sum, total), (value, weight)| {
                (sum + value * weight, total + weight)
            });

        if weight <= 0.0 {
            return Err(ZodicalError::ExclusionZone(elongation, latitude));
        }
        Ok(sum / weight)
    }

    /// Zodiacal photon flux (photons s⁻¹ cm⁻² Å⁻¹ arcsec⁻²) at one wavelength
    pub fn photon_flux(
        &self,
        elongation: f64,
        latitude: f64,
        wavelength_angstrom: f64,
    ) -> Result<f64, ZodicalError> {
        let v_mag = self.get_brightness(elongation, latitude)?;
        Ok(ab_mag_to_photon_flux(v_mag, V_REFERENCE_ANGSTROM) * solar_photon_shape(wavelength_angstrom))
    }
}

/// STIS high-zodiacal spectrum, format: (wavelength_angstrom, erg s⁻¹ cm⁻² Å⁻¹ arcsec⁻²)
const STIS_ZODI: [(f64, f64); 39] = [
    (3000.0, 1.25e-18),
    (3100.0, 1.50e-18),
    (3200.0, 2.30e-18),
    (3300.0, 2.95e-18),
    (3400.0, 2.86e-18),
    (3500.0, 2.79e-18),
    (3600.0, 2.74e-18),
    (3700.0, 3.32e-18),
    (3800.0, 3.12e-18),
    (3900.0, 3.34e-18),
    (4000.0, 4.64e-18),
    (4250.0, 4.65e-18),
    (4500.0, 5.58e-18),
    (4750.0, 5.46e-18),
    (5000.0, 5.15e-18),
    (5250.0, 5.37e-18),
    (5500.0, 5.34e-18),
    (5750.0, 5.40e-18),
    (6000.0, 5.25e-18),
    (6250.0, 5.02e-18),
    (6500.0, 4.92e-18),
    (6750.0, 4.79e-18),
    (7000.0, 4.55e-18),
    (7250.0, 4.43e-18),
    (7500.0, 4.23e-18),
    (7750.0, 4.04e-18),
    (8000.0, 3.92e-18),
    (8250.0, 3.76e-18),
    (8500.0, 3.50e-18),
    (8750.0, 3.43e-18),
    (9000.0, 3.23e-18),
    (9250.0, 3.07e-18),
    (9500.0, 2.98e-18),
    (9750.0, 2.86e-18),
    (10000.0, 2.78e-18),
    (10250.0, 2.67e-18),
    (10500.0, 2.56e-18),
    (10750.0, 2.41e-18),
    (11000.0, 2.31e-18),
];

static STIS_COLUMNS: Lazy<(Vec<f64>, Vec<f64>)> =
    Lazy::new(|| STIS_ZODI.iter().copied().unzip());

/// Photon-count shape of scattered sunlight, 1.0 at 5500 Angstrom
///
/// Energy flux is converted to photons (× λ) before normalising. Zero
/// outside 3000-11000 Angstrom.
pub fn solar_photon_shape(wavelength_angstrom: f64) -> f64 {
    let (xs, ys) = &*STIS_COLUMNS;
    let energy = |x: f64| interp(x, xs, ys).unwrap_or(0.0);

    let reference = energy(V_REFERENCE_ANGSTROM) * V_REFERENCE_ANGSTROM;
    energy(wavelength_angstrom) * wavelength_angstrom / reference
}

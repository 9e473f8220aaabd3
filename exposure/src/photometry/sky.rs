//! Night sky surface brightness model
//!
//! The sky spectrum is the sum of three components, each in photons
//! s⁻¹ cm⁻² Å⁻¹ arcsec⁻²:
//!
//! - **Dark sky**: airglow and unresolved background from a broadband
//!   UBVRI table at zenith, scaled by airmass (longer emitting path) and by
//!   the 11 year solar activity cycle.
//! - **Zodiacal light**: Leinert table at the target's solar elongation and
//!   ecliptic latitude, shaped like sunlight.
//! - **Moonlight**: Krisciunas & Schaefer (1991, PASP 103, 1033) scattering
//!   model, evaluated with the extinction coefficient of every wavelength so
//!   the blue excess of Rayleigh scattering comes out naturally.
//!
//! Extinction of the sky light itself is left to the throughput chain.

use std::f64::consts::PI;

use once_cell::sync::Lazy;

use super::extinction::{extinction_coefficient, v_band_extinction};
use super::grid::SpectralGrid;
use super::spectrum::{ab_mag_to_photon_flux, V_REFERENCE_ANGSTROM};
use super::zodical::{solar_photon_shape, ZodicalLight};
use crate::algo::interp;
use crate::conditions::ObservingConditions;
use crate::error::ExposureError;

/// Dark-site zenith sky without zodiacal light, format: (wavelength_angstrom, mag/arcsec²)
const DARK_SKY_DATA: [(f64, f64); 5] = [
    (3600.0, 22.8),
    (4400.0, 23.2),
    (5500.0, 22.4),
    (6400.0, 21.3),
    (7900.0, 20.1),
];

/// Epoch of the solar activity maximum used as cycle phase reference
const SOLAR_MAXIMUM_EPOCH: f64 = 2001.9;

/// Length of the solar activity cycle in years
const SOLAR_CYCLE_YEARS: f64 = 11.0;

/// Peak fractional airglow variation over the solar cycle
const SOLAR_CYCLE_AMPLITUDE: f64 = 0.25;

static DARK_SKY_COLUMNS: Lazy<(Vec<f64>, Vec<f64>)> =
    Lazy::new(|| DARK_SKY_DATA.iter().copied().unzip());

/// Zenith dark-sky surface brightness in mag/arcsec², held flat past the
/// ends of the table
pub fn dark_sky_magnitude(wavelength_angstrom: f64) -> f64 {
    let (xs, ys) = &*DARK_SKY_COLUMNS;
    let last = xs.len() - 1;
    let x = wavelength_angstrom.clamp(xs[0], xs[last]);
    interp(x, xs, ys).unwrap_or(ys[last])
}

/// Airglow multiplier for the phase of the solar cycle at `epoch`
pub fn solar_cycle_factor(epoch: f64) -> f64 {
    1.0 + SOLAR_CYCLE_AMPLITUDE
        * (2.0 * PI * (epoch - SOLAR_MAXIMUM_EPOCH) / SOLAR_CYCLE_YEARS).cos()
}

/// Airmass of a scattering path at zenith distance `z_deg`
///
/// Krisciunas & Schaefer eq. 3, which stays finite at the horizon.
fn ks_airmass(z_deg: f64) -> f64 {
    let sin_z = z_deg.to_radians().sin();
    (1.0 - 0.96 * sin_z * sin_z).powf(-0.5)
}

/// Moonlight surface brightness in nanoLamberts for extinction `k`
///
/// Zero when the moon is below the horizon.
pub fn lunar_sky_brightness_nl(conditions: &ObservingConditions, k: f64) -> f64 {
    if !conditions.moon_up() {
        return 0.0;
    }

    let alpha = conditions.lunar.lunar_phase_deg;
    let rho = conditions.lunar.lunar_elongation_deg;

    // Lunar V magnitude and illuminance in foot-candles
    let moon_mag = -12.73 + 0.026 * alpha.abs() + 4e-9 * alpha.powi(4);
    let illuminance = 10f64.powf(-0.4 * (moon_mag + 16.57));

    let cos_rho = rho.to_radians().cos();
    let scattering = 10f64.powf(5.36) * (1.06 + cos_rho * cos_rho) + 10f64.powf(6.15 - rho / 40.0);

    let moon_path = ks_airmass(conditions.lunar.moon_zenith_distance_deg);
    let target_path = ks_airmass(conditions.target_zenith_distance_deg());

    scattering
        * illuminance
        * 10f64.powf(-0.4 * k * moon_path)
        * (1.0 - 10f64.powf(-0.4 * k * target_path))
}

/// Convert nanoLamberts to V mag/arcsec² (Krisciunas & Schaefer eq. 1)
pub fn nanolamberts_to_v_mag(brightness_nl: f64) -> f64 {
    (20.7233 - (brightness_nl / 34.08).ln()) / 0.92104
}

/// Individual sky components from the last update
#[derive(Debug, Clone)]
pub struct SkyComponents {
    pub dark_sky: SpectralGrid,
    pub zodiacal: SpectralGrid,
    pub moonlight: SpectralGrid,
    pub total: SpectralGrid,
}

/// Derives the sky background spectrum from observing conditions
pub struct SkySpectrumModel {
    template: SpectralGrid,
    zodical: ZodicalLight,
    components: Option<SkyComponents>,
}

impl SkySpectrumModel {
    /// Model producing grids on the sampling of `template`
    pub fn new(template: &SpectralGrid) -> Self {
        Self {
            template: template.filled_like(0.0),
            zodical: ZodicalLight::new(),
            components: None,
        }
    }

    /// Model on the standard pipeline grid
    pub fn pipeline() -> Self {
        Self::new(&SpectralGrid::pipeline(0.0))
    }

    /// Recompute the sky for `conditions`
    ///
    /// # Errors
    /// `InvalidConfiguration` for out-of-range conditions or a pointing
    /// inside the solar exclusion zone. The previous sky is discarded
    /// either way.
    pub fn update(
        &mut self,
        conditions: &ObservingConditions,
    ) -> Result<&SpectralGrid, ExposureError> {
        self.components = None;
        conditions.validate()?;

        let dark_sky = self.dark_sky_grid(conditions)?;
        let zodiacal = self.zodiacal_grid(conditions)?;
        let moonlight = self.moonlight_grid(conditions)?;

        let mut total = dark_sky.clone();
        total.add(&zodiacal)?;
        total.add(&moonlight)?;

        log::debug!(
            "Sky at {} Å: dark {:.3e}, zodiacal {:.3e}, moon {:.3e} photons/s/cm²/Å/arcsec²",
            V_REFERENCE_ANGSTROM,
            dark_sky.interp(V_REFERENCE_ANGSTROM).unwrap_or(f64::NAN),
            zodiacal.interp(V_REFERENCE_ANGSTROM).unwrap_or(f64::NAN),
            moonlight.interp(V_REFERENCE_ANGSTROM).unwrap_or(f64::NAN),
        );

        let components = self.components.insert(SkyComponents {
            dark_sky,
            zodiacal,
            moonlight,
            total,
        });
        Ok(&components.total)
    }

    /// Total sky from the last successful update
    pub fn grid(&self) -> Option<&SpectralGrid> {
        self.components.as_ref().map(|c| &c.total)
    }

    pub fn components(&self) -> Option<&SkyComponents> {
        self.components.as_ref()
    }

    pub fn dark_sky(&self) -> Option<&SpectralGrid> {
        self.components.as_ref().map(|c| &c.dark_sky)
    }

    pub fn zodiacal(&self) -> Option<&SpectralGrid> {
        self.components.as_ref().map(|c| &c.zodiacal)
    }

    pub fn moonlight(&self) -> Option<&SpectralGrid> {
        self.components.as_ref().map(|c| &c.moonlight)
    }

    fn dark_sky_grid(&self, conditions: &ObservingConditions) -> Result<SpectralGrid, ExposureError> {
        let scale = conditions.telescope.airmass * solar_cycle_factor(conditions.solar.epoch);
        Ok(SpectralGrid::from_fn(
            self.template.x0(),
            self.template.dx(),
            self.template.len(),
            |x| scale * ab_mag_to_photon_flux(dark_sky_magnitude(x), x),
        )?)
    }

    fn zodiacal_grid(&self, conditions: &ObservingConditions) -> Result<SpectralGrid, ExposureError> {
        let elongation = conditions.solar.solar_elongation_deg;
        let latitude = conditions.solar.ecliptic_latitude_deg;
        let v_mag = self
            .zodical
            .get_brightness(elongation, latitude)
            .map_err(|e| ExposureError::InvalidConfiguration(e.to_string()))?;

        let v_flux = ab_mag_to_photon_flux(v_mag, V_REFERENCE_ANGSTROM);
        Ok(SpectralGrid::from_fn(
            self.template.x0(),
            self.template.dx(),
            self.template.len(),
            |x| v_flux * solar_photon_shape(x),
        )?)
    }

    fn moonlight_grid(&self, conditions: &ObservingConditions) -> Result<SpectralGrid, ExposureError> {
        let reference_nl = lunar_sky_brightness_nl(conditions, v_band_extinction());
        if reference_nl <= 0.0 {
            return Ok(self.template.filled_like(0.0));
        }

        let v_flux = ab_mag_to_photon_flux(nanolamberts_to_v_mag(reference_nl), V_REFERENCE_ANGSTROM);
        Ok(SpectralGrid::from_fn(
            self.template.x0(),
            self.template.dx(),
            self.template.len(),
            |x| {
                let relative =
                    lunar_sky_brightness_nl(conditions, extinction_coefficient(x)) / reference_nl;
                v_flux * solar_photon_shape(x) * relative
            },
        )?)
    }
}

//! Source spectra and photon-flux conversions
//!
//! Every spectrum in the exposure pipeline is expressed as a photon flux
//! density in photons s⁻¹ cm⁻² Å⁻¹ (per arcsec² for surface brightness).
//! Conversions from magnitudes go through the AB system:
//!
//! ```text
//! F_ν = 3631 Jy × 10^(-0.4 m)
//! N_λ = F_ν / (h λ)            λ in Angstrom, N_λ per Angstrom
//! ```
//!
//! A [`TargetSpectrum`] is a named list of components sampled on a common
//! [`SpectralGrid`]; the exposure engine only ever sees their sum.

use super::grid::{GridError, SpectralGrid};
use crate::error::ExposureError;

/// Constants in CGS units
pub struct CGS {}

impl CGS {
    /// AB magnitude system zero-point flux density
    /// Units: 3631e-23 erg s⁻¹ cm⁻² Hz⁻¹
    pub const AB_ZERO_POINT_FLUX_DENSITY: f64 = 3631e-23;

    /// Planck's constant
    /// Units: 6.62607015e-27 erg⋅s
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-27;

    /// Speed of light in vacuum
    /// Units: 2.99792458e10 cm/s
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

    /// Boltzmann constant
    /// Units: 1.380649e-16 erg/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-16;
}

/// Centimeters per Angstrom
pub const CM_PER_ANGSTROM: f64 = 1e-8;

/// Wavelength where V-band normalisations are pinned (Angstrom)
pub const V_REFERENCE_ANGSTROM: f64 = 5500.0;

/// Energy of one photon at `wavelength_angstrom`, in erg
pub fn photon_energy_erg(wavelength_angstrom: f64) -> f64 {
    CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT / (wavelength_angstrom * CM_PER_ANGSTROM)
}

/// Photon flux density (photons s⁻¹ cm⁻² Å⁻¹) of an AB magnitude source
pub fn ab_mag_to_photon_flux(ab_mag: f64, wavelength_angstrom: f64) -> f64 {
    let f_nu = CGS::AB_ZERO_POINT_FLUX_DENSITY * 10f64.powf(-0.4 * ab_mag);
    f_nu / (CGS::PLANCK_CONSTANT * wavelength_angstrom)
}

/// Inverse of [`ab_mag_to_photon_flux`]
pub fn photon_flux_to_ab_mag(photon_flux: f64, wavelength_angstrom: f64) -> f64 {
    let f_nu = photon_flux * CGS::PLANCK_CONSTANT * wavelength_angstrom;
    -2.5 * (f_nu / CGS::AB_ZERO_POINT_FLUX_DENSITY).log10()
}

/// A source of photons as a function of wavelength
///
/// Units: photons s⁻¹ cm⁻² Å⁻¹, wavelengths in Angstrom.
pub trait Spectrum: Send + Sync {
    /// Photon flux density at `wavelength_angstrom`, zero where undefined
    fn photon_flux(&self, wavelength_angstrom: f64) -> f64;

    /// Sample onto the lattice of `template`
    fn to_grid(&self, template: &SpectralGrid) -> Result<SpectralGrid, GridError> {
        SpectralGrid::from_fn(template.x0(), template.dx(), template.len(), |x| {
            self.photon_flux(x)
        })
    }
}

/// Constant spectral flux density in frequency (flat in AB magnitude)
#[derive(Debug, Clone)]
pub struct FlatSpectrum {
    /// Spectral flux density in erg s⁻¹ cm⁻² Hz⁻¹
    spectral_flux_density: f64,
}

impl FlatSpectrum {
    /// Flat source of the given AB magnitude
    pub fn from_ab_mag(ab_mag: f64) -> Self {
        Self {
            spectral_flux_density: CGS::AB_ZERO_POINT_FLUX_DENSITY * 10f64.powf(-0.4 * ab_mag),
        }
    }
}

impl Spectrum for FlatSpectrum {
    fn photon_flux(&self, wavelength_angstrom: f64) -> f64 {
        if wavelength_angstrom <= 0.0 {
            return 0.0;
        }
        self.spectral_flux_density / (CGS::PLANCK_CONSTANT * wavelength_angstrom)
    }
}

/// Thermal source normalised to a V magnitude at 5500 Angstrom
#[derive(Debug, Clone)]
pub struct BlackbodySpectrum {
    temperature_k: f64,
    scale: f64,
}

impl BlackbodySpectrum {
    /// Blackbody at `temperature_k` whose photon flux at
    /// [`V_REFERENCE_ANGSTROM`] matches an AB source of `v_mag`
    pub fn new(temperature_k: f64, v_mag: f64) -> Result<Self, ExposureError> {
        if !(temperature_k.is_finite() && temperature_k > 0.0) {
            return Err(ExposureError::InvalidValue(format!(
                "blackbody temperature must be positive, got {temperature_k}"
            )));
        }

        let shape = planck_photon_shape(temperature_k, V_REFERENCE_ANGSTROM);
        let scale = ab_mag_to_photon_flux(v_mag, V_REFERENCE_ANGSTROM) / shape;
        Ok(Self {
            temperature_k,
            scale,
        })
    }

    pub fn temperature_k(&self) -> f64 {
        self.temperature_k
    }
}

/// Unnormalised photon-count Planck curve, λ⁻⁴ / (exp(hc/λkT) - 1)
fn planck_photon_shape(temperature_k: f64, wavelength_angstrom: f64) -> f64 {
    let lambda_cm = wavelength_angstrom * CM_PER_ANGSTROM;
    let exponent =
        CGS::PLANCK_CONSTANT * CGS::SPEED_OF_LIGHT / (lambda_cm * CGS::BOLTZMANN_CONSTANT * temperature_k);
    // Scale λ to microns so the power stays representable
    let lambda_um = wavelength_angstrom * 1e-4;
    1.0 / (lambda_um.powi(4) * exponent.exp_m1())
}

impl Spectrum for BlackbodySpectrum {
    fn photon_flux(&self, wavelength_angstrom: f64) -> f64 {
        if wavelength_angstrom <= 0.0 {
            return 0.0;
        }
        self.scale * planck_photon_shape(self.temperature_k, wavelength_angstrom)
    }
}

/// Tabulated spectrum already expressed as photon flux density
#[derive(Debug, Clone)]
pub struct GridSpectrum {
    grid: SpectralGrid,
}

impl GridSpectrum {
    pub fn new(grid: SpectralGrid) -> Self {
        Self { grid }
    }
}

impl Spectrum for GridSpectrum {
    fn photon_flux(&self, wavelength_angstrom: f64) -> f64 {
        self.grid.interp(wavelength_angstrom).unwrap_or(0.0)
    }
}

/// Named spectral components of an observed target
///
/// All components are sampled on the template grid passed to
/// [`TargetSpectrum::new`].
#[derive(Debug, Clone)]
pub struct TargetSpectrum {
    template: SpectralGrid,
    components: Vec<(String, SpectralGrid)>,
}

impl TargetSpectrum {
    /// Empty target on the sampling of `template`
    pub fn new(template: &SpectralGrid) -> Self {
        Self {
            template: template.clone(),
            components: Vec::new(),
        }
    }

    /// Sample `spectrum` onto the target grid and add it as a component
    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        spectrum: &dyn Spectrum,
    ) -> Result<(), ExposureError> {
        let grid = spectrum.to_grid(&self.template)?;
        self.components.push((name.into(), grid));
        Ok(())
    }

    /// Add an already sampled component, regridding it when needed
    pub fn add_grid(
        &mut self,
        name: impl Into<String>,
        grid: SpectralGrid,
    ) -> Result<(), ExposureError> {
        let name = name.into();
        let grid = if grid.shares_sampling(&self.template) && grid.len() == self.template.len() {
            grid
        } else {
            log::debug!("Regridding target component {name} onto the target sampling");
            GridSpectrum::new(grid).to_grid(&self.template)?
        };
        self.components.push((name, grid));
        Ok(())
    }

    /// Number of contributing components
    pub fn number_of_spectra(&self) -> usize {
        self.components.len()
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|(name, _)| name.as_str())
    }

    /// Sum of all components
    ///
    /// # Errors
    /// `ExposureError::InvalidValue` when the target has no components.
    pub fn combined(&self) -> Result<SpectralGrid, ExposureError> {
        let mut components = self.components.iter();
        let Some((_, first)) = components.next() else {
            return Err(ExposureError::InvalidValue(
                "target spectrum has no components".to_string(),
            ));
        };

        let mut total = first.clone();
        for (_, grid) in components {
            total.add(grid)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_mag_photon_flux() {
        // ~1000 photons/s/cm²/Å at V for a zeroth magnitude AB source
        let flux = ab_mag_to_photon_flux(0.0, 5500.0);
        assert_relative_eq!(flux, 996.3, max_relative = 1e-3);
    }

    #[test]
    fn test_mag_flux_inverse() {
        for mag in [-1.0, 0.0, 12.5, 22.0] {
            let flux = ab_mag_to_photon_flux(mag, 6400.0);
            assert_relative_eq!(photon_flux_to_ab_mag(flux, 6400.0), mag, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_photon_energy() {
        // hc/λ at 5000 Å ≈ 3.97e-12 erg
        assert_relative_eq!(photon_energy_erg(5000.0), 3.9728e-12, max_relative = 1e-4);
    }

    #[test]
    fn test_flat_spectrum_scales_as_inverse_wavelength() {
        let flat = FlatSpectrum::from_ab_mag(10.0);
        let ratio = flat.photon_flux(4000.0) / flat.photon_flux(8000.0);
        assert_relative_eq!(ratio, 2.0, epsilon = 1e-12);
        assert_eq!(flat.photon_flux(-1.0), 0.0);
    }

    #[test]
    fn test_blackbody_normalisation() {
        let bb = BlackbodySpectrum::new(5800.0, 15.0).unwrap();
        assert_relative_eq!(
            bb.photon_flux(V_REFERENCE_ANGSTROM),
            ab_mag_to_photon_flux(15.0, V_REFERENCE_ANGSTROM),
            max_relative = 1e-12
        );

        // Hot stars are bluer than cool ones
        let hot = BlackbodySpectrum::new(20000.0, 15.0).unwrap();
        let cool = BlackbodySpectrum::new(3500.0, 15.0).unwrap();
        assert!(hot.photon_flux(4000.0) > cool.photon_flux(4000.0));
        assert!(hot.photon_flux(9000.0) < cool.photon_flux(9000.0));

        assert!(BlackbodySpectrum::new(0.0, 15.0).is_err());
    }

    #[test]
    fn test_empty_target_is_invalid() {
        let target = TargetSpectrum::new(&SpectralGrid::pipeline(0.0));
        assert_eq!(target.number_of_spectra(), 0);
        assert!(matches!(
            target.combined(),
            Err(ExposureError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_components_sum() {
        let template = SpectralGrid::constant(5000.0, 1.0, 10, 0.0).unwrap();
        let mut target = TargetSpectrum::new(&template);
        target
            .add_grid("star", SpectralGrid::constant(5000.0, 1.0, 10, 2.0).unwrap())
            .unwrap();
        target
            .add_grid("galaxy", SpectralGrid::constant(5000.0, 1.0, 10, 0.5).unwrap())
            .unwrap();

        assert_eq!(target.number_of_spectra(), 2);
        assert_eq!(target.component_names().collect::<Vec<_>>(), ["star", "galaxy"]);

        let combined = target.combined().unwrap();
        assert!(combined.values().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn test_component_regridded_to_template() {
        let template = SpectralGrid::constant(5000.0, 1.0, 11, 0.0).unwrap();
        let mut target = TargetSpectrum::new(&template);
        let coarse = SpectralGrid::from_fn(4990.0, 5.0, 10, |x| x).unwrap();
        target.add_grid("ramp", coarse).unwrap();

        let combined = target.combined().unwrap();
        assert_eq!(combined.len(), 11);
        assert_relative_eq!(combined.values()[3], 5003.0, epsilon = 1e-9);
    }
}

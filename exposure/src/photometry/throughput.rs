//! Multiplicative throughput chain
//!
//! A [`ThroughputFilter`] starts at unit transmission and is multiplied by
//! each optical or atmospheric stage in turn. Stages sampled differently
//! from the running filter are regridded onto it first, so a mismatch is
//! never multiplied sample-by-sample.
//!
//! # Examples
//! ```rust
//! use exposure::photometry::grid::SpectralGrid;
//! use exposure::photometry::throughput::ThroughputBuilder;
//!
//! let throughput = ThroughputBuilder::new(&SpectralGrid::pipeline(0.0))
//!     .atmosphere(1.2).unwrap()
//!     .mirrors(2).unwrap()
//!     .filter("V").unwrap()
//!     .detector_qe("back-illuminated").unwrap()
//!     .build();
//! assert!(throughput.grid().ymax() < 1.0);
//! ```

use super::grid::SpectralGrid;
use super::{extinction, filters, quantum_efficiency};
use crate::error::ExposureError;

/// Slack allowed above 1.0 for transmission values from regridding noise
const TRANSMISSION_TOLERANCE: f64 = 1e-9;

/// Transmitted fraction as a function of wavelength, values in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputFilter {
    grid: SpectralGrid,
}

impl ThroughputFilter {
    /// Unit transmission on the sampling of `template`
    pub fn unit(template: &SpectralGrid) -> Self {
        Self {
            grid: template.filled_like(1.0),
        }
    }

    /// Wrap an existing transmission grid
    ///
    /// # Errors
    /// `InvalidValue` if any sample lies outside [0, 1].
    pub fn from_grid(grid: SpectralGrid) -> Result<Self, ExposureError> {
        check_transmission("transmission", &grid)?;
        Ok(Self { grid })
    }

    /// Multiply by a stage transmission curve
    ///
    /// The stage must cover the whole wavelength domain of the filter.
    pub fn apply(&mut self, name: &str, stage: &SpectralGrid) -> Result<(), ExposureError> {
        check_transmission(name, stage)?;

        let slack = 1e-9 * self.grid.dx();
        if stage.x0() > self.grid.x0() + slack || stage.x_max() < self.grid.x_max() - slack {
            return Err(ExposureError::InvalidConfiguration(format!(
                "{name} covers [{}, {}] Å but the throughput needs [{}, {}] Å",
                stage.x0(),
                stage.x_max(),
                self.grid.x0(),
                self.grid.x_max()
            )));
        }

        if self.grid.shares_sampling(stage) {
            self.grid.scale_by(stage)?;
        } else {
            log::warn!(
                "{name} sampled at {} Å from {} Å, regridding onto {} Å from {} Å",
                stage.dx(),
                stage.x0(),
                self.grid.dx(),
                self.grid.x0()
            );
            let regridded = stage.regrid_like(&self.grid)?;
            self.grid.scale_by(&regridded)?;
        }
        Ok(())
    }

    /// Multiply by a wavelength-independent factor (vignetting, obscuration)
    pub fn apply_scalar(&mut self, name: &str, factor: f64) -> Result<(), ExposureError> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(ExposureError::InvalidValue(format!(
                "{name} factor must be within [0, 1], got {factor}"
            )));
        }
        self.grid.scale(factor)?;
        Ok(())
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn into_grid(self) -> SpectralGrid {
        self.grid
    }

    /// Transmission integrated over wavelength (Angstrom of equivalent width)
    pub fn equivalent_width(&self) -> f64 {
        self.grid.integrate()
    }
}

fn check_transmission(name: &str, grid: &SpectralGrid) -> Result<(), ExposureError> {
    let (min, max) = (grid.ymin(), grid.ymax());
    if min < 0.0 || max > 1.0 + TRANSMISSION_TOLERANCE {
        return Err(ExposureError::InvalidValue(format!(
            "{name} transmission must be within [0, 1], got range [{min}, {max}]"
        )));
    }
    Ok(())
}

/// Composes the standard ground-based throughput chain
///
/// Each step consumes and returns the builder so a chain can bail out with
/// `?` on the first bad stage.
#[derive(Debug, Clone)]
pub struct ThroughputBuilder {
    filter: ThroughputFilter,
}

impl ThroughputBuilder {
    pub fn new(template: &SpectralGrid) -> Self {
        Self {
            filter: ThroughputFilter::unit(template),
        }
    }

    /// Atmospheric extinction at `airmass`
    pub fn atmosphere(mut self, airmass: f64) -> Result<Self, ExposureError> {
        let stage = extinction::atmospheric_transmission(self.filter.grid(), airmass)?;
        self.filter.apply("atmosphere", &stage)?;
        Ok(self)
    }

    /// `reflections` aluminium mirror surfaces
    pub fn mirrors(mut self, reflections: u32) -> Result<Self, ExposureError> {
        let stage = extinction::mirror_reflectivity(self.filter.grid(), reflections)?;
        self.filter.apply("mirrors", &stage)?;
        Ok(self)
    }

    /// Vignetting or central obstruction loss
    pub fn vignetting(mut self, factor: f64) -> Result<Self, ExposureError> {
        self.filter.apply_scalar("vignetting", factor)?;
        Ok(self)
    }

    /// Optical filter from the catalog
    pub fn filter(mut self, key: &str) -> Result<Self, ExposureError> {
        let stage = filters::lookup(key)?.to_grid(self.filter.grid())?;
        self.filter.apply(&format!("filter {key}"), &stage)?;
        Ok(self)
    }

    /// Detector quantum efficiency for a sensor material
    pub fn detector_qe(mut self, material: &str) -> Result<Self, ExposureError> {
        let stage = quantum_efficiency::lookup(material)?.to_grid(self.filter.grid())?;
        self.filter.apply(&format!("QE {material}"), &stage)?;
        Ok(self)
    }

    /// Arbitrary extra stage
    pub fn stage(mut self, name: &str, stage: &SpectralGrid) -> Result<Self, ExposureError> {
        self.filter.apply(name, stage)?;
        Ok(self)
    }

    pub fn build(self) -> ThroughputFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_filter_leaves_spectrum_unchanged() {
        let spectrum = SpectralGrid::from_fn(4000.0, 2.0, 500, |x| (x / 1000.0).sin() + 2.0).unwrap();
        let unit = ThroughputFilter::unit(&spectrum);
        assert!(unit.grid().values().iter().all(|&v| v == 1.0));

        let mut product = spectrum.clone();
        product.scale_by(unit.grid()).unwrap();
        for (a, b) in product.values().iter().zip(spectrum.values()) {
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_composition_commutes() {
        let template = SpectralGrid::pipeline(0.0);
        let a = ThroughputBuilder::new(&template)
            .atmosphere(1.5)
            .unwrap()
            .filter("B")
            .unwrap()
            .build();
        let b = ThroughputBuilder::new(&template)
            .filter("B")
            .unwrap()
            .atmosphere(1.5)
            .unwrap()
            .build();

        for (x, y) in a.grid().values().iter().zip(b.grid().values()) {
            assert_relative_eq!(x, y, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_mismatched_stage_is_regridded() {
        let template = SpectralGrid::constant(5000.0, 1.0, 11, 0.0).unwrap();
        let coarse = SpectralGrid::from_fn(4990.0, 5.0, 10, |x| (x - 4990.0) / 100.0).unwrap();

        let mut filter = ThroughputFilter::unit(&template);
        filter.apply("ramp", &coarse).unwrap();

        assert_eq!(filter.grid().len(), 11);
        assert_relative_eq!(filter.grid().values()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(filter.grid().values()[3], 0.13, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_stage_rejected() {
        let template = SpectralGrid::constant(5000.0, 1.0, 11, 0.0).unwrap();
        let short = SpectralGrid::constant(5000.0, 1.0, 5, 0.5).unwrap();

        let mut filter = ThroughputFilter::unit(&template);
        assert!(matches!(
            filter.apply("short", &short),
            Err(ExposureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let template = SpectralGrid::constant(5000.0, 1.0, 3, 0.0).unwrap();
        let gain = SpectralGrid::constant(5000.0, 1.0, 3, 1.5).unwrap();

        let mut filter = ThroughputFilter::unit(&template);
        assert!(matches!(
            filter.apply("gain", &gain),
            Err(ExposureError::InvalidValue(_))
        ));
        assert!(filter.apply_scalar("vignetting", -0.1).is_err());
        assert!(ThroughputFilter::from_grid(gain).is_err());
    }

    #[test]
    fn test_full_chain() {
        let template = SpectralGrid::pipeline(0.0);
        let throughput = ThroughputBuilder::new(&template)
            .atmosphere(1.0)
            .unwrap()
            .mirrors(2)
            .unwrap()
            .vignetting(0.9)
            .unwrap()
            .filter("V")
            .unwrap()
            .detector_qe("back-illuminated")
            .unwrap()
            .build();

        let peak = throughput.grid().ymax();
        assert!(peak > 0.5 && peak < 0.9, "peak throughput {peak}");
        assert_eq!(throughput.grid().interp(4000.0).unwrap(), 0.0);
        assert!(throughput.equivalent_width() > 0.0);
    }

    #[test]
    fn test_unknown_keys_fail() {
        let template = SpectralGrid::pipeline(0.0);
        assert!(matches!(
            ThroughputBuilder::new(&template).filter("Q"),
            Err(ExposureError::Catalog(_))
        ));
        assert!(matches!(
            ThroughputBuilder::new(&template).detector_qe("graphene"),
            Err(ExposureError::Catalog(_))
        ));
    }
}

//! Per-aperture photometry results

use crate::error::ExposureError;

/// Detector signal budget of one aperture, all values in electrons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApertureMeasurement {
    /// Sky signal in one binned pixel during one frame
    ///
    /// Per pixel rather than summed over the aperture, so it can be added to
    /// `peak_level` for the saturation check. The aperture total is
    /// [`ApertureMeasurement::aperture_sky_level`].
    pub sky_level: f64,
    /// Noise of one binned pixel during one frame: sky, dark and read noise
    pub sky_noise: f64,
    /// Object signal in the brightest binned pixel during one frame
    pub peak_level: f64,
    /// Object signal summed over all frames
    pub total_flux: f64,
    /// Object signal inside the aperture summed over all frames
    pub aperture_flux: f64,
    /// Signal-to-noise ratio of `aperture_flux`
    pub sn: f64,
    /// Binned pixels inside the aperture
    pub n_pixels: f64,
}

impl ApertureMeasurement {
    /// Sky signal summed over the aperture's pixels during one frame
    pub fn aperture_sky_level(&self) -> f64 {
        self.sky_level * self.n_pixels
    }
}

/// Result for one aperture of an exposure evaluation
///
/// A measurement that could not be computed (NaN/Inf, no transmitted light)
/// is stored as `Err(ExposureError::NumericUndefined)` so it cannot be
/// mistaken for a valid zero.
#[derive(Debug)]
pub struct PhotometryExposureResult {
    /// Aperture radius in units of the seeing FWHM
    pub aperture: f64,
    pub measurement: Result<ApertureMeasurement, ExposureError>,
}

impl PhotometryExposureResult {
    pub fn is_defined(&self) -> bool {
        self.measurement.is_ok()
    }

    /// The measurement, if it could be computed
    pub fn measurement(&self) -> Option<&ApertureMeasurement> {
        self.measurement.as_ref().ok()
    }

    pub fn sn(&self) -> Option<f64> {
        self.measurement().map(|m| m.sn)
    }

    /// Whether the brightest pixel (object plus sky) reaches `saturation_level_e`
    ///
    /// Undefined measurements are never reported as saturated.
    pub fn is_saturated(&self, saturation_level_e: f64) -> bool {
        self.measurement()
            .is_some_and(|m| m.peak_level + m.sky_level >= saturation_level_e)
    }
}

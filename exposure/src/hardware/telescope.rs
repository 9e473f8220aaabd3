//! Ground-based telescope geometry
//!
//! Only what the exposure calculation needs: light-collecting area after
//! the central obstruction, focal length for the plate scale and the number
//! of aluminium reflections in the light path.

use std::f64::consts::PI;

use once_cell::sync::Lazy;

use crate::error::ExposureError;
use crate::units::{angular_size_arcsec, Length, LengthExt};

#[derive(Debug, Clone)]
pub struct TelescopeConfig {
    /// Telescope model name or identifier
    pub name: String,
    /// Primary mirror clear aperture
    pub aperture: Length,
    /// Effective focal length at the detector
    pub focal_length: Length,
    /// Secondary obstruction as a fraction of the aperture diameter
    pub central_obstruction: f64,
    /// Aluminium surfaces between sky and detector
    pub mirror_count: u32,
}

impl TelescopeConfig {
    pub fn new(
        name: impl Into<String>,
        aperture: Length,
        focal_length: Length,
        central_obstruction: f64,
        mirror_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            aperture,
            focal_length,
            central_obstruction,
            mirror_count,
        }
    }

    /// Focal ratio
    pub fn f_number(&self) -> f64 {
        self.focal_length.as_meters() / self.aperture.as_meters()
    }

    /// Unobstructed collecting area in cm²
    pub fn collecting_area_cm2(&self) -> f64 {
        let radius_cm = self.aperture.as_centimeters() / 2.0;
        PI * radius_cm * radius_cm * (1.0 - self.central_obstruction.powi(2))
    }

    /// Plate scale in arcseconds per millimeter
    pub fn plate_scale_arcsec_per_mm(&self) -> f64 {
        angular_size_arcsec(Length::from_millimeters(1.0), self.focal_length)
    }

    /// Angular size of one detector pixel in arcseconds
    pub fn pixel_scale_arcsec(&self, pixel_size: Length) -> f64 {
        angular_size_arcsec(pixel_size, self.focal_length)
    }

    pub fn validate(&self) -> Result<(), ExposureError> {
        let aperture_m = self.aperture.as_meters();
        let focal_m = self.focal_length.as_meters();
        if !(aperture_m > 0.0 && focal_m > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "telescope {} needs positive aperture and focal length",
                self.name
            )));
        }
        if !(0.0..1.0).contains(&self.central_obstruction) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "telescope {} central obstruction must be within [0, 1), got {}",
                self.name, self.central_obstruction
            )));
        }
        Ok(())
    }
}

/// Standard telescope models
pub mod models {
    use super::*;

    /// 1m Cassegrain, f/8
    pub static CASSEGRAIN_1M: Lazy<TelescopeConfig> = Lazy::new(|| {
        TelescopeConfig::new(
            "1m-cassegrain",
            Length::from_meters(1.0),
            Length::from_meters(8.0),
            0.3,
            2,
        )
    });

    /// 2.5m Ritchey-Chretien at the f/11 Cassegrain focus
    pub static RC_2M5: Lazy<TelescopeConfig> = Lazy::new(|| {
        TelescopeConfig::new(
            "2.5m-rc",
            Length::from_meters(2.5),
            Length::from_meters(27.5),
            0.35,
            2,
        )
    });

    /// 4m prime focus with corrector
    pub static PRIME_4M: Lazy<TelescopeConfig> = Lazy::new(|| {
        TelescopeConfig::new(
            "4m-prime",
            Length::from_meters(4.0),
            Length::from_meters(11.7),
            0.4,
            1,
        )
    });

    /// All models, in order of aperture
    pub fn all() -> [&'static TelescopeConfig; 3] {
        [&*CASSEGRAIN_1M, &*RC_2M5, &*PRIME_4M]
    }
}

/// Find a standard telescope by name
pub fn lookup(name: &str) -> Result<&'static TelescopeConfig, ExposureError> {
    models::all()
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| {
            let known: Vec<&str> = models::all().iter().map(|t| t.name.as_str()).collect();
            ExposureError::Catalog(format!("telescope {name:?} (known: {})", known.join(", ")))
        })
}

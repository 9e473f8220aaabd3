//! CCD detector characteristics
//!
//! A detector offers one or more readout modes, each with its own read
//! noise; an exposure configuration picks one by key.

use once_cell::sync::Lazy;

use super::dark_current::DarkCurrentModel;
use crate::error::ExposureError;
use crate::photometry::quantum_efficiency;
use crate::units::{Length, LengthExt};

/// Readout mode of a detector
#[derive(Debug, Clone, PartialEq)]
pub struct ReadMode {
    /// Key used by exposure configurations, e.g. `"slow"`
    pub key: String,
    /// Read noise in electrons RMS per (binned) pixel read
    pub read_noise_e: f64,
}

impl ReadMode {
    pub fn new(key: impl Into<String>, read_noise_e: f64) -> Self {
        Self {
            key: key.into(),
            read_noise_e,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Name/model of the detector
    pub name: String,
    /// Sensor material key into the quantum efficiency catalog
    pub material: String,
    /// Physical pixel pitch
    pub pixel_size: Length,
    /// Available readout modes
    pub read_modes: Vec<ReadMode>,
    /// Level in electrons above which a pixel is considered saturated
    pub saturation_level_e: f64,
    /// Dark current model
    pub dark_current: DarkCurrentModel,
    /// Operating temperature in degrees Celsius
    pub operating_temp_c: f64,
}

impl DetectorConfig {
    /// Look up a readout mode by key
    ///
    /// # Errors
    /// `ExposureError::Catalog` if the detector has no such mode.
    pub fn read_mode(&self, key: &str) -> Result<&ReadMode, ExposureError> {
        self.read_modes.iter().find(|m| m.key == key).ok_or_else(|| {
            let known: Vec<&str> = self.read_modes.iter().map(|m| m.key.as_str()).collect();
            ExposureError::Catalog(format!(
                "read mode {key:?} on detector {} (known: {})",
                self.name,
                known.join(", ")
            ))
        })
    }

    /// Dark current at the operating temperature in electrons/pixel/second
    pub fn dark_current_e_per_s(&self) -> f64 {
        self.dark_current.at_temperature(self.operating_temp_c)
    }

    pub fn validate(&self) -> Result<(), ExposureError> {
        quantum_efficiency::lookup(&self.material)?;

        if !(self.pixel_size.as_micrometers() > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "detector {} pixel size must be positive",
                self.name
            )));
        }
        if self.read_modes.is_empty() {
            return Err(ExposureError::InvalidConfiguration(format!(
                "detector {} has no read modes",
                self.name
            )));
        }
        if let Some(mode) = self
            .read_modes
            .iter()
            .find(|m| !(m.read_noise_e.is_finite() && m.read_noise_e >= 0.0))
        {
            return Err(ExposureError::InvalidConfiguration(format!(
                "read mode {} has invalid read noise {}",
                mode.key, mode.read_noise_e
            )));
        }
        if !(self.saturation_level_e > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "detector {} saturation level must be positive",
                self.name
            )));
        }
        if !(self.dark_current_e_per_s().is_finite() && self.dark_current_e_per_s() >= 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "detector {} dark current is not a valid rate",
                self.name
            )));
        }
        Ok(())
    }
}

/// Standard detector models
pub mod models {
    use super::*;

    /// 2k x 4k thinned back-illuminated CCD, 15 micron pixels
    pub static BACK_ILLUMINATED_2K4K: Lazy<DetectorConfig> = Lazy::new(|| DetectorConfig {
        name: "bi-2k4k".to_string(),
        material: "back-illuminated".to_string(),
        pixel_size: Length::from_micrometers(15.0),
        read_modes: vec![ReadMode::new("slow", 3.5), ReadMode::new("fast", 7.0)],
        saturation_level_e: 150_000.0,
        dark_current: DarkCurrentModel::new(0.5e-3, -100.0, 7.0),
        operating_temp_c: -110.0,
    });

    /// 4k x 4k deep-depletion CCD, 15 micron pixels, red sensitive
    pub static DEEP_DEPLETION_4K: Lazy<DetectorConfig> = Lazy::new(|| DetectorConfig {
        name: "dd-4k".to_string(),
        material: "deep-depleted".to_string(),
        pixel_size: Length::from_micrometers(15.0),
        read_modes: vec![
            ReadMode::new("slow", 4.0),
            ReadMode::new("normal", 6.0),
            ReadMode::new("fast", 11.0),
        ],
        saturation_level_e: 200_000.0,
        dark_current: DarkCurrentModel::new(2e-3, -100.0, 7.0),
        operating_temp_c: -100.0,
    });

    /// 1k x 1k front-illuminated CCD, 24 micron pixels
    pub static FRONT_ILLUMINATED_1K: Lazy<DetectorConfig> = Lazy::new(|| DetectorConfig {
        name: "fi-1k".to_string(),
        material: "front-illuminated".to_string(),
        pixel_size: Length::from_micrometers(24.0),
        read_modes: vec![ReadMode::new("normal", 8.0)],
        saturation_level_e: 300_000.0,
        dark_current: DarkCurrentModel::new(5e-3, -90.0, 8.0),
        operating_temp_c: -90.0,
    });

    pub fn all() -> [&'static DetectorConfig; 3] {
        [
            &*BACK_ILLUMINATED_2K4K,
            &*DEEP_DEPLETION_4K,
            &*FRONT_ILLUMINATED_1K,
        ]
    }
}

/// Find a standard detector by name
pub fn lookup(name: &str) -> Result<&'static DetectorConfig, ExposureError> {
    models::all()
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| {
            let known: Vec<&str> = models::all().iter().map(|d| d.name.as_str()).collect();
            ExposureError::Catalog(format!("detector {name:?} (known: {})", known.join(", ")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_catalog_is_valid() {
        for detector in models::all() {
            detector.validate().unwrap();
            assert_eq!(lookup(&detector.name).unwrap().name, detector.name);
        }
        assert!(matches!(lookup("cmos"), Err(ExposureError::Catalog(_))));
    }

    #[test]
    fn test_read_mode_lookup() {
        let detector = lookup("dd-4k").unwrap();
        assert_eq!(detector.read_mode("normal").unwrap().read_noise_e, 6.0);

        let err = detector.read_mode("turbo").unwrap_err();
        assert!(matches!(err, ExposureError::Catalog(_)));
        assert!(err.to_string().contains("slow"));
    }

    #[test]
    fn test_dark_current_at_operating_temperature() {
        let detector = lookup("bi-2k4k").unwrap();
        // 10 degrees colder than the reference point
        assert_relative_eq!(
            detector.dark_current_e_per_s(),
            0.5e-3 * 2f64.powf(-10.0 / 7.0),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_invalid_detector() {
        let mut detector = lookup("fi-1k").unwrap().clone();
        detector.material = "unobtainium".to_string();
        assert!(matches!(detector.validate(), Err(ExposureError::Catalog(_))));

        let mut detector = lookup("fi-1k").unwrap().clone();
        detector.read_modes.clear();
        assert!(matches!(
            detector.validate(),
            Err(ExposureError::InvalidConfiguration(_))
        ));
    }
}

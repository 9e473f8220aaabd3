//! Per-exposure detector settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExposureError;

/// Serialize a `Duration` as floating point seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// How one exposure (or a sequence of identical exposures) is taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Integration time of a single frame
    #[serde(rename = "exposure_time_s", with = "duration_secs")]
    pub exposure_time: Duration,
    /// Number of frames that are co-added
    pub repeats: u32,
    /// On-chip binning factor, applied along both axes
    pub binning: u32,
    /// Optical filter key, see [`crate::photometry::filters::FILTER_KEYS`]
    pub filter: String,
    /// Detector readout mode key
    pub read_mode: String,
    /// Sensor material key for the quantum efficiency curve
    pub detector_material: String,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            exposure_time: Duration::from_secs(300),
            repeats: 1,
            binning: 1,
            filter: "V".to_string(),
            read_mode: "slow".to_string(),
            detector_material: "back-illuminated".to_string(),
        }
    }
}

impl ExposureConfig {
    /// Sum of all frame integration times
    pub fn total_integration(&self) -> Duration {
        self.exposure_time * self.repeats
    }

    /// # Errors
    /// `InvalidConfiguration` for a zero exposure time, repeat count or
    /// binning factor.
    pub fn validate(&self) -> Result<(), ExposureError> {
        if self.exposure_time.is_zero() {
            return Err(ExposureError::InvalidConfiguration(
                "exposure time must be positive".to_string(),
            ));
        }
        if self.repeats == 0 {
            return Err(ExposureError::InvalidConfiguration(
                "repeat count must be at least 1".to_string(),
            ));
        }
        if self.binning == 0 {
            return Err(ExposureError::InvalidConfiguration(
                "binning factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ExposureConfig::default();
        config.validate().unwrap();
        assert_eq!(config.total_integration(), Duration::from_secs(300));
    }

    #[test]
    fn test_total_integration() {
        let config = ExposureConfig {
            exposure_time: Duration::from_millis(1500),
            repeats: 4,
            ..Default::default()
        };
        assert_eq!(config.total_integration(), Duration::from_secs(6));
    }

    #[test]
    fn test_rejects_degenerate_settings() {
        let zero_time = ExposureConfig {
            exposure_time: Duration::ZERO,
            ..Default::default()
        };
        let zero_repeats = ExposureConfig {
            repeats: 0,
            ..Default::default()
        };
        let zero_binning = ExposureConfig {
            binning: 0,
            ..Default::default()
        };

        for config in [zero_time, zero_repeats, zero_binning] {
            assert!(matches!(
                config.validate(),
                Err(ExposureError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_json_uses_seconds() {
        let config = ExposureConfig {
            exposure_time: Duration::from_millis(2500),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"exposure_time_s\":2.5"));

        let back: ExposureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_negative_time_fails_to_parse() {
        let json = r#"{"exposure_time_s":-1.0,"repeats":1,"binning":1,
            "filter":"V","read_mode":"slow","detector_material":"back-illuminated"}"#;
        assert!(serde_json::from_str::<ExposureConfig>(json).is_err());
    }
}

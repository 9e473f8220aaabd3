use crate::hardware::{detector, telescope, DetectorConfig, TelescopeConfig};
use crate::scenario::Scenario;
use clap::{Args, ValueEnum};
use std::time::Duration;

/// Parse duration string with units (e.g., "1.5s", "150ms", "2000us", "1h", "30m")
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    // Extract numeric part and unit
    let (num_str, unit) = if let Some(num) = s.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = s.strip_suffix("us") {
        (num, "us")
    } else if let Some(num) = s.strip_suffix('s') {
        (num, "s")
    } else if let Some(num) = s.strip_suffix('h') {
        (num, "h")
    } else if let Some(num) = s.strip_suffix('m') {
        (num, "m")
    } else {
        // Default to seconds if no unit specified
        (s, "s")
    };

    let value: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numeric value: {}", num_str))?;

    if value < 0.0 {
        return Err("Duration cannot be negative".to_string());
    }

    let seconds = match unit {
        "us" => value * 1e-6,
        "ms" => value * 1e-3,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return Err(format!("Unknown time unit: {}", unit)),
    };

    Duration::try_from_secs_f64(seconds).map_err(|e| format!("Invalid duration {s}: {e}"))
}

/// Wrapper for Duration that implements Clone and has a nice Display
#[derive(Debug, Clone, PartialEq)]
pub struct DurationArg(pub Duration);

impl std::str::FromStr for DurationArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(DurationArg)
    }
}

impl std::fmt::Display for DurationArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        let total_ms = duration.as_millis();

        if total_ms >= 1000 && total_ms % 1000 == 0 {
            write!(f, "{}s", total_ms / 1000)
        } else if total_ms >= 1000 {
            write!(f, "{:.3}s", duration.as_secs_f64())
        } else {
            write!(f, "{}ms", total_ms)
        }
    }
}

impl Default for DurationArg {
    fn default() -> Self {
        DurationArg(Duration::from_secs(300))
    }
}

/// Available telescope models for selection
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum TelescopeModel {
    /// 1m f/8 Cassegrain
    #[value(name = "1m-cassegrain")]
    Cassegrain1m,
    /// 2.5m Ritchey-Chretien
    #[value(name = "2.5m-rc")]
    Rc2m5,
    /// 4m prime focus
    #[value(name = "4m-prime")]
    Prime4m,
}

impl TelescopeModel {
    /// Get the corresponding TelescopeConfig for the selected model
    pub fn to_config(self) -> &'static TelescopeConfig {
        match self {
            TelescopeModel::Cassegrain1m => &telescope::models::CASSEGRAIN_1M,
            TelescopeModel::Rc2m5 => &telescope::models::RC_2M5,
            TelescopeModel::Prime4m => &telescope::models::PRIME_4M,
        }
    }
}

/// Available detector models for selection
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum DetectorModel {
    /// 2k x 4k back-illuminated CCD, 15μm pixels - Default
    #[value(name = "bi-2k4k")]
    BackIlluminated2k4k,
    /// 4k x 4k deep-depletion CCD, 15μm pixels
    #[value(name = "dd-4k")]
    DeepDepletion4k,
    /// 1k x 1k front-illuminated CCD, 24μm pixels
    #[value(name = "fi-1k")]
    FrontIlluminated1k,
}

impl DetectorModel {
    /// Get the corresponding DetectorConfig for the selected model
    pub fn to_config(self) -> &'static DetectorConfig {
        match self {
            DetectorModel::BackIlluminated2k4k => &detector::models::BACK_ILLUMINATED_2K4K,
            DetectorModel::DeepDepletion4k => &detector::models::DEEP_DEPLETION_4K,
            DetectorModel::FrontIlluminated1k => &detector::models::FRONT_ILLUMINATED_1K,
        }
    }
}

/// Command line overrides applied on top of a scenario
///
/// Every field is optional so a scenario file keeps its own values unless
/// the user asks otherwise.
#[derive(Args, Debug, Clone, Default)]
pub struct ExposureOverrideArgs {
    /// Exposure time per frame (e.g., "100s", "500ms", "2m")
    #[arg(long)]
    pub exposure: Option<DurationArg>,

    /// Number of co-added frames
    #[arg(long)]
    pub repeats: Option<u32>,

    /// On-chip binning factor
    #[arg(long)]
    pub binning: Option<u32>,

    /// Optical filter (U, B, V, R, I or clear)
    #[arg(long)]
    pub filter: Option<String>,

    /// Detector readout mode
    #[arg(long)]
    pub read_mode: Option<String>,

    /// Telescope model
    #[arg(long)]
    pub telescope: Option<TelescopeModel>,

    /// Detector model; also selects its quantum efficiency curve
    #[arg(long)]
    pub detector: Option<DetectorModel>,

    /// Airmass along the line of sight
    #[arg(long)]
    pub airmass: Option<f64>,

    /// Seeing FWHM at zenith in arcseconds
    #[arg(long)]
    pub seeing: Option<f64>,

    /// Lunar phase angle in degrees (0 full, 180 new)
    #[arg(long)]
    pub moon_phase: Option<f64>,

    /// Moon zenith distance in degrees (above 90 the moon is down)
    #[arg(long)]
    pub moon_zenith: Option<f64>,

    /// Aperture radii in units of the seeing FWHM (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub apertures: Option<Vec<f64>>,
}

impl ExposureOverrideArgs {
    /// Overwrite the scenario fields given on the command line
    pub fn apply(&self, scenario: &mut Scenario) {
        if let Some(exposure) = &self.exposure {
            scenario.exposure.exposure_time = exposure.0;
        }
        if let Some(repeats) = self.repeats {
            scenario.exposure.repeats = repeats;
        }
        if let Some(binning) = self.binning {
            scenario.exposure.binning = binning;
        }
        if let Some(filter) = &self.filter {
            scenario.exposure.filter = filter.clone();
        }
        if let Some(read_mode) = &self.read_mode {
            scenario.exposure.read_mode = read_mode.clone();
        }
        if let Some(model) = self.telescope {
            scenario.telescope = model.to_config().name.clone();
        }
        if let Some(model) = self.detector {
            let config = model.to_config();
            scenario.detector = config.name.clone();
            scenario.exposure.detector_material = config.material.clone();
        }
        if let Some(airmass) = self.airmass {
            scenario.conditions.telescope.airmass = airmass;
        }
        if let Some(seeing) = self.seeing {
            scenario.conditions.telescope.seeing_fwhm_zenith_arcsec = seeing;
        }
        if let Some(phase) = self.moon_phase {
            scenario.conditions.lunar.lunar_phase_deg = phase;
        }
        if let Some(zenith) = self.moon_zenith {
            scenario.conditions.lunar.moon_zenith_distance_deg = zenith;
        }
        if let Some(apertures) = &self.apertures {
            scenario.apertures = apertures.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        overrides: ExposureOverrideArgs,
    }

    #[test]
    fn test_duration_parsing() {
        // Test various duration formats
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::from_secs_f64(1.5)
        );
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("250").unwrap(), Duration::from_secs(250));
        assert_eq!(parse_duration("2.5ms").unwrap(), Duration::from_micros(2500));

        // Test error cases
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("invalid").is_err());
        assert!(parse_duration("NaNs").is_err());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(DurationArg(Duration::from_secs(300)).to_string(), "300s");
        assert_eq!(DurationArg(Duration::from_millis(1500)).to_string(), "1.500s");
        assert_eq!(DurationArg(Duration::from_millis(20)).to_string(), "20ms");
    }

    #[test]
    fn test_models_match_catalog() {
        for model in TelescopeModel::value_variants() {
            let name = model.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(model.to_config().name, name);
        }
        for model in DetectorModel::value_variants() {
            let name = model.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(model.to_config().name, name);
        }
    }

    #[test]
    fn test_overrides_apply_to_scenario() {
        let cli = TestCli::parse_from([
            "test",
            "--exposure",
            "2m",
            "--binning",
            "2",
            "--detector",
            "dd-4k",
            "--airmass",
            "1.5",
            "--apertures",
            "1,2,3",
        ]);

        let mut scenario = Scenario::default();
        let untouched_filter = scenario.exposure.filter.clone();
        cli.overrides.apply(&mut scenario);

        assert_eq!(scenario.exposure.exposure_time, Duration::from_secs(120));
        assert_eq!(scenario.exposure.binning, 2);
        assert_eq!(scenario.exposure.filter, untouched_filter);
        assert_eq!(scenario.detector, "dd-4k");
        assert_eq!(scenario.exposure.detector_material, "deep-depleted");
        assert_eq!(scenario.conditions.telescope.airmass, 1.5);
        assert_eq!(scenario.apertures, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_no_overrides_is_identity() {
        let cli = TestCli::parse_from(["test"]);
        let mut scenario = Scenario::default();
        let before = scenario.clone();
        cli.overrides.apply(&mut scenario);
        assert_eq!(scenario, before);
    }
}

//! Complete exposure scenario stored as JSON
//!
//! A scenario names everything one evaluation needs: observing conditions,
//! exposure settings, telescope and detector from the catalogs, the target
//! spectrum and the apertures to measure. [`Scenario::evaluate`] wires the
//! sky model, throughput chain and engine together.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::conditions::ObservingConditions;
use crate::error::ExposureError;
use crate::exposure::{ExposureConfig, ExposureEngine, PhotometryExposureResult, SeeingProfile};
use crate::hardware::{detector, telescope, Instrument};
use crate::photometry::spectrum::{BlackbodySpectrum, FlatSpectrum};
use crate::photometry::{
    SkySpectrumModel, SpectralGrid, TargetSpectrum, ThroughputBuilder, ThroughputFilter,
};

/// Spectral shape of one target component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetComponent {
    /// Flat in AB magnitude
    Flat { ab_mag: f64 },
    /// Blackbody normalised to a V magnitude
    Blackbody { temperature_k: f64, v_mag: f64 },
    /// Constant photon flux density in photons/s/cm²/Å
    Constant { photon_flux: f64 },
    /// Two-column `wavelength value` file in photons/s/cm²/Å
    Table { path: PathBuf },
}

/// Named component of the target spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetComponentSpec {
    pub name: String,
    pub spectrum: TargetComponent,
}

impl TargetComponentSpec {
    pub fn new(name: impl Into<String>, spectrum: TargetComponent) -> Self {
        Self {
            name: name.into(),
            spectrum,
        }
    }

    fn add_to(&self, target: &mut TargetSpectrum, template: &SpectralGrid) -> Result<(), ExposureError> {
        match &self.spectrum {
            TargetComponent::Flat { ab_mag } => {
                target.add_component(&self.name, &FlatSpectrum::from_ab_mag(*ab_mag))
            }
            TargetComponent::Blackbody {
                temperature_k,
                v_mag,
            } => target.add_component(&self.name, &BlackbodySpectrum::new(*temperature_k, *v_mag)?),
            TargetComponent::Constant { photon_flux } => {
                if !(photon_flux.is_finite() && *photon_flux >= 0.0) {
                    return Err(ExposureError::InvalidValue(format!(
                        "component {} photon flux must be non-negative, got {photon_flux}",
                        self.name
                    )));
                }
                target.add_grid(&self.name, template.filled_like(*photon_flux))
            }
            TargetComponent::Table { path } => {
                let grid = SpectralGrid::read(path)?;
                log::debug!(
                    "Loaded component {} from {} ({} samples)",
                    self.name,
                    path.display(),
                    grid.len()
                );
                target.add_grid(&self.name, grid)
            }
        }
    }
}

/// Everything needed to evaluate one exposure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub conditions: ObservingConditions,
    pub exposure: ExposureConfig,
    /// Telescope catalog name, e.g. `"1m-cassegrain"`
    pub telescope: String,
    /// Detector catalog name, e.g. `"bi-2k4k"`
    pub detector: String,
    #[serde(default)]
    pub profile: SeeingProfile,
    pub target: Vec<TargetComponentSpec>,
    /// Aperture radii in units of the seeing FWHM
    pub apertures: Vec<f64>,
}

impl Default for Scenario {
    /// A V = 20 flat-spectrum point source on the 1m telescope in dark time
    fn default() -> Self {
        Self {
            conditions: ObservingConditions::default(),
            exposure: ExposureConfig::default(),
            telescope: "1m-cassegrain".to_string(),
            detector: "bi-2k4k".to_string(),
            profile: SeeingProfile::default(),
            target: vec![TargetComponentSpec::new(
                "point source",
                TargetComponent::Flat { ab_mag: 20.0 },
            )],
            apertures: vec![0.5, 1.0, 1.5, 2.0, 3.0],
        }
    }
}

/// Spectra and results of an evaluated scenario
#[derive(Debug)]
pub struct ScenarioOutput {
    pub target: TargetSpectrum,
    pub sky: SpectralGrid,
    pub throughput: ThroughputFilter,
    pub instrument: Instrument,
    pub results: Vec<PhotometryExposureResult>,
}

impl ScenarioOutput {
    /// Saturation level of the detector used, in electrons
    pub fn saturation_level_e(&self) -> f64 {
        self.instrument.detector.saturation_level_e
    }
}

impl Scenario {
    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Checks that need no numerical work
    pub fn validate(&self) -> Result<(), ExposureError> {
        self.conditions.validate()?;
        self.exposure.validate()?;
        self.profile.validate()?;
        if self.target.is_empty() {
            return Err(ExposureError::InvalidValue(
                "scenario has no target components".to_string(),
            ));
        }
        Ok(())
    }

    /// Telescope and detector from the catalogs
    pub fn instrument(&self) -> Result<Instrument, ExposureError> {
        Instrument::from_configs(
            telescope::lookup(&self.telescope)?,
            detector::lookup(&self.detector)?,
        )
    }

    /// Target spectrum sampled like `template`
    pub fn build_target(&self, template: &SpectralGrid) -> Result<TargetSpectrum, ExposureError> {
        let mut target = TargetSpectrum::new(template);
        for component in &self.target {
            component.add_to(&mut target, template)?;
        }
        Ok(target)
    }

    /// Atmosphere, mirrors, vignetting, filter and detector QE
    pub fn build_throughput(
        &self,
        template: &SpectralGrid,
        instrument: &Instrument,
    ) -> Result<ThroughputFilter, ExposureError> {
        Ok(ThroughputBuilder::new(template)
            .atmosphere(self.conditions.telescope.airmass)?
            .mirrors(instrument.mirror_count)?
            .vignetting(self.conditions.telescope.mirror_factor)?
            .filter(&self.exposure.filter)?
            .detector_qe(&self.exposure.detector_material)?
            .build())
    }

    /// Run the full pipeline on the standard wavelength grid
    pub fn evaluate(&self) -> Result<ScenarioOutput, ExposureError> {
        self.validate()?;
        let instrument = self.instrument()?;
        instrument.detector.read_mode(&self.exposure.read_mode)?;

        let template = SpectralGrid::pipeline(0.0);
        let target = self.build_target(&template)?;
        let throughput = self.build_throughput(&template, &instrument)?;

        let mut sky_model = SkySpectrumModel::new(&template);
        let sky = sky_model.update(&self.conditions)?.clone();

        let engine = ExposureEngine::new(instrument.clone()).with_profile(self.profile);
        let results = engine.run(
            &target,
            &sky,
            &throughput,
            &self.exposure,
            self.conditions.seeing_fwhm_arcsec(),
            &self.apertures,
        )?;

        Ok(ScenarioOutput {
            target,
            sky,
            throughput,
            instrument,
            results,
        })
    }
}

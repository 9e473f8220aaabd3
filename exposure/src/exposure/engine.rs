//! Signal and noise budget of aperture photometry
//!
//! The engine integrates the target and sky spectra through the throughput
//! curve once per evaluation, then spreads the resulting photo-electron rates
//! over the seeing profile for each requested aperture.
//!
//! Per aperture of radius `r` (in FWHM), with binned pixel scale `p`,
//! frame time `t` and `R` co-added frames:
//!
//! ```text
//! TotalFlux    = A ∫ f T dλ · t · R
//! ApertureFlux = EE(r) · TotalFlux
//! SkyLevel     = A ∫ s T dλ · p² · t             (one binned pixel, one frame)
//! SkyNoise     = sqrt(SkyLevel + dark · t + RN²)
//! SN           = ApertureFlux / sqrt(ApertureFlux + R · n_pix · SkyNoise²)
//! ```

use std::f64::consts::PI;
use std::time::Duration;

use super::config::ExposureConfig;
use super::profile::SeeingProfile;
use super::result::{ApertureMeasurement, PhotometryExposureResult};
use crate::error::ExposureError;
use crate::hardware::Instrument;
use crate::photometry::{SpectralGrid, TargetSpectrum, ThroughputFilter};

/// Upper limit for the exposure time search
const MAX_SEARCH_EXPOSURE_S: f64 = 1e7;

/// Relative convergence of the exposure time search
const SEARCH_TOLERANCE: f64 = 1e-6;

const MAX_SEARCH_ITERATIONS: usize = 200;

/// Rates and geometry shared by every aperture of one evaluation
#[derive(Debug, Clone, Copy)]
struct SignalRates {
    /// Object electrons/s over the whole profile
    target_e_per_s: f64,
    /// Sky electrons/s in one binned pixel
    sky_e_per_s: f64,
    /// Dark electrons/s in one binned pixel
    dark_e_per_s: f64,
    read_noise_e: f64,
    /// Binned pixel side in units of the seeing FWHM
    pixel_fwhm: f64,
    repeats: f64,
    /// False when the throughput blocks every wavelength
    transmits: bool,
}

impl SignalRates {
    fn measure(
        &self,
        profile: &SeeingProfile,
        exposure_s: f64,
        aperture: f64,
    ) -> Result<ApertureMeasurement, ExposureError> {
        if !self.transmits {
            return Err(ExposureError::NumericUndefined(format!(
                "throughput is zero at all wavelengths, aperture {aperture} has no signal"
            )));
        }

        let frame_flux = self.target_e_per_s * exposure_s;
        let total_flux = frame_flux * self.repeats;
        let aperture_flux = profile.encircled_energy(aperture) * total_flux;
        let peak_level = profile.central_pixel_fraction(self.pixel_fwhm) * frame_flux;

        let sky_level = self.sky_e_per_s * exposure_s;
        let pixel_variance =
            sky_level + self.dark_e_per_s * exposure_s + self.read_noise_e * self.read_noise_e;
        let sky_noise = pixel_variance.sqrt();

        let radius_pixels = aperture / self.pixel_fwhm;
        let n_pixels = PI * radius_pixels * radius_pixels;

        let variance = aperture_flux + self.repeats * n_pixels * pixel_variance;
        if !(variance > 0.0) {
            return Err(ExposureError::NumericUndefined(format!(
                "noise budget of aperture {aperture} is {variance}"
            )));
        }
        let sn = aperture_flux / variance.sqrt();

        let measurement = ApertureMeasurement {
            sky_level,
            sky_noise,
            peak_level,
            total_flux,
            aperture_flux,
            sn,
            n_pixels,
        };

        let fields = [
            sky_level,
            sky_noise,
            peak_level,
            total_flux,
            aperture_flux,
            sn,
            n_pixels,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(ExposureError::NumericUndefined(format!(
                "aperture {aperture} produced non-finite values: {measurement:?}"
            )));
        }
        Ok(measurement)
    }
}

/// A spectrum must span the whole throughput domain, otherwise the missing
/// part of the band would silently count as zero flux
fn check_coverage(
    name: &str,
    spectrum: &SpectralGrid,
    throughput: &SpectralGrid,
) -> Result<(), ExposureError> {
    let slack = 1e-9 * throughput.dx();
    if spectrum.x0() > throughput.x0() + slack || spectrum.x_max() < throughput.x_max() - slack {
        return Err(ExposureError::InvalidConfiguration(format!(
            "{name} spectrum covers [{}, {}] Å but the throughput needs [{}, {}] Å",
            spectrum.x0(),
            spectrum.x_max(),
            throughput.x0(),
            throughput.x_max()
        )));
    }
    Ok(())
}

/// Trapezoidal integral of `spectrum * throughput` over the throughput domain
fn band_integral(
    name: &str,
    spectrum: &SpectralGrid,
    throughput: &SpectralGrid,
) -> Result<f64, ExposureError> {
    if spectrum.shares_sampling(throughput) {
        return Ok(spectrum.integrate_product(throughput)?);
    }

    log::warn!(
        "{name} spectrum sampled at {} Å from {} Å, regridding onto the throughput",
        spectrum.dx(),
        spectrum.x0()
    );
    let regridded = spectrum.regrid_like(throughput)?;
    Ok(regridded.integrate_product(throughput)?)
}

fn check_apertures(apertures: &[f64]) -> Result<(), ExposureError> {
    if apertures.is_empty() {
        return Err(ExposureError::InvalidValue(
            "at least one aperture is required".to_string(),
        ));
    }
    if let Some(bad) = apertures.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
        return Err(ExposureError::InvalidValue(format!(
            "aperture radius must be positive, got {bad}"
        )));
    }
    Ok(())
}

/// Computes photometry results for one instrument
#[derive(Debug, Clone)]
pub struct ExposureEngine {
    instrument: Instrument,
    profile: SeeingProfile,
}

impl ExposureEngine {
    /// Engine using a Gaussian seeing profile
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            profile: SeeingProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: SeeingProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn profile(&self) -> SeeingProfile {
        self.profile
    }

    /// Evaluate every aperture of one exposure
    ///
    /// # Arguments
    /// * `target` - Object photon flux density, photons/s/cm²/Å
    /// * `sky` - Sky photon flux density, photons/s/cm²/Å/arcsec²
    /// * `throughput` - Combined atmosphere, optics, filter and QE transmission
    /// * `config` - Exposure time, repeats, binning and readout mode
    /// * `seeing_fwhm_arcsec` - Seeing FWHM at the target's airmass
    /// * `apertures` - Aperture radii in units of the seeing FWHM
    ///
    /// # Errors
    /// Configuration problems abort before any aperture is evaluated:
    /// `InvalidConfiguration` for exposure settings, seeing, instrument or a
    /// target or sky spectrum not covering the throughput domain,
    /// `InvalidValue` for an empty target or aperture list, `Catalog` for an
    /// unknown read mode. Numerical failures of a single aperture are stored
    /// in that aperture's result instead.
    pub fn run(
        &self,
        target: &TargetSpectrum,
        sky: &SpectralGrid,
        throughput: &ThroughputFilter,
        config: &ExposureConfig,
        seeing_fwhm_arcsec: f64,
        apertures: &[f64],
    ) -> Result<Vec<PhotometryExposureResult>, ExposureError> {
        check_apertures(apertures)?;
        let rates = self.prepare(target, sky, throughput, config, seeing_fwhm_arcsec)?;

        let exposure_s = config.exposure_time.as_secs_f64();
        let results: Vec<PhotometryExposureResult> = apertures
            .iter()
            .map(|&aperture| {
                let measurement = rates.measure(&self.profile, exposure_s, aperture);
                match &measurement {
                    Ok(m) => log::debug!(
                        "Aperture {aperture:.2} FWHM: {:.1} px, flux {:.4e} e⁻, sky {:.4e} e⁻/px, SN {:.3}",
                        m.n_pixels,
                        m.aperture_flux,
                        m.sky_level,
                        m.sn
                    ),
                    Err(e) => log::warn!("Aperture {aperture:.2} FWHM undefined: {e}"),
                }
                PhotometryExposureResult {
                    aperture,
                    measurement,
                }
            })
            .collect();

        log::info!(
            "Evaluated {} apertures for {} x {:.3} s, binning {}, read mode {} ({} undefined)",
            results.len(),
            config.repeats,
            exposure_s,
            config.binning,
            config.read_mode,
            results.iter().filter(|r| !r.is_defined()).count()
        );
        Ok(results)
    }

    /// Frame exposure time at which `aperture` reaches `target_sn`
    ///
    /// The repeat count of `config` is kept; only the frame time is searched,
    /// by bisection after doubling an upper bound until it is bright enough.
    ///
    /// # Errors
    /// Same configuration errors as [`ExposureEngine::run`], `InvalidValue`
    /// for a non-positive `target_sn` and `NumericUndefined` when the target
    /// SN cannot be reached within the search range.
    #[allow(clippy::too_many_arguments)]
    pub fn exposure_time_for_snr(
        &self,
        target_sn: f64,
        target: &TargetSpectrum,
        sky: &SpectralGrid,
        throughput: &ThroughputFilter,
        config: &ExposureConfig,
        seeing_fwhm_arcsec: f64,
        aperture: f64,
    ) -> Result<Duration, ExposureError> {
        if !(target_sn.is_finite() && target_sn > 0.0) {
            return Err(ExposureError::InvalidValue(format!(
                "target SN must be positive, got {target_sn}"
            )));
        }
        check_apertures(&[aperture])?;
        let rates = self.prepare(target, sky, throughput, config, seeing_fwhm_arcsec)?;

        let sn_at = |exposure_s: f64| -> Result<f64, ExposureError> {
            Ok(rates.measure(&self.profile, exposure_s, aperture)?.sn)
        };

        let mut low = 0.0;
        let mut high = 1.0;
        while sn_at(high)? < target_sn {
            low = high;
            high *= 2.0;
            if high > MAX_SEARCH_EXPOSURE_S {
                return Err(ExposureError::NumericUndefined(format!(
                    "SN {target_sn} not reached within {MAX_SEARCH_EXPOSURE_S} s"
                )));
            }
        }

        let mut iteration = 0;
        while iteration < MAX_SEARCH_ITERATIONS && (high - low) > SEARCH_TOLERANCE * high {
            let mid = (low + high) / 2.0;
            if sn_at(mid)? >= target_sn {
                high = mid;
            } else {
                low = mid;
            }
            iteration += 1;
        }

        log::info!(
            "SN {target_sn} at aperture {aperture} FWHM needs {high:.4} s per frame ({iteration} iterations)"
        );
        Ok(Duration::from_secs_f64(high))
    }

    /// Validate the configuration and integrate the spectra
    fn prepare(
        &self,
        target: &TargetSpectrum,
        sky: &SpectralGrid,
        throughput: &ThroughputFilter,
        config: &ExposureConfig,
        seeing_fwhm_arcsec: f64,
    ) -> Result<SignalRates, ExposureError> {
        config.validate()?;
        self.profile.validate()?;
        self.instrument.validate()?;
        if !(seeing_fwhm_arcsec.is_finite() && seeing_fwhm_arcsec > 0.0) {
            return Err(ExposureError::InvalidConfiguration(format!(
                "seeing FWHM must be positive, got {seeing_fwhm_arcsec}"
            )));
        }

        let detector = &self.instrument.detector;
        let read_noise_e = detector.read_mode(&config.read_mode)?.read_noise_e;
        if config.detector_material != detector.material {
            log::warn!(
                "Exposure configured for {} but detector {} is {}",
                config.detector_material,
                detector.name,
                detector.material
            );
        }

        let target_grid = target.combined()?;
        let throughput_grid = throughput.grid();
        check_coverage("target", &target_grid, throughput_grid)?;
        check_coverage("sky", sky, throughput_grid)?;
        let area = self.instrument.collecting_area_cm2;
        let pixel_scale = self.instrument.binned_pixel_scale_arcsec(config.binning);
        let binned_pixels = (config.binning as f64).powi(2);

        let transmits = throughput.equivalent_width() > 0.0;
        let target_e_per_s = area * band_integral("target", &target_grid, throughput_grid)?;
        let sky_e_per_s =
            area * band_integral("sky", sky, throughput_grid)? * pixel_scale * pixel_scale;

        log::debug!(
            "{}: target {:.4e} e⁻/s, sky {:.4e} e⁻/s/px at {:.3}\"/px",
            self.instrument.name,
            target_e_per_s,
            sky_e_per_s,
            pixel_scale
        );

        Ok(SignalRates {
            target_e_per_s,
            sky_e_per_s,
            dark_e_per_s: detector.dark_current_e_per_s() * binned_pixels,
            read_noise_e,
            pixel_fwhm: pixel_scale / seeing_fwhm_arcsec,
            repeats: config.repeats as f64,
            transmits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{DarkCurrentModel, DetectorConfig, ReadMode};
    use crate::photometry::spectrum::GridSpectrum;
    use crate::units::{Length, LengthExt};
    use approx::assert_relative_eq;

    /// Pixel scale giving exactly 10 pixels inside r = 1" at 1" seeing
    fn ten_pixel_scale() -> f64 {
        (PI / 10.0).sqrt()
    }

    fn detector(read_noise_e: f64, dark: DarkCurrentModel) -> DetectorConfig {
        DetectorConfig {
            name: "test".to_string(),
            material: "back-illuminated".to_string(),
            pixel_size: Length::from_micrometers(15.0),
            read_modes: vec![ReadMode::new("slow", read_noise_e)],
            saturation_level_e: 100_000.0,
            dark_current: dark,
            operating_temp_c: -100.0,
        }
    }

    fn engine(read_noise_e: f64) -> ExposureEngine {
        let instrument = Instrument::new(
            "unit area",
            1.0,
            ten_pixel_scale(),
            detector(read_noise_e, DarkCurrentModel::none()),
        );
        ExposureEngine::new(instrument)
    }

    fn flat(value: f64) -> SpectralGrid {
        SpectralGrid::constant(5000.0, 1.0, 2, value).unwrap()
    }

    fn target(value: f64) -> TargetSpectrum {
        let template = flat(0.0);
        let mut target = TargetSpectrum::new(&template);
        target
            .add_component("flat", &GridSpectrum::new(flat(value)))
            .unwrap();
        target
    }

    fn config(seconds: u64) -> ExposureConfig {
        ExposureConfig {
            exposure_time: Duration::from_secs(seconds),
            ..Default::default()
        }
    }

    #[test]
    fn test_closed_form_single_aperture() {
        let sky_per_pixel = 0.001;
        let sky = flat(sky_per_pixel / ten_pixel_scale().powi(2));
        let throughput = ThroughputFilter::from_grid(flat(0.5)).unwrap();

        let results = engine(5.0)
            .run(&target(1.0), &sky, &throughput, &config(100), 1.0, &[1.0])
            .unwrap();
        assert_eq!(results.len(), 1);

        let m = results[0].measurement().unwrap();
        assert_relative_eq!(m.total_flux, 50.0, epsilon = 1e-9);
        assert_relative_eq!(m.aperture_flux, 0.9375 * 50.0, epsilon = 1e-9);
        assert_relative_eq!(m.n_pixels, 10.0, epsilon = 1e-9);
        assert_relative_eq!(m.sky_level, 0.05, epsilon = 1e-12);
        assert_relative_eq!(m.sky_noise, (0.05f64 + 25.0).sqrt(), epsilon = 1e-12);

        let expected = m.aperture_flux / (m.aperture_flux + 10.0 * 0.05 + 10.0 * 25.0).sqrt();
        assert_relative_eq!(m.sn, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_repeats_and_dark_current() {
        let instrument = Instrument::new(
            "dark",
            1.0,
            ten_pixel_scale(),
            detector(3.0, DarkCurrentModel::new(0.01, -100.0, 7.0)),
        );
        let engine = ExposureEngine::new(instrument);
        let sky = flat(0.0);
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let config = ExposureConfig {
            exposure_time: Duration::from_secs(100),
            repeats: 4,
            ..Default::default()
        };

        let results = engine
            .run(&target(1.0), &sky, &throughput, &config, 1.0, &[1.0])
            .unwrap();
        let m = results[0].measurement().unwrap();

        // 1 e⁻/s for 4 x 100 s
        assert_relative_eq!(m.total_flux, 400.0, epsilon = 1e-9);
        let pixel_variance: f64 = 0.01 * 100.0 + 9.0;
        assert_relative_eq!(m.sky_noise, pixel_variance.sqrt(), epsilon = 1e-12);
        let expected = m.aperture_flux / (m.aperture_flux + 4.0 * 10.0 * pixel_variance).sqrt();
        assert_relative_eq!(m.sn, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_binning_changes_pixel_count_and_sky() {
        let sky = flat(1.0);
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let engine = engine(5.0);

        let unbinned = engine
            .run(&target(1.0), &sky, &throughput, &config(10), 1.0, &[1.0])
            .unwrap();
        let binned_config = ExposureConfig {
            binning: 2,
            ..config(10)
        };
        let binned = engine
            .run(&target(1.0), &sky, &throughput, &binned_config, 1.0, &[1.0])
            .unwrap();

        let (a, b) = (
            unbinned[0].measurement().unwrap(),
            binned[0].measurement().unwrap(),
        );
        assert_relative_eq!(b.n_pixels, a.n_pixels / 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.sky_level, a.sky_level * 4.0, epsilon = 1e-9);
        assert_relative_eq!(b.total_flux, a.total_flux, epsilon = 1e-9);
        // Fewer reads of the same read noise
        assert!(b.sn > a.sn);
    }

    #[test]
    fn test_larger_aperture_collects_more_flux() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let results = engine(5.0)
            .run(
                &target(1.0),
                &flat(0.01),
                &throughput,
                &config(60),
                1.2,
                &[0.5, 1.0, 2.0],
            )
            .unwrap();

        let fluxes: Vec<f64> = results
            .iter()
            .map(|r| r.measurement().unwrap().aperture_flux)
            .collect();
        assert!(fluxes[0] < fluxes[1] && fluxes[1] < fluxes[2]);

        // Peak, sky and total do not depend on the aperture
        let first = results[0].measurement().unwrap();
        for r in &results[1..] {
            let m = r.measurement().unwrap();
            assert_eq!(m.peak_level, first.peak_level);
            assert_eq!(m.sky_level, first.sky_level);
            assert_eq!(m.total_flux, first.total_flux);
        }
    }

    #[test]
    fn test_zero_throughput_is_undefined_for_every_aperture() {
        let throughput = ThroughputFilter::from_grid(flat(0.0)).unwrap();
        let results = engine(5.0)
            .run(&target(1.0), &flat(0.1), &throughput, &config(100), 1.0, &[0.5, 1.0, 3.0])
            .unwrap();

        assert_eq!(results.len(), 3);
        for result in &results {
            assert!(matches!(
                result.measurement,
                Err(ExposureError::NumericUndefined(_))
            ));
        }
    }

    #[test]
    fn test_no_noise_at_all_is_undefined() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let results = engine(0.0)
            .run(&target(0.0), &flat(0.0), &throughput, &config(100), 1.0, &[1.0])
            .unwrap();
        assert!(!results[0].is_defined());
    }

    #[test]
    fn test_configuration_errors_abort() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let engine = engine(5.0);
        let sky = flat(0.1);

        let empty = TargetSpectrum::new(&flat(0.0));
        assert!(matches!(
            engine.run(&empty, &sky, &throughput, &config(100), 1.0, &[1.0]),
            Err(ExposureError::InvalidValue(_))
        ));
        assert!(matches!(
            engine.run(&target(1.0), &sky, &throughput, &config(100), 1.0, &[]),
            Err(ExposureError::InvalidValue(_))
        ));
        assert!(matches!(
            engine.run(&target(1.0), &sky, &throughput, &config(100), 1.0, &[1.0, -1.0]),
            Err(ExposureError::InvalidValue(_))
        ));
        assert!(matches!(
            engine.run(&target(1.0), &sky, &throughput, &config(0), 1.0, &[1.0]),
            Err(ExposureError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            engine.run(&target(1.0), &sky, &throughput, &config(100), 0.0, &[1.0]),
            Err(ExposureError::InvalidConfiguration(_))
        ));

        let fast = ExposureConfig {
            read_mode: "fast".to_string(),
            ..config(100)
        };
        assert!(matches!(
            engine.run(&target(1.0), &sky, &throughput, &fast, 1.0, &[1.0]),
            Err(ExposureError::Catalog(_))
        ));
    }

    #[test]
    fn test_mismatched_sky_sampling_is_regridded() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let coarse_sky = SpectralGrid::constant(4999.75, 0.5, 8, 0.2).unwrap();
        let matched_sky = flat(0.2);
        let engine = engine(5.0);

        let coarse = engine
            .run(&target(1.0), &coarse_sky, &throughput, &config(10), 1.0, &[1.0])
            .unwrap();
        let matched = engine
            .run(&target(1.0), &matched_sky, &throughput, &config(10), 1.0, &[1.0])
            .unwrap();
        assert_relative_eq!(
            coarse[0].measurement().unwrap().sky_level,
            matched[0].measurement().unwrap().sky_level,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_partial_sky_coverage_is_rejected() {
        let throughput =
            ThroughputFilter::from_grid(SpectralGrid::constant(5000.0, 1.0, 101, 1.0).unwrap())
                .unwrap();
        let wide_target = {
            let band = SpectralGrid::constant(5000.0, 1.0, 101, 0.0).unwrap();
            let mut target = TargetSpectrum::new(&band);
            target
                .add_component("flat", &GridSpectrum::new(band.filled_like(1.0)))
                .unwrap();
            target
        };
        let engine = engine(5.0);

        let full_sky = SpectralGrid::constant(5000.0, 1.0, 101, 0.1).unwrap();
        assert!(engine
            .run(&wide_target, &full_sky, &throughput, &config(100), 1.0, &[1.0])
            .is_ok());

        // Same sampling, red half missing
        let half_sky = SpectralGrid::constant(5000.0, 1.0, 51, 0.1).unwrap();
        let err = engine
            .run(&wide_target, &half_sky, &throughput, &config(100), 1.0, &[1.0])
            .unwrap_err();
        assert!(matches!(err, ExposureError::InvalidConfiguration(_)));
        assert!(err.is_configuration_error());

        // Offset sampling, blue edge missing
        let shifted_sky = SpectralGrid::constant(5000.5, 1.0, 51, 0.1).unwrap();
        let err = engine
            .run(&wide_target, &shifted_sky, &throughput, &config(100), 1.0, &[1.0])
            .unwrap_err();
        assert!(matches!(err, ExposureError::InvalidConfiguration(_)));

        // Narrow target on a wide throughput
        let err = engine
            .run(&target(1.0), &full_sky, &throughput, &config(100), 1.0, &[1.0])
            .unwrap_err();
        assert!(matches!(err, ExposureError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_apertures_checked_before_spectra() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let shifted_sky = SpectralGrid::constant(5000.5, 1.0, 1, 0.1).unwrap();
        let engine = engine(5.0);

        assert!(matches!(
            engine.run(&target(1.0), &shifted_sky, &throughput, &config(100), 1.0, &[]),
            Err(ExposureError::InvalidValue(_))
        ));
        assert!(matches!(
            engine.exposure_time_for_snr(
                10.0,
                &target(1.0),
                &shifted_sky,
                &throughput,
                &config(100),
                1.0,
                -1.0
            ),
            Err(ExposureError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_exposure_time_for_snr_round_trip() {
        let throughput = ThroughputFilter::from_grid(flat(0.8)).unwrap();
        let sky = flat(0.05);
        let engine = engine(5.0);

        let needed = engine
            .exposure_time_for_snr(25.0, &target(0.5), &sky, &throughput, &config(1), 1.0, 1.5)
            .unwrap();

        let check = ExposureConfig {
            exposure_time: needed,
            ..config(1)
        };
        let results = engine
            .run(&target(0.5), &sky, &throughput, &check, 1.0, &[1.5])
            .unwrap();
        assert_relative_eq!(results[0].sn().unwrap(), 25.0, max_relative = 1e-4);
    }

    #[test]
    fn test_exposure_time_for_snr_rejects_bad_target() {
        let throughput = ThroughputFilter::from_grid(flat(1.0)).unwrap();
        let engine = engine(5.0);
        assert!(matches!(
            engine.exposure_time_for_snr(0.0, &target(1.0), &flat(0.1), &throughput, &config(1), 1.0, 1.0),
            Err(ExposureError::InvalidValue(_))
        ));

        let blocked = ThroughputFilter::from_grid(flat(0.0)).unwrap();
        assert!(matches!(
            engine.exposure_time_for_snr(5.0, &target(1.0), &flat(0.1), &blocked, &config(1), 1.0, 1.0),
            Err(ExposureError::NumericUndefined(_))
        ));
    }
}

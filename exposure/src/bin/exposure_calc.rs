//! Exposure time and signal-to-noise calculator
//!
//! Evaluates a scenario (built-in default or a JSON file) and prints the
//! photometry budget of every aperture. Command line options override single
//! fields of the scenario.
//!
//! # Usage
//!
//! ```bash
//! # Default V = 20 point source, 300 s in dark time on the 1m telescope
//! cargo run --release --bin exposure_calc
//!
//! # Bright moon, R filter, 2x2 binning, and the time needed for SN = 50
//! cargo run --release --bin exposure_calc -- --filter R --binning 2 \
//!     --moon-phase 20 --moon-zenith 40 --target-sn 50
//!
//! # Scenario file, dumping the display grids for plotting
//! cargo run --release --bin exposure_calc -- --scenario night.json --dump-dir grids/
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;
use exposure::exposure::ExposureEngine;
use exposure::scenario::{Scenario, ScenarioOutput};
use exposure::shared_args::ExposureOverrideArgs;
use exposure::SpectralGrid;

#[derive(Parser, Debug)]
#[command(
    name = "Exposure Calculator",
    about = "Predicts detector signal and signal-to-noise for aperture photometry",
    long_about = None
)]
struct Args {
    /// Scenario JSON file; the built-in default scenario is used otherwise
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Write the effective scenario (after overrides) to this file
    #[arg(long)]
    save_scenario: Option<PathBuf>,

    #[command(flatten)]
    overrides: ExposureOverrideArgs,

    /// Also solve for the frame time reaching this signal-to-noise
    #[arg(long)]
    target_sn: Option<f64>,

    /// Directory for display-decimated target, sky and throughput grids
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn dump_grids(dir: &Path, output: &ScenarioOutput) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let target = output.target.combined()?;
    let grids: [(&str, &SpectralGrid); 3] = [
        ("target", &target),
        ("sky", &output.sky),
        ("throughput", output.throughput.grid()),
    ];
    for (name, grid) in grids {
        let path = dir.join(format!("{name}.txt"));
        let display = grid.to_display()?;
        display.write(&path)?;
        log::info!(
            "Wrote {} ({} of {} samples)",
            path.display(),
            display.len(),
            grid.len()
        );
    }
    Ok(())
}

fn print_results(scenario: &Scenario, output: &ScenarioOutput) {
    let exposure = &scenario.exposure;
    println!("Exposure Calculator");
    println!("===================");
    println!();
    println!("Instrument:      {}", output.instrument.name);
    println!(
        "Exposure:        {} x {:.3} s, binning {}x{}, filter {}, read mode {}",
        exposure.repeats,
        exposure.exposure_time.as_secs_f64(),
        exposure.binning,
        exposure.binning,
        exposure.filter,
        exposure.read_mode
    );
    println!(
        "Seeing:          {:.2}\" at airmass {:.2}",
        scenario.conditions.seeing_fwhm_arcsec(),
        scenario.conditions.telescope.airmass
    );
    println!(
        "Throughput:      {:.1} Å equivalent width",
        output.throughput.equivalent_width()
    );
    println!();

    println!(
        "{:<10} {:<10} {:<12} {:<12} {:<12} {:<12} {:<12} {:<10}",
        "Aperture", "Pixels", "Sky (e⁻)", "Sky noise", "Peak (e⁻)", "Total (e⁻)", "Aperture", "SN"
    );
    println!("{:-<96}", "");

    let saturation = output.saturation_level_e();
    for result in &output.results {
        match result.measurement() {
            Some(m) => {
                let flag = if result.is_saturated(saturation) {
                    "  SATURATED"
                } else {
                    ""
                };
                println!(
                    "{:<10.2} {:<10.1} {:<12.4e} {:<12.3} {:<12.4e} {:<12.4e} {:<12.4e} {:<10.2}{}",
                    result.aperture,
                    m.n_pixels,
                    m.sky_level,
                    m.sky_noise,
                    m.peak_level,
                    m.total_flux,
                    m.aperture_flux,
                    m.sn,
                    flag
                );
            }
            None => println!("{:<10.2} undefined", result.aperture),
        }
    }
    println!();
    println!("Sky, sky noise and peak are per binned pixel and frame; totals include all frames.");
    println!("Saturation level: {saturation:.0} e⁻");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => {
            log::info!("Loading scenario from {}", path.display());
            Scenario::load_from_file(path)
                .map_err(|e| format!("Failed to load scenario from '{}': {}", path.display(), e))?
        }
        None => Scenario::default(),
    };
    args.overrides.apply(&mut scenario);

    if let Some(path) = &args.save_scenario {
        scenario.save_to_file(path)?;
        log::info!("Saved scenario to {}", path.display());
    }

    let output = scenario.evaluate()?;
    print_results(&scenario, &output);

    if let Some(target_sn) = args.target_sn {
        let engine = ExposureEngine::new(output.instrument.clone()).with_profile(scenario.profile);
        println!();
        for &aperture in &scenario.apertures {
            match engine.exposure_time_for_snr(
                target_sn,
                &output.target,
                &output.sky,
                &output.throughput,
                &scenario.exposure,
                scenario.conditions.seeing_fwhm_arcsec(),
                aperture,
            ) {
                Ok(time) => println!(
                    "SN {target_sn} in aperture {aperture:.2}: {:.2} s per frame",
                    time.as_secs_f64()
                ),
                Err(e) => eprintln!("SN {target_sn} in aperture {aperture:.2}: {e}"),
            }
        }
    }

    if let Some(dir) = &args.dump_dir {
        dump_grids(dir, &output)?;
    }

    Ok(())
}

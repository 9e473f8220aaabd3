//! Ground-based exposure time and signal-to-noise calculator
//!
//! This crate turns a target spectrum, the sky background for a set of
//! observing conditions and the throughput of atmosphere, telescope, filter
//! and detector into per-aperture photometry results: sky level and noise,
//! peak pixel level, total and aperture flux, and signal-to-noise ratio.

pub mod algo;
pub mod conditions;
pub mod error;
pub mod exposure;
pub mod hardware;
pub mod photometry;
pub mod scenario;
pub mod shared_args;
pub mod units;

// Re-exports for easier access
pub use conditions::ObservingConditions;
pub use error::ExposureError;
pub use exposure::{
    ApertureMeasurement, ExposureConfig, ExposureEngine, PhotometryExposureResult, SeeingProfile,
};
pub use hardware::{DetectorConfig, Instrument, TelescopeConfig};
pub use photometry::grid::{GridError, SpectralGrid};
pub use photometry::sky::SkySpectrumModel;
pub use photometry::spectrum::{Spectrum, TargetSpectrum, CGS};
pub use photometry::throughput::{ThroughputBuilder, ThroughputFilter};
pub use photometry::trapezoid::trap_integrate;
pub use scenario::Scenario;

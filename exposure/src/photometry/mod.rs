//! Photometry models: spectral grids, throughput and sky brightness

pub mod curve;
pub mod extinction;
pub mod filters;
pub mod grid;
pub mod quantum_efficiency;
pub mod sky;
pub mod spectrum;
pub mod throughput;
pub mod trapezoid;
pub mod zodical;

pub use curve::TransmissionCurve;
pub use grid::{GridError, SpectralGrid};
pub use sky::SkySpectrumModel;
pub use spectrum::{Spectrum, TargetSpectrum, CGS};
pub use throughput::{ThroughputBuilder, ThroughputFilter};
pub use trapezoid::trap_integrate;
pub use zodical::ZodicalLight;

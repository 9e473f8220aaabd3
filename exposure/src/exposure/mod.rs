//! Exposure settings, seeing profiles and the photometry engine

pub mod config;
pub mod engine;
pub mod profile;
pub mod result;

pub use config::ExposureConfig;
pub use engine::ExposureEngine;
pub use profile::SeeingProfile;
pub use result::{ApertureMeasurement, PhotometryExposureResult};

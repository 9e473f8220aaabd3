//! Type-safe lengths for telescope and pixel geometry
//!
//! Apertures, focal lengths and pixel pitches are carried as `uom` lengths
//! so meters and microns cannot be mixed up when computing plate scales.

use uom::si::length::{centimeter, meter, micrometer, millimeter};

/// Length measurement
pub type Length = uom::si::f64::Length;

/// Extension trait for the length units used in optics and sensors
pub trait LengthExt {
    /// Create length from micrometers (pixel sizes)
    fn from_micrometers(um: f64) -> Self;

    /// Get length in micrometers
    fn as_micrometers(&self) -> f64;

    /// Create length from millimeters
    fn from_millimeters(mm: f64) -> Self;

    /// Get length in millimeters
    fn as_millimeters(&self) -> f64;

    /// Get length in centimeters
    fn as_centimeters(&self) -> f64;

    /// Create length from meters
    fn from_meters(m: f64) -> Self;

    /// Get length in meters
    fn as_meters(&self) -> f64;
}

impl LengthExt for Length {
    fn from_micrometers(um: f64) -> Self {
        Length::new::<micrometer>(um)
    }

    fn as_micrometers(&self) -> f64 {
        self.get::<micrometer>()
    }

    fn from_millimeters(mm: f64) -> Self {
        Length::new::<millimeter>(mm)
    }

    fn as_millimeters(&self) -> f64 {
        self.get::<millimeter>()
    }

    fn as_centimeters(&self) -> f64 {
        self.get::<centimeter>()
    }

    fn from_meters(m: f64) -> Self {
        Length::new::<meter>(m)
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }
}

/// Arcseconds per radian
pub const ARCSEC_PER_RADIAN: f64 = 206_264.806_247_096_36;

/// Angle subtended by `size` at the focus of a `focal_length` system, in
/// arcseconds (small angle)
pub fn angular_size_arcsec(size: Length, focal_length: Length) -> f64 {
    (size.as_meters() / focal_length.as_meters()) * ARCSEC_PER_RADIAN
}

//! Numerical helpers shared by the photometry models

pub mod misc;

pub use misc::{bracket, interp, interp_or, validate_table, InterpError};

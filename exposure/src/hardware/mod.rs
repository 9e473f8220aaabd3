//! Hardware module for telescope and detector configurations

pub mod dark_current;
pub mod detector;
pub mod instrument;
pub mod telescope;

pub use dark_current::DarkCurrentModel;
pub use detector::{DetectorConfig, ReadMode};
pub use instrument::Instrument;
pub use telescope::TelescopeConfig;

//! plotkit Settings Crate
//!
//! Loads, validates and saves drawing configuration files.

pub mod config;
pub mod error;

pub use config::{CanvasSettings, Config, ConfigFormat, MachineSettings};
pub use error::{SettingsError, SettingsResult};

//! Drawing configuration files.
//!
//! A configuration holds everything one plot needs:
//! - the canvas (paper size and margin)
//! - the seed and the ordered pipeline steps
//! - the machine settings used for toolpath output
//!
//! Files are JSON or TOML, chosen by extension. Unknown keys are ignored and
//! missing keys take their defaults.

use plotkit_core::PipelineStep;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Paper size and margin in millimetres.
pub use plotkit_core::Canvas as CanvasSettings;
/// Feed rates, pen heights, axis mapping and output dialect.
pub use plotkit_camtools::MachineConfig as MachineSettings;

/// Endpoint tolerance used by the chain finder when none is configured.
pub const DEFAULT_CHAIN_TOLERANCE: f64 = 0.01;

/// On-disk format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(if other.is_empty() {
                format!("{} has no extension, expected .json or .toml", path.display())
            } else {
                format!(".{other}, expected .json or .toml")
            })),
        }
    }
}

/// Complete drawing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed shared by every random choice in the pipeline.
    pub seed: u64,
    /// Distance within which path endpoints are treated as joined.
    #[serde(alias = "chainTolerance")]
    pub chain_tolerance: f64,
    pub canvas: CanvasSettings,
    pub machine: MachineSettings,
    /// Pipeline steps, applied in order.
    pub steps: Vec<PipelineStep>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            chain_tolerance: DEFAULT_CHAIN_TOLERANCE,
            canvas: CanvasSettings::default(),
            machine: MachineSettings::default(),
            steps: Vec::new(),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `content` in the given format and validates it.
    pub fn parse(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Serializes to the given format.
    pub fn serialize_as(&self, format: ConfigFormat) -> SettingsResult<String> {
        Ok(match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {e}", path.display())))?;
        let config = Self::parse(&content, format)?;
        debug!(
            "Loaded config from {}: {} steps, seed {}",
            path.display(),
            config.steps.len(),
            config.seed
        );
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = self.serialize_as(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {e}", path.display())))?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.canvas
            .validate()
            .map_err(|e| SettingsError::invalid("canvas", e.to_string()))?;

        if !self.chain_tolerance.is_finite() || self.chain_tolerance <= 0.0 {
            return Err(SettingsError::invalid(
                "chain_tolerance",
                format!("must be positive, got {}", self.chain_tolerance),
            ));
        }

        self.machine
            .validate()
            .map_err(|e| SettingsError::invalid("machine", e.to_string()))?;

        for (index, step) in self.steps.iter().enumerate() {
            if step.tool.trim().is_empty() {
                return Err(SettingsError::invalid(
                    format!("steps[{index}].tool"),
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }
}

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ConfigError;
use crate::export::ExportFormat;
use crate::metrics::DEFAULT_FAMILY;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub export: ExportConfig,
    pub generation: GenerationConfig,
}

/// Page geometry for paginated output, in millimetres
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 15.0,
        }
    }
}

impl PageConfig {
    pub fn usable_width(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// A family bundled with the typesetter; text is measured and drawn with it
    pub family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Environment variable consulted when no credential is given explicitly
    pub credential_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            credential_env: "API_KEY".to_string(),
        }
    }
}

impl Config {
    /// Configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!("bundled default_config.toml is invalid: {e}");
            Self::default()
        })
    }

    /// Read and parse a config file.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load config from a TOML file, falling back to the compiled default.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(ConfigError::Read(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Self::compiled_default()
            }
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                Self::compiled_default()
            }
        }
    }
}

//=========================================================================
// Settings
//=========================================================================
//
// Engine settings, loadable from TOML. Missing keys fall back to
// defaults; values are validated before the engine is built.
//
// ```toml
// root_path = "."
// window_title = "Strata Engine"
// window_width = 1280
// window_height = 720
// target_fps = 60.0
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;

//=== Settings ============================================================

/// Startup settings shared with states through the component registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding game data; `ErrorLog.txt` is written here.
    pub root_path: PathBuf,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_path: PathBuf::from("."),
            window_title: "Strata Engine".to_string(),
            window_width: 1280,
            window_height: 720,
            target_fps: 60.0,
        }
    }
}

impl Settings {
    /// Reads and validates settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(target: "config", "Loading settings from {}", path.display());

        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()
    }

    /// Checks value ranges, returning the settings unchanged when valid.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }

        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.target_fps));
        }

        Ok(self)
    }

    /// Path of the error log inside the root directory.
    pub fn error_log_path(&self) -> PathBuf {
        self.root_path.join(crate::core::error_log::ERROR_LOG_FILE)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

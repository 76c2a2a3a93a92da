// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON at `$XDG_CONFIG_HOME/drone-dashboard/config.json`. Missing
//! fields fall back to their defaults, so older files keep loading.

use crate::backends::camera::{CameraBackendType, StreamConstraints};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "drone-dashboard";
const CONFIG_FILE: &str = "config.json";

/// Preview stream settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub width: u32,
    pub height: u32,
    pub framerate: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        let constraints = StreamConstraints::default();
        Self {
            width: constraints.width,
            height: constraints.height,
            framerate: constraints.framerate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which capture backend to use
    pub backend: CameraBackendType,
    /// Capture device node (e.g. `/dev/video0`); first device when unset
    pub device_path: Option<String>,
    pub preview: PreviewSettings,
    /// Request the camera as soon as the dashboard opens
    pub autostart_camera: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: CameraBackendType::default(),
            device_path: None,
            preview: PreviewSettings::default(),
            autostart_camera: true,
        }
    }
}

impl Config {
    /// Default location of the config file, if a config dir is known
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let config: Config = serde_json::from_str(&contents)?;
        info!(path = %path.display(), backend = %config.backend, "Loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| AppError::Config(format!("failed to write {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Stream constraints for the capture session
    pub fn constraints(&self) -> StreamConstraints {
        StreamConstraints {
            device_path: self.device_path.clone(),
            width: self.preview.width,
            height: self.preview.height,
            framerate: self.preview.framerate,
        }
    }
}

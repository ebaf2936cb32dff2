//! Viewer configuration, read from `showroom.toml` when present

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "showroom.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, -10.0, 80.0],
            fov_degrees: 50.0,
        }
    }
}

/// Bounds for the pixel ratio the UI is laid out at.
///
/// The window surface always renders at the native ratio; the clamp is
/// applied as a UI zoom factor, so text and widgets stay within the range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub min_pixels_per_point: f32,
    pub max_pixels_per_point: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            min_pixels_per_point: 1.0,
            max_pixels_per_point: 2.0,
        }
    }
}

impl DisplayConfig {
    /// Clamps a native pixel ratio into the configured range.
    pub fn clamp_pixels_per_point(&self, native: f32) -> f32 {
        let lo = self.min_pixels_per_point.min(self.max_pixels_per_point);
        let hi = self.max_pixels_per_point.max(self.min_pixels_per_point);
        native.clamp(lo, hi)
    }

    /// Zoom that brings the native ratio into range; 1.0 when already inside.
    pub fn zoom_factor(&self, native: f32) -> f32 {
        if native <= 0.0 {
            return 1.0;
        }
        self.clamp_pixels_per_point(native) / native
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub asset_path: PathBuf,
    pub log_level: String,
    pub window_size: [f32; 2],
    pub camera: CameraConfig,
    pub display: DisplayConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from("assets/compressed.glb"),
            log_level: "info".to_string(),
            window_size: [1280.0, 800.0],
            camera: CameraConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Reads `path`; a missing file means defaults, a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

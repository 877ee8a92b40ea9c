// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from a YAML file. Every field is optional; anything
//! missing takes its default.

use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "TEXTOVERLAY_CONFIG";

/// Target PDF page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize { width: 595.0, height: 842.0 };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Where raster export looks for fonts, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub search_dirs: Vec<PathBuf>,
    pub candidates: Vec<String>,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            search_dirs: vec![
                PathBuf::from("fonts"),
                PathBuf::from("/usr/share/fonts/truetype/tlwg"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu"),
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("C:\\Windows\\Fonts"),
            ],
            candidates: vec![
                "THSarabunNew.ttf".to_string(),
                "Sarabun-Regular.ttf".to_string(),
                "Garuda.ttf".to_string(),
                "tahoma.ttf".to_string(),
                "DejaVuSans.ttf".to_string(),
                "arial.ttf".to_string(),
            ],
        }
    }
}

/// Values used for newly placed elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDefaults {
    pub width: f64,
    pub height: f64,
    pub font_size: u32,
    pub text: String,
}

impl Default for ElementDefaults {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 50.0,
            font_size: 20,
            text: String::new(),
        }
    }
}

/// Complete settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upscaling factor used when rasterizing a PDF page as background.
    pub pdf_raster_scale: f32,
    pub page: PageSize,
    pub fonts: FontSettings,
    pub defaults: ElementDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pdf_raster_scale: 2.0,
            page: PageSize::default(),
            fonts: FontSettings::default(),
            defaults: ElementDefaults::default(),
        }
    }
}

impl Settings {
    /// Settings file location: `$TEXTOVERLAY_CONFIG`, else the platform
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("textoverlay").join("settings.yaml"))
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml = std::fs::read_to_string(path).map_err(|e| OverlayError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings: Settings = serde_yaml::from_str(&yaml).map_err(|e| OverlayError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        settings.validated(path)
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    fn validated(self, path: &Path) -> Result<Self> {
        let invalid = |reason: &str| OverlayError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if !(self.pdf_raster_scale > 0.0) {
            return Err(invalid("pdf_raster_scale must be positive"));
        }
        if !(self.page.width > 0.0 && self.page.height > 0.0) {
            return Err(invalid("page size must be positive"));
        }
        if self.defaults.font_size == 0 {
            return Err(invalid("default font_size must be positive"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page, PageSize::A4);
        assert_eq!(settings.pdf_raster_scale, 2.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "pdf_raster_scale: 3.0\ndefaults:\n  font_size: 14\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.pdf_raster_scale, 3.0);
        assert_eq!(settings.defaults.font_size, 14);
        assert_eq!(settings.defaults.width, 200.0);
        assert_eq!(settings.fonts, FontSettings::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "page: [not, a, map").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(OverlayError::Config { .. })));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "pdf_raster_scale: 0\n").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(OverlayError::Config { .. })));
    }
}

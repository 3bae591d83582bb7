//! Export settings.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Largest accepted `upscale_factor`; 512 px at 16x is an 8192 px export.
pub const MAX_UPSCALE_FACTOR: u32 = 16;

/// Tunables for file exports. Every field has a default, so an empty TOML
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Multiplier applied to the display size for file exports.
    pub upscale_factor: u32,
    /// Filename without extension.
    pub file_stem: String,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            upscale_factor: 4,
            file_stem: "qrcode".to_string(),
            jpeg_quality: 100,
        }
    }
}

impl ExportSettings {
    /// Parses and validates settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: ExportSettings =
            toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_UPSCALE_FACTOR).contains(&self.upscale_factor) {
            return Err(Error::Config(format!(
                "upscale_factor must be between 1 and {}, got {}",
                MAX_UPSCALE_FACTOR, self.upscale_factor
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.file_stem.trim().is_empty() {
            return Err(Error::Config("file_stem must not be empty".to_string()));
        }
        Ok(())
    }
}

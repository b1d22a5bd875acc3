//! Canvas configuration types.
//!
//! Preview and export canvases are sized independently. Both are scaled by
//! the device pixel ratio when rasterized.
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DEVICE_PIXEL_RATIO, DEFAULT_EXPORT_HEIGHT, DEFAULT_EXPORT_WIDTH,
    DEFAULT_PREVIEW_HEIGHT, DEFAULT_PREVIEW_WIDTH,
};

fn default_preview_width() -> u32 {
    DEFAULT_PREVIEW_WIDTH
}

fn default_preview_height() -> u32 {
    DEFAULT_PREVIEW_HEIGHT
}

fn default_export_width() -> u32 {
    DEFAULT_EXPORT_WIDTH
}

fn default_export_height() -> u32 {
    DEFAULT_EXPORT_HEIGHT
}

fn default_device_pixel_ratio() -> f32 {
    DEFAULT_DEVICE_PIXEL_RATIO
}

/// Canvas sizes in logical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Interactive preview width (default: 700)
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    /// Interactive preview height (default: 700)
    #[serde(default = "default_preview_height")]
    pub preview_height: u32,
    /// Export base width; the image is contained in this box (default: 700)
    #[serde(default = "default_export_width")]
    pub export_width: u32,
    /// Export base height (default: 700)
    #[serde(default = "default_export_height")]
    pub export_height: u32,
    /// Multiplier from logical to physical pixels (default: 1.0)
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            preview_width: default_preview_width(),
            preview_height: default_preview_height(),
            export_width: default_export_width(),
            export_height: default_export_height(),
            device_pixel_ratio: default_device_pixel_ratio(),
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.preview_width == 0 || self.preview_height == 0 {
            return Err(format!(
                "Preview canvas must be non-empty, got {}x{}",
                self.preview_width, self.preview_height
            ));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(format!(
                "Export canvas must be non-empty, got {}x{}",
                self.export_width, self.export_height
            ));
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(format!(
                "device_pixel_ratio must be a positive number, got {}",
                self.device_pixel_ratio
            ));
        }
        Ok(())
    }
}

//! User-adjustable caption style.

use serde::{Deserialize, Serialize};

use super::effects::TextEffect;
use super::geometry::CaptionPosition;
use crate::constants::{DEFAULT_FONT_SCALE, FONT_SCALE_STEP, MAX_FONT_SCALE, MIN_FONT_SCALE};

/// Multiplier applied to the base caption font size.
///
/// Always within `[0.5, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct FontScale(f32);

impl FontScale {
    /// Clamp `value` into the allowed range. Non-finite input yields the default.
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        Self(value.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE))
    }

    /// Value as a slider would report it: clamped, then snapped to the 0.05 step.
    pub fn from_slider(value: f32) -> Self {
        let clamped = Self::new(value).0;
        let steps = ((clamped - MIN_FONT_SCALE) / FONT_SCALE_STEP).round();
        let snapped = MIN_FONT_SCALE + steps * FONT_SCALE_STEP;
        Self::new((snapped * 100.0).round() / 100.0)
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self(DEFAULT_FONT_SCALE)
    }
}

impl From<f32> for FontScale {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<FontScale> for f32 {
    fn from(scale: FontScale) -> Self {
        scale.0
    }
}

/// Style parameters shared by preview and export.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    pub effect: TextEffect,
    pub font_scale: FontScale,
    pub position: CaptionPosition,
}

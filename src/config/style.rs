//! Default caption style applied to new editor sessions.

use serde::{Deserialize, Serialize};

use crate::render::{CaptionPosition, CaptionStyle, FontScale, TextEffect};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    /// One of none, shadow, glow, stroke (default: none)
    #[serde(default)]
    pub text_effect: TextEffect,
    /// Font size multiplier, clamped to 0.5..=2.0 (default: 1.0)
    #[serde(default)]
    pub font_scale: FontScale,
    /// Normalized caption anchor (default: x 0.5, y 0.6)
    #[serde(default)]
    pub caption_position: CaptionPosition,
}

impl StyleConfig {
    pub fn to_caption_style(&self) -> CaptionStyle {
        CaptionStyle {
            effect: self.text_effect,
            font_scale: self.font_scale,
            position: self.caption_position,
        }
    }
}

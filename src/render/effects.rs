//! Caption text effects.
//!
//! Exactly one [`TextEffect`] is active at a time. Each effect paints a line
//! of caption text through one or more passes on a [`PaintSurface`]:
//!
//! - `none`: a single white fill
//! - `stroke`: a black outline followed by a white fill on top
//! - `shadow`: three white fills, each under a progressively tighter drop shadow
//! - `glow`: a single white fill under a soft white halo
//!
//! Shadow changes go through [`ShadowScope`], so the surface shadow is back
//! to its previous value once a line has been painted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::surface::{Color, PaintSurface, Shadow, ShadowScope};
use crate::constants::{MIN_STROKE_WIDTH, STROKE_WIDTH_RATIO};

/// Stacked drop shadows painted under the `shadow` effect, outermost first.
pub const SHADOW_LAYERS: [Shadow; 3] = [
    Shadow::new(Color::rgba(0, 0, 0, 0.1), 23.0, 0.0, 18.0),
    Shadow::new(Color::rgba(0, 0, 0, 0.1), 13.0, 0.0, 8.0),
    Shadow::new(Color::rgba(0, 0, 0, 0.4), 3.0, 0.0, 4.0),
];

/// Halo painted under the `glow` effect.
pub const GLOW: Shadow = Shadow::new(Color::rgba(255, 255, 255, 0.7), 6.0, 0.0, 0.0);

/// Paint style applied to every caption line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEffect {
    #[default]
    None,
    Shadow,
    Glow,
    Stroke,
}

impl TextEffect {
    pub const ALL: [TextEffect; 4] = [
        TextEffect::None,
        TextEffect::Shadow,
        TextEffect::Glow,
        TextEffect::Stroke,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextEffect::None => "none",
            TextEffect::Shadow => "shadow",
            TextEffect::Glow => "glow",
            TextEffect::Stroke => "stroke",
        }
    }

    /// Effect after a checkbox for `effect` is set to `checked`.
    ///
    /// Checking selects the effect. Unchecking the active effect falls back
    /// to `None`; unchecking any other effect changes nothing.
    pub fn toggled(self, effect: TextEffect, checked: bool) -> TextEffect {
        if checked {
            effect
        } else if self == effect {
            TextEffect::None
        } else {
            self
        }
    }
}

impl fmt::Display for TextEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(TextEffect::None),
            "shadow" => Ok(TextEffect::Shadow),
            "glow" => Ok(TextEffect::Glow),
            "stroke" => Ok(TextEffect::Stroke),
            other => Err(format!(
                "unknown text effect '{}', expected one of: none, shadow, glow, stroke",
                other
            )),
        }
    }
}

/// Outline width for a given font size.
pub fn stroke_width(font_size: f32) -> f32 {
    (font_size * STROKE_WIDTH_RATIO).floor().max(MIN_STROKE_WIDTH)
}

/// Paint one caption line at `(x, y)` with `effect`.
///
/// `x` is the horizontal center of the line and `y` its top.
pub fn paint_line<S>(surface: &mut S, line: &str, x: f32, y: f32, font_size: f32, effect: TextEffect)
where
    S: PaintSurface + ?Sized,
{
    match effect {
        TextEffect::None => {
            surface.fill_text(line, x, y, font_size, Color::WHITE);
        }
        TextEffect::Stroke => {
            surface.stroke_text(line, x, y, font_size, Color::BLACK, stroke_width(font_size));
            surface.fill_text(line, x, y, font_size, Color::WHITE);
        }
        TextEffect::Shadow => {
            let mut scope = ShadowScope::new(surface);
            for layer in SHADOW_LAYERS {
                scope.apply(layer);
                scope.fill_text(line, x, y, font_size, Color::WHITE);
            }
        }
        TextEffect::Glow => {
            let mut scope = ShadowScope::new(surface);
            scope.apply(GLOW);
            scope.fill_text(line, x, y, font_size, Color::WHITE);
        }
    }
}

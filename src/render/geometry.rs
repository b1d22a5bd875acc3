//! Placement geometry for the caption compositor.
//!
//! This module computes where the template image lands on a canvas and
//! converts caption anchors between canvas pixels and coordinates normalized
//! to the image rectangle.
//!
//! # Contain Fit
//!
//! The source image is scaled uniformly so that it fits entirely inside the
//! canvas (never cropped, never exceeding either axis) and is centered on
//! both axes.
//!
//! # Example
//!
//! ```
//! use memekit::render::geometry::compute_contain;
//!
//! let rect = compute_contain(1000.0, 500.0, 700.0, 700.0);
//! assert_eq!((rect.draw_width, rect.draw_height), (700.0, 350.0));
//! assert_eq!((rect.offset_x, rect.offset_y), (0.0, 175.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_FONT_RATIO, DEFAULT_CAPTION_X, DEFAULT_CAPTION_Y};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Rectangle the template image is drawn into inside a fixed-size canvas.
///
/// Always replaced wholesale when the image or canvas changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasRect {
    pub draw_width: f32,
    pub draw_height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl CanvasRect {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.draw_width <= 0.0 || self.draw_height <= 0.0
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.draw_width,
            self.draw_height,
        )
    }

    /// Caption font size before the user's font scale is applied.
    pub fn base_font_size(&self) -> f32 {
        self.draw_height * BASE_FONT_RATIO
    }

    /// Canvas-pixel anchor for a normalized caption position.
    pub fn anchor_for(&self, position: CaptionPosition) -> (f32, f32) {
        (
            self.offset_x + position.x_percent() * self.draw_width,
            self.offset_y + position.y_percent() * self.draw_height,
        )
    }

    /// Normalized caption position for a canvas-pixel anchor.
    ///
    /// Anchors outside the image rectangle are clamped onto its edges.
    pub fn normalize(&self, x: f32, y: f32) -> CaptionPosition {
        if self.is_empty() {
            return CaptionPosition::new(0.0, 0.0);
        }
        CaptionPosition::new(
            (x - self.offset_x) / self.draw_width,
            (y - self.offset_y) / self.draw_height,
        )
    }
}

/// Uniform scale factor of a contain fit.
///
/// Returns 0.0 for degenerate input.
pub fn contain_scale(source_width: f32, source_height: f32, max_width: f32, max_height: f32) -> f32 {
    if !all_positive(&[source_width, source_height, max_width, max_height]) {
        return 0.0;
    }
    (max_width / source_width).min(max_height / source_height)
}

/// Fit a source raster inside a `max_width` x `max_height` canvas.
///
/// The limiting axis is filled exactly; the other axis is centered.
/// Zero-size or non-finite input produces a zero-size rectangle at the
/// canvas center instead of an error.
pub fn compute_contain(
    source_width: f32,
    source_height: f32,
    max_width: f32,
    max_height: f32,
) -> CanvasRect {
    if !all_positive(&[source_width, source_height, max_width, max_height]) {
        let canvas_width = finite_or_zero(max_width).max(0.0);
        let canvas_height = finite_or_zero(max_height).max(0.0);
        return CanvasRect {
            draw_width: 0.0,
            draw_height: 0.0,
            offset_x: canvas_width / 2.0,
            offset_y: canvas_height / 2.0,
        };
    }

    let width_scale = max_width / source_width;
    let height_scale = max_height / source_height;

    let (draw_width, draw_height) = if width_scale <= height_scale {
        (max_width, (source_height * width_scale).min(max_height))
    } else {
        ((source_width * height_scale).min(max_width), max_height)
    };

    CanvasRect {
        draw_width,
        draw_height,
        offset_x: (max_width - draw_width) / 2.0,
        offset_y: (max_height - draw_height) / 2.0,
    }
}

fn all_positive(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite() && *v > 0.0)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Caption anchor relative to the image rectangle's top-left corner.
///
/// Both components live in `[0, 1]`; every constructor clamps, so an
/// out-of-range position cannot be stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CaptionPositionRepr", into = "CaptionPositionRepr")]
pub struct CaptionPosition {
    x_percent: f32,
    y_percent: f32,
}

impl CaptionPosition {
    pub fn new(x_percent: f32, y_percent: f32) -> Self {
        Self {
            x_percent: clamp_unit(x_percent),
            y_percent: clamp_unit(y_percent),
        }
    }

    pub fn x_percent(&self) -> f32 {
        self.x_percent
    }

    pub fn y_percent(&self) -> f32 {
        self.y_percent
    }
}

impl Default for CaptionPosition {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_X, DEFAULT_CAPTION_Y)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Serialize, Deserialize)]
struct CaptionPositionRepr {
    x_percent: f32,
    y_percent: f32,
}

impl From<CaptionPositionRepr> for CaptionPosition {
    fn from(repr: CaptionPositionRepr) -> Self {
        Self::new(repr.x_percent, repr.y_percent)
    }
}

impl From<CaptionPosition> for CaptionPositionRepr {
    fn from(position: CaptionPosition) -> Self {
        Self {
            x_percent: position.x_percent,
            y_percent: position.y_percent,
        }
    }
}

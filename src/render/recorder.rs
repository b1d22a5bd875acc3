//! Recording paint surface.
//!
//! [`PaintRecorder`] keeps the ordered list of paint calls instead of
//! rasterizing them. The `plan` CLI command prints this list, and it is the
//! surface tests use to check paint order.

use image::RgbaImage;
use serde::Serialize;

use super::geometry::Rect;
use super::surface::{Color, PaintSurface, Shadow};
use crate::resources::font::{estimate_advance, CaptionFont};

/// A single recorded paint call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    Clear,
    DrawImage {
        source_width: u32,
        source_height: u32,
        target: Rect,
        opacity: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
    },
    StrokeText {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
        line_width: f32,
    },
    StrokeDashedRect {
        rect: Rect,
        color: Color,
        line_width: f32,
        dash: [f32; 2],
    },
    SetShadow(Shadow),
}

/// Surface that records paint calls in order.
///
/// Text is measured with the caption font when one is given, otherwise
/// with the average-advance estimate.
#[derive(Debug, Clone)]
pub struct PaintRecorder {
    width: f32,
    height: f32,
    shadow: Shadow,
    font: Option<CaptionFont>,
    ops: Vec<PaintOp>,
}

impl PaintRecorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            shadow: Shadow::NONE,
            font: None,
            ops: Vec::new(),
        }
    }

    pub fn with_font(width: f32, height: f32, font: Option<CaptionFont>) -> Self {
        Self {
            font,
            ..Self::new(width, height)
        }
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PaintOp> {
        self.ops
    }

    /// Text of every fill, in paint order.
    pub fn filled_text(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PaintSurface for PaintRecorder {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(PaintOp::Clear);
    }

    fn draw_image(&mut self, image: &RgbaImage, target: Rect, opacity: f32) {
        self.ops.push(PaintOp::DrawImage {
            source_width: image.width(),
            source_height: image.height(),
            target,
            opacity,
        });
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        match &self.font {
            Some(font) => font.advance_width(text, font_size),
            None => estimate_advance(text, font_size),
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.ops.push(PaintOp::FillText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
        line_width: f32,
    ) {
        self.ops.push(PaintOp::StrokeText {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
            line_width,
        });
    }

    fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, line_width: f32, dash: [f32; 2]) {
        self.ops.push(PaintOp::StrokeDashedRect {
            rect,
            color,
            line_width,
            dash,
        });
    }

    fn shadow(&self) -> Shadow {
        self.shadow
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.shadow = shadow;
        self.ops.push(PaintOp::SetShadow(shadow));
    }
}

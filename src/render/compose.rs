//! Composition pipeline.
//!
//! [`render`] paints a [`Scene`] onto any [`PaintSurface`] in a fixed order:
//!
//! 1. clear the canvas
//! 2. draw the template image into its contained rectangle
//! 3. draw the caption, wrapped and styled, at its normalized anchor
//! 4. draw the watermark pinned to the bottom-right of the image
//!
//! Preview and export run this same function; they differ only in the
//! surface size and [`RenderOptions::show_bounding_box`]. Before every paint
//! call the pass checks its [`RenderTicket`] and stops without drawing
//! anything further once it has been superseded.

use image::RgbaImage;
use tracing::debug;

use super::effects::paint_line;
use super::generation::RenderTicket;
use super::geometry::{compute_contain, CanvasRect, Rect};
use super::layout::{layout_caption, LineLayout};
use super::style::CaptionStyle;
use super::surface::{Color, PaintSurface};
use crate::constants::{
    BASE_FONT_RATIO, BOUNDING_BOX_DASH, BOUNDING_BOX_LINE_WIDTH, WATERMARK_OPACITY,
    WATERMARK_PADDING_RATIO, WATERMARK_WIDTH_RATIO, WRAP_WIDTH_RATIO,
};

const FONT_SIZE_EPSILON: f32 = 1e-3;

/// Everything a render pass draws. Resources must already be decoded.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub image: &'a RgbaImage,
    pub caption: Option<&'a str>,
    pub watermark: Option<&'a RgbaImage>,
    pub style: CaptionStyle,
}

impl<'a> Scene<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self {
            image,
            caption: None,
            watermark: None,
            style: CaptionStyle::default(),
        }
    }

    pub fn with_caption(mut self, caption: &'a str) -> Self {
        self.caption = Some(caption);
        self
    }

    pub fn with_watermark(mut self, watermark: Option<&'a RgbaImage>) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn with_style(mut self, style: CaptionStyle) -> Self {
        self.style = style;
        self
    }

    /// Caption text to draw, or `None` when it is missing or blank.
    pub fn trimmed_caption(&self) -> Option<&'a str> {
        self.caption.map(str::trim).filter(|text| !text.is_empty())
    }
}

/// Interactive affordances of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_bounding_box: bool,
}

impl RenderOptions {
    pub fn preview() -> Self {
        Self {
            show_bounding_box: true,
        }
    }

    pub fn export() -> Self {
        Self {
            show_bounding_box: false,
        }
    }
}

/// How a render pass ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    /// Every layer was painted; carries the image rectangle used.
    Completed(CanvasRect),
    /// A newer pass started; painting stopped early.
    Superseded,
}

impl RenderOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RenderOutcome::Completed(_))
    }
}

/// Caption font size for an image rectangle and scale, floored to whole pixels.
///
/// A `1e-3` nudge is added before flooring so exact products such as
/// `350 * 0.08 = 28` do not floor to 27 under `f32` rounding.
pub fn caption_font_size(rect: &CanvasRect, font_scale: f32) -> f32 {
    (rect.draw_height * BASE_FONT_RATIO * font_scale + FONT_SIZE_EPSILON).floor()
}

/// Where the watermark lands for a `watermark_width` x `watermark_height` source.
///
/// Scaled to 15% of the image width, aspect preserved, inset from the
/// bottom-right corner by 3% of the image width on both axes.
pub fn watermark_rect(rect: &CanvasRect, watermark_width: u32, watermark_height: u32) -> Option<Rect> {
    if watermark_width == 0 || watermark_height == 0 || rect.is_empty() {
        return None;
    }

    let width = rect.draw_width * WATERMARK_WIDTH_RATIO;
    let height = width * watermark_height as f32 / watermark_width as f32;
    let padding = rect.draw_width * WATERMARK_PADDING_RATIO;

    Some(Rect::new(
        rect.offset_x + rect.draw_width - width - padding,
        rect.offset_y + rect.draw_height - height - padding,
        width,
        height,
    ))
}

/// Lay out the caption of `scene` inside `rect` using the surface's metrics.
///
/// Returns the layout and font size, or `None` when no caption is drawn.
pub fn caption_layout<S>(surface: &S, scene: &Scene<'_>, rect: &CanvasRect) -> Option<(LineLayout, f32)>
where
    S: PaintSurface + ?Sized,
{
    let text = scene.trimmed_caption()?;
    let font_size = caption_font_size(rect, scene.style.font_scale.value());
    if font_size < 1.0 {
        return None;
    }

    let (anchor_x, anchor_y) = rect.anchor_for(scene.style.position);
    let max_width = rect.draw_width * WRAP_WIDTH_RATIO;
    let layout = layout_caption(text, anchor_x, anchor_y, max_width, font_size, |line| {
        surface.measure_text(line, font_size)
    })?;

    Some((layout, font_size))
}

/// Paint `scene` onto `surface`.
pub fn render<S>(
    surface: &mut S,
    scene: &Scene<'_>,
    options: RenderOptions,
    ticket: &RenderTicket,
) -> RenderOutcome
where
    S: PaintSurface + ?Sized,
{
    macro_rules! ensure_current {
        () => {
            if !ticket.is_current() {
                debug!(generation = ticket.generation(), "Render pass superseded");
                return RenderOutcome::Superseded;
            }
        };
    }

    ensure_current!();
    surface.clear();

    let rect = compute_contain(
        scene.image.width() as f32,
        scene.image.height() as f32,
        surface.width(),
        surface.height(),
    );

    ensure_current!();
    surface.draw_image(scene.image, rect.to_rect(), 1.0);

    if let Some((layout, font_size)) = caption_layout(surface, scene, &rect) {
        if options.show_bounding_box {
            ensure_current!();
            surface.stroke_dashed_rect(
                layout.bounds,
                Color::WHITE,
                BOUNDING_BOX_LINE_WIDTH,
                BOUNDING_BOX_DASH,
            );
        }

        let (anchor_x, anchor_y) = rect.anchor_for(scene.style.position);
        for (line_y, line) in layout.positioned_lines(anchor_y) {
            ensure_current!();
            paint_line(surface, line, anchor_x, line_y, font_size, scene.style.effect);
        }
    }

    if let Some(watermark) = scene.watermark {
        if let Some(target) = watermark_rect(&rect, watermark.width(), watermark.height()) {
            ensure_current!();
            surface.draw_image(watermark, target, WATERMARK_OPACITY);
        }
    }

    debug!(
        draw_width = rect.draw_width,
        draw_height = rect.draw_height,
        effect = %scene.style.effect,
        bounding_box = options.show_bounding_box,
        "Render pass completed"
    );
    RenderOutcome::Completed(rect)
}

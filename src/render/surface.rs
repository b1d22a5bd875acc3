//! Paint surface abstraction.
//!
//! The composition pipeline never touches pixels directly; it issues paint
//! calls through [`PaintSurface`]. [`super::raster::RasterSurface`] turns
//! them into an RGBA image and [`super::recorder::PaintRecorder`] records
//! them in order.
//!
//! Text calls use centered horizontal alignment and top vertical alignment:
//! `(x, y)` is the horizontal center and the top of the em box.
//!
//! The only transient drawing state is the shadow. It is changed through
//! [`ShadowScope`], which restores the previous shadow when dropped.

use std::ops::{Deref, DerefMut};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// RGB color with a separate alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }
}

/// Drop shadow cast by subsequent text paints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Shadow {
    /// No shadow; the initial state of every surface.
    pub const NONE: Shadow = Shadow {
        color: Color::TRANSPARENT,
        blur: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub const fn new(color: Color, blur: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            color,
            blur,
            offset_x,
            offset_y,
        }
    }

    /// A shadow is only drawn when it has color and either blur or offset.
    pub fn is_visible(&self) -> bool {
        self.color.alpha > 0.0 && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::NONE
    }
}

/// Drawing target of the composition pipeline.
///
/// Coordinates are logical canvas pixels; implementations apply their own
/// device pixel ratio.
pub trait PaintSurface {
    /// Logical canvas width.
    fn width(&self) -> f32;

    /// Logical canvas height.
    fn height(&self) -> f32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw `image` scaled into `target`, multiplied by `opacity`.
    fn draw_image(&mut self, image: &RgbaImage, target: Rect, opacity: f32);

    /// Advance width of `text` at `font_size`.
    fn measure_text(&self, text: &str, font_size: f32) -> f32;

    /// Fill `text`, casting the current shadow.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color);

    /// Outline `text` with a stroke of `line_width`, casting the current shadow.
    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font_size: f32,
        color: Color,
        line_width: f32,
    );

    /// Outline `rect` with a dashed line; `dash` is the (on, off) pattern.
    fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, line_width: f32, dash: [f32; 2]);

    /// Shadow currently in effect.
    fn shadow(&self) -> Shadow;

    /// Replace the current shadow. Prefer [`ShadowScope`] so it is restored.
    fn set_shadow(&mut self, shadow: Shadow);
}

/// Scoped access to a surface whose shadow is restored on drop.
///
/// Dereferences to the surface, so paints go through the scope:
///
/// ```
/// use memekit::render::recorder::PaintRecorder;
/// use memekit::render::surface::{Color, PaintSurface, Shadow, ShadowScope};
///
/// let mut surface = PaintRecorder::new(100.0, 100.0);
/// {
///     let mut scope = ShadowScope::new(&mut surface);
///     scope.apply(Shadow::new(Color::BLACK, 3.0, 0.0, 4.0));
///     scope.fill_text("hi", 50.0, 10.0, 20.0, Color::WHITE);
/// }
/// assert_eq!(surface.shadow(), Shadow::NONE);
/// ```
pub struct ShadowScope<'a, S: PaintSurface + ?Sized> {
    surface: &'a mut S,
    previous: Shadow,
}

impl<'a, S: PaintSurface + ?Sized> ShadowScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let previous = surface.shadow();
        Self { surface, previous }
    }

    pub fn apply(&mut self, shadow: Shadow) {
        self.surface.set_shadow(shadow);
    }
}

impl<S: PaintSurface + ?Sized> Deref for ShadowScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: PaintSurface + ?Sized> DerefMut for ShadowScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: PaintSurface + ?Sized> Drop for ShadowScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_shadow(self.previous);
    }
}

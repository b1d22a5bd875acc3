//! RGBA raster surface.
//!
//! [`RasterSurface`] rasterizes paint calls into an [`RgbaImage`] whose size
//! is the logical canvas size multiplied by the device pixel ratio. Every
//! coordinate and length it receives is logical and scaled on the way in,
//! so the same scene produces the same composition at any ratio.
//!
//! # Features
//!
//! - Lanczos3 image scaling via `fast_image_resize` on premultiplied alpha
//! - Porter-Duff "over" blending with extra opacity
//! - Glyph coverage masks from the caption font
//! - Outlines by dilating the coverage mask
//! - Gaussian drop shadows via `image::imageops::blur`
//! - Dashed rectangle outlines

use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::{imageops, ImageBuffer, Luma, Rgba, RgbaImage};
use std::borrow::Cow;
use std::num::NonZeroU32;
use tracing::warn;

use super::geometry::Rect;
use super::surface::{Color, PaintSurface, Shadow};
use crate::resources::font::{estimate_advance, CaptionFont};

/// Surface that paints into an owned RGBA buffer.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: RgbaImage,
    logical_width: f32,
    logical_height: f32,
    pixel_ratio: f32,
    shadow: Shadow,
    font: Option<CaptionFont>,
}

impl RasterSurface {
    /// Create a transparent surface of `logical_width` x `logical_height`.
    ///
    /// A non-positive or non-finite `pixel_ratio` is treated as 1.
    pub fn new(
        logical_width: u32,
        logical_height: u32,
        pixel_ratio: f32,
        font: Option<CaptionFont>,
    ) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let width = (logical_width as f32 * pixel_ratio).round() as u32;
        let height = (logical_height as f32 * pixel_ratio).round() as u32;

        Self {
            canvas: RgbaImage::new(width, height),
            logical_width: logical_width as f32,
            logical_height: logical_height as f32,
            pixel_ratio,
            shadow: Shadow::NONE,
            font,
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Glyph coverage of one line of text in device pixels.
    fn text_mask(&self, text: &str, x: f32, y: f32, font_size: f32) -> Option<CoverageMask> {
        let font = self.font.as_ref()?;
        let ratio = self.pixel_ratio;
        let size = font_size * ratio;

        let advance = font.advance_width(text, size);
        let origin_x = x * ratio - advance / 2.0;
        let baseline = y * ratio + font.ascent(size);

        let outlines = font.outline_line(text, size, origin_x, baseline);
        if outlines.is_empty() {
            return None;
        }

        let (min_x, min_y, max_x, max_y) = outlines.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(min_x, min_y, max_x, max_y), glyph| {
                let bounds = glyph.px_bounds();
                (
                    min_x.min(bounds.min.x),
                    min_y.min(bounds.min.y),
                    max_x.max(bounds.max.x),
                    max_y.max(bounds.max.y),
                )
            },
        );

        let mut mask = CoverageMask::new(
            min_x.floor() as i32,
            min_y.floor() as i32,
            (max_x.ceil() - min_x.floor()).max(0.0) as u32,
            (max_y.ceil() - min_y.floor()).max(0.0) as u32,
        );

        for glyph in &outlines {
            let bounds = glyph.px_bounds();
            let left = bounds.min.x as i32;
            let top = bounds.min.y as i32;
            glyph.draw(|gx, gy, coverage| {
                mask.accumulate(left + gx as i32, top + gy as i32, coverage);
            });
        }

        Some(mask)
    }

    /// Paint `mask` in `color`, casting the current shadow first.
    fn paint_with_shadow(&mut self, mask: &CoverageMask, color: Color) {
        if self.shadow.is_visible() {
            let ratio = self.pixel_ratio;
            let sigma = self.shadow.blur * ratio / 2.0;
            let shadow_mask = mask.blurred(sigma).translated(
                (self.shadow.offset_x * ratio).round() as i32,
                (self.shadow.offset_y * ratio).round() as i32,
            );
            paint_mask(&mut self.canvas, &shadow_mask, self.shadow.color);
        }
        paint_mask(&mut self.canvas, mask, color);
    }
}

impl PaintSurface for RasterSurface {
    fn width(&self) -> f32 {
        self.logical_width
    }

    fn height(&self) -> f32 {
        self.logical_height
    }

    fn clear(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, target: Rect, opacity: f32) {
        let ratio = self.pixel_ratio;
        let left = (target.x * ratio).round() as i64;
        let top = (target.y * ratio).round() as i64;
        let width = (target.width * ratio).round().max(0.0) as u32;
        let height = (target.height * ratio).round().max(0.0) as u32;

        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        let scaled = resize_rgba(image, width, height);
        blend_image(&mut self.canvas, &scaled, left, top, opacity);
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        match &self.font {
            Some(font) => font.advance_width(text, font_size),
            None => estimate_advance(text, font_size),
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        if let Some(mask) = self.text_mask(text, x, y, font_size) {
            self.paint_with_shadow(&mask, color);
        }
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
        if let Some(mask) = self.text_mask(text, x, y, font_size) {
            let outline = mask.dilated(line_width * self.pixel_ratio / 2.0);
            self.paint_with_shadow(&outline, color);
        }
    }

    fn stroke_dashed_rect(&mut self, rect: Rect, color: Color, line_width: f32, dash: [f32; 2]) {
        let ratio = self.pixel_ratio;
        let thickness = (line_width * ratio).round().max(1.0) as i64;
        let on = (dash[0] * ratio).max(1.0);
        let period = on + (dash[1] * ratio).max(0.0);

        let (x0, y0) = (rect.x * ratio, rect.y * ratio);
        let (x1, y1) = (rect.right() * ratio, rect.bottom() * ratio);
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];

        // The pattern continues around corners like a single path
        let mut travelled = 0.0f32;
        for edge in corners.windows(2) {
            let ((ax, ay), (bx, by)) = (edge[0], edge[1]);
            let length = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
            let steps = length.ceil() as u32;

            for step in 0..steps {
                let t = step as f32 / length;
                if (travelled + step as f32) % period < on {
                    let px = (ax + (bx - ax) * t).round() as i64;
                    let py = (ay + (by - ay) * t).round() as i64;
                    stamp(&mut self.canvas, px, py, thickness, color);
                }
            }
            travelled += length;
        }
    }

    fn shadow(&self) -> Shadow {
        self.shadow
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.shadow = shadow;
    }
}

/// Per-pixel coverage in `[0, 1]` over a device-pixel region.
#[derive(Debug, Clone, PartialEq)]
struct CoverageMask {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (lx, ly) = (x - self.left, y - self.top);
        if lx < 0 || ly < 0 || lx >= self.width as i32 || ly >= self.height as i32 {
            return None;
        }
        Some(ly as usize * self.width as usize + lx as usize)
    }

    /// Coverage at absolute device coordinates; zero outside the mask.
    fn sample(&self, x: i32, y: i32) -> f32 {
        self.index(x, y).map_or(0.0, |i| self.data[i])
    }

    fn accumulate(&mut self, x: i32, y: i32, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = (self.data[i] + coverage).min(1.0);
        }
    }

    /// Grow the shape by `radius` pixels with an anti-aliased edge.
    fn dilated(&self, radius: f32) -> CoverageMask {
        if radius <= 0.0 {
            return self.clone();
        }

        let reach = radius.ceil() as i32 + 1;
        let kernel: Vec<(i32, i32, f32)> = (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter_map(|(dx, dy)| {
                let distance = ((dx * dx + dy * dy) as f32).sqrt();
                let weight = (radius + 0.5 - distance).clamp(0.0, 1.0);
                (weight > 0.0).then_some((dx, dy, weight))
            })
            .collect();

        let grow = 2 * reach as u32;
        let mut out = CoverageMask::new(
            self.left - reach,
            self.top - reach,
            self.width + grow,
            self.height + grow,
        );

        for ly in 0..out.height as i32 {
            for lx in 0..out.width as i32 {
                let (x, y) = (out.left + lx, out.top + ly);
                let mut best = 0.0f32;
                for &(dx, dy, weight) in &kernel {
                    best = best.max(self.sample(x + dx, y + dy) * weight);
                    if best >= 1.0 {
                        break;
                    }
                }
                out.data[ly as usize * out.width as usize + lx as usize] = best;
            }
        }

        out
    }

    /// Gaussian blur with standard deviation `sigma`, grown to fit the falloff.
    fn blurred(&self, sigma: f32) -> CoverageMask {
        if sigma <= 0.0 || self.width == 0 || self.height == 0 {
            return self.clone();
        }

        let reach = (sigma * 3.0).ceil() as i32;
        let grow = 2 * reach as u32;
        let mut padded = CoverageMask::new(
            self.left - reach,
            self.top - reach,
            self.width + grow,
            self.height + grow,
        );
        for ly in 0..self.height as i32 {
            for lx in 0..self.width as i32 {
                let (x, y) = (self.left + lx, self.top + ly);
                if let Some(i) = padded.index(x, y) {
                    padded.data[i] = self.sample(x, y);
                }
            }
        }

        let Some(buffer) =
            ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(padded.width, padded.height, padded.data.clone())
        else {
            return padded;
        };
        padded.data = imageops::blur(&buffer, sigma).into_raw();
        padded
    }

    fn translated(mut self, dx: i32, dy: i32) -> CoverageMask {
        self.left += dx;
        self.top += dy;
        self
    }
}

/// Composite `color` through `mask` onto `canvas`.
fn paint_mask(canvas: &mut RgbaImage, mask: &CoverageMask, color: Color) {
    let (canvas_width, canvas_height) = (canvas.width() as i32, canvas.height() as i32);
    let x_start = mask.left.max(0);
    let y_start = mask.top.max(0);
    let x_end = (mask.left + mask.width as i32).min(canvas_width);
    let y_end = (mask.top + mask.height as i32).min(canvas_height);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let coverage = mask.sample(x, y);
            if coverage <= 0.0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            *pixel = blend_pixel(*pixel, Rgba([color.r, color.g, color.b, 255]), color.alpha * coverage);
        }
    }
}

/// Fill a `size` x `size` square centered on `(x, y)`.
fn stamp(canvas: &mut RgbaImage, x: i64, y: i64, size: i64, color: Color) {
    let half = size / 2;
    let fill = Rgba([color.r, color.g, color.b, 255]);
    for py in (y - half)..(y - half + size) {
        for px in (x - half)..(x - half + size) {
            if px < 0 || py < 0 || px >= canvas.width() as i64 || py >= canvas.height() as i64 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            *pixel = blend_pixel(*pixel, fill, color.alpha);
        }
    }
}

/// Blend `source` onto `target` with its top-left corner at `(left, top)`.
fn blend_image(target: &mut RgbaImage, source: &RgbaImage, left: i64, top: i64, opacity: f32) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    // Visible region, clamped to target bounds
    let x_start = left.max(0);
    let y_start = top.max(0);
    let x_end = (left + source.width() as i64).min(target_width);
    let y_end = (top + source.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let foreground = *source.get_pixel((tx - left) as u32, (ty - top) as u32);
            let pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *pixel = blend_pixel(*pixel, foreground, opacity);
        }
    }
}

/// Porter-Duff "over" of `foreground` onto `background`, with extra opacity.
pub fn blend_pixel(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Scale `image` to exactly `width` x `height`.
///
/// Uses Lanczos3 through `fast_image_resize` on premultiplied alpha, so the
/// color of fully transparent pixels never bleeds into opaque edges. Falls
/// back to the `image` crate's resampler if that fails.
pub fn resize_rgba(image: &RgbaImage, width: u32, height: u32) -> Cow<'_, RgbaImage> {
    if image.dimensions() == (width, height) {
        return Cow::Borrowed(image);
    }

    match fast_resize(image, width, height) {
        Ok(resized) => Cow::Owned(resized),
        Err(e) => {
            warn!(error = %e, "Fast resize failed, using fallback resampler");
            Cow::Owned(imageops::resize(
                image,
                width,
                height,
                imageops::FilterType::Lanczos3,
            ))
        }
    }
}

fn fast_resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, String> {
    let src_width = NonZeroU32::new(image.width()).ok_or("Source width is 0")?;
    let src_height = NonZeroU32::new(image.height()).ok_or("Source height is 0")?;
    let dst_width = NonZeroU32::new(width).ok_or("Target width is 0")?;
    let dst_height = NonZeroU32::new(height).ok_or("Target height is 0")?;

    let mut src_image = Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| format!("Failed to create source image: {e:?}"))?;

    let mul_div = MulDiv::default();
    mul_div
        .multiply_alpha_inplace(&mut src_image.view_mut())
        .map_err(|e| format!("Failed to premultiply alpha: {e:?}"))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);
    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| format!("Resize operation failed: {e:?}"))?;

    mul_div
        .divide_alpha_inplace(&mut dst_image.view_mut())
        .map_err(|e| format!("Failed to unpremultiply alpha: {e:?}"))?;

    RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| "Failed to create output image buffer".to_string())
}

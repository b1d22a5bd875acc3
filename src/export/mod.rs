//! Export pipeline.
//!
//! Export re-runs the composition pipeline without interactive affordances.
//! The export canvas is the contained image rectangle of the configured
//! export base size, so the result carries no letterbox margins, and it is
//! multiplied by the device pixel ratio for crisp output.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::RgbaImage;
use std::io::Cursor;
use thiserror::Error;
use tracing::info;

use crate::config::CanvasConfig;
use crate::constants::EXPORT_MIME_TYPE;
use crate::render::{compute_contain, render, RasterSurface, RenderOptions, RenderOutcome, RenderTicket, Scene};
use crate::resources::CaptionFont;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export render was superseded")]
    Superseded,
}

/// Logical export canvas size for a `width` x `height` template.
///
/// The template contained in the `base_width` x `base_height` box, rounded to
/// whole pixels and never smaller than 1x1.
pub fn export_canvas_size(width: u32, height: u32, base_width: u32, base_height: u32) -> (u32, u32) {
    let rect = compute_contain(
        width as f32,
        height as f32,
        base_width as f32,
        base_height as f32,
    );
    (
        rect.draw_width.round().max(1.0) as u32,
        rect.draw_height.round().max(1.0) as u32,
    )
}

/// Render `scene` at export resolution.
pub fn render_export(
    scene: &Scene<'_>,
    canvas: &CanvasConfig,
    font: Option<CaptionFont>,
    ticket: &RenderTicket,
) -> Result<RgbaImage, ExportError> {
    let (width, height) = export_canvas_size(
        scene.image.width(),
        scene.image.height(),
        canvas.export_width,
        canvas.export_height,
    );

    let mut surface = RasterSurface::new(width, height, canvas.device_pixel_ratio, font);
    match render(&mut surface, scene, RenderOptions::export(), ticket) {
        RenderOutcome::Completed(_) => {
            let image = surface.into_image();
            info!(
                width = image.width(),
                height = image.height(),
                "Export rendered"
            );
            Ok(image)
        }
        RenderOutcome::Superseded => Err(ExportError::Superseded),
    }
}

/// Encode an RGBA raster as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder as _;

    let mut output = Cursor::new(Vec::new());
    PngEncoder::new(&mut output)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ColorType::Rgba8,
        )
        .map_err(|e| ExportError::Encode(e.to_string()))?;

    Ok(output.into_inner())
}

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:{};base64,{}", EXPORT_MIME_TYPE, STANDARD.encode(png))
}

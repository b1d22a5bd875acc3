//! Stateful meme editor.
//!
//! [`MemeEditor`] owns the user inputs (template, caption, watermark, style),
//! the drag controller and the render generation. Every input change bumps
//! the generation, so a preview started before the change is discarded
//! instead of overwriting a newer one.
//!
//! Preview rendering is split in three steps so a host can run the slow part
//! off its input loop:
//!
//! 1. [`MemeEditor::prepare_preview`] snapshots the inputs into a
//!    [`PreviewJob`] tied to the current generation
//! 2. [`PreviewJob::run`] loads resources and rasterizes
//! 3. [`MemeEditor::apply_preview`] stores the result if it is still current
//!
//! [`MemeEditor::render_preview`] does all three in sequence.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{FontConfig, MemeConfig};
use crate::constants::DEFAULT_EXPORT_FILE_NAME;
use crate::error::{MemeError, Result};
use crate::export::{self, ExportError};
use crate::interaction::{CursorHint, DragContext, PointerResponse, PositionController};
use crate::render::{
    render, CanvasRect, CaptionPosition, CaptionStyle, FontScale, PaintOp, PaintRecorder,
    RasterSurface, RenderGeneration, RenderOptions, RenderOutcome, RenderTicket, Scene,
    TextEffect,
};
use crate::resources::{
    font, load_scene_resources, CaptionFont, ImageFetcher, ResourceError, ResourceLoader,
    SceneResources,
};

/// Callback invoked with every caption position produced by a drag.
pub type PositionListener = Box<dyn FnMut(CaptionPosition) + Send>;

/// Where the caption face comes from.
#[derive(Debug, Clone)]
enum FontSource {
    /// Process-wide face loaded once from config
    Process(FontConfig),
    /// Face chosen by the caller; `None` forces estimated metrics
    Fixed(Option<CaptionFont>),
}

impl FontSource {
    async fn resolve(&self) -> Option<CaptionFont> {
        match self {
            FontSource::Process(config) => font::ensure_loaded(config).await.font.clone(),
            FontSource::Fixed(font) => font.clone(),
        }
    }
}

/// Last successfully rendered preview.
#[derive(Debug, Clone)]
pub struct Preview {
    /// Device-pixel raster of the preview canvas
    pub image: RgbaImage,
    /// Image rectangle in logical preview coordinates
    pub rect: CanvasRect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewStatus {
    Rendered,
    /// A newer input change arrived first; the previous preview is kept
    Superseded,
    /// No template image selected; nothing was drawn
    NoImage,
    /// Resource loading failed; the previous preview is kept
    Failed(ResourceError),
}

#[derive(Debug)]
enum PreviewOutcome {
    Rendered(Preview),
    Superseded,
    Failed(ResourceError),
}

/// Result of [`PreviewJob::run`], to be handed back to [`MemeEditor::apply_preview`].
#[derive(Debug)]
pub struct PreviewResult {
    ticket: RenderTicket,
    outcome: PreviewOutcome,
}

impl PreviewResult {
    fn superseded(ticket: RenderTicket) -> Self {
        Self {
            ticket,
            outcome: PreviewOutcome::Superseded,
        }
    }
}

/// Snapshot of the editor inputs for one preview pass.
pub struct PreviewJob<L: ResourceLoader + ?Sized> {
    loader: Arc<L>,
    ticket: RenderTicket,
    image_ref: String,
    watermark_ref: Option<String>,
    caption: String,
    style: CaptionStyle,
    width: u32,
    height: u32,
    pixel_ratio: f32,
    font: FontSource,
}

impl<L: ResourceLoader + ?Sized> PreviewJob<L> {
    pub fn generation(&self) -> u64 {
        self.ticket.generation()
    }

    /// Load resources and rasterize the preview.
    pub async fn run(self) -> PreviewResult {
        if !self.ticket.is_current() {
            return PreviewResult::superseded(self.ticket);
        }

        let resources = match load_scene_resources(
            &*self.loader,
            &self.image_ref,
            self.watermark_ref.as_deref(),
        )
        .await
        {
            Ok(resources) => resources,
            Err(e) => {
                return PreviewResult {
                    ticket: self.ticket,
                    outcome: PreviewOutcome::Failed(e),
                }
            }
        };

        if !self.ticket.is_current() {
            return PreviewResult::superseded(self.ticket);
        }

        let font = self.font.resolve().await;
        let mut surface = RasterSurface::new(self.width, self.height, self.pixel_ratio, font);
        let scene = scene_for(&resources, &self.caption, self.style);

        let outcome = match render(&mut surface, &scene, RenderOptions::preview(), &self.ticket) {
            RenderOutcome::Completed(rect) => PreviewOutcome::Rendered(Preview {
                image: surface.into_image(),
                rect,
            }),
            RenderOutcome::Superseded => PreviewOutcome::Superseded,
        };

        PreviewResult {
            ticket: self.ticket,
            outcome,
        }
    }
}

fn scene_for<'a>(resources: &'a SceneResources, caption: &'a str, style: CaptionStyle) -> Scene<'a> {
    Scene::new(&resources.image)
        .with_caption(caption)
        .with_watermark(resources.watermark.as_deref())
        .with_style(style)
}

/// Interactive meme editor over a [`ResourceLoader`].
pub struct MemeEditor<L: ResourceLoader + ?Sized = ImageFetcher> {
    config: MemeConfig,
    loader: Arc<L>,
    font: FontSource,
    image_ref: Option<String>,
    watermark_ref: Option<String>,
    caption: String,
    style: CaptionStyle,
    controller: PositionController,
    listener: Option<PositionListener>,
    generation: RenderGeneration,
    preview: Option<Preview>,
}

impl MemeEditor<ImageFetcher> {
    /// Editor fetching images over http(s), data URLs and the filesystem.
    pub fn from_config(config: MemeConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ImageFetcher::new(&config.fetcher)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }
}

impl<L: ResourceLoader + ?Sized> MemeEditor<L> {
    pub fn new(loader: Arc<L>, config: MemeConfig) -> Self {
        Self {
            font: FontSource::Process(config.font.clone()),
            watermark_ref: config.watermark.clone(),
            style: config.style.to_caption_style(),
            config,
            loader,
            image_ref: None,
            caption: String::new(),
            controller: PositionController::new(),
            listener: None,
            generation: RenderGeneration::new(),
            preview: None,
        }
    }

    /// Use `font` instead of the process-wide face. `None` forces estimated metrics.
    pub fn with_font(mut self, font: Option<CaptionFont>) -> Self {
        self.font = FontSource::Fixed(font);
        self
    }

    pub fn config(&self) -> &MemeConfig {
        &self.config
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn watermark_ref(&self) -> Option<&str> {
        self.watermark_ref.as_deref()
    }

    pub fn style(&self) -> CaptionStyle {
        self.style
    }

    pub fn position(&self) -> CaptionPosition {
        self.style.position
    }

    pub fn effect(&self) -> TextEffect {
        self.style.effect
    }

    pub fn font_scale(&self) -> FontScale {
        self.style.font_scale
    }

    /// Generation a preview must carry to be accepted.
    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    fn changed(&mut self) {
        self.generation.invalidate();
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
        self.changed();
    }

    /// Select a template by reference (URL, data URL or path). `None` clears it.
    pub fn set_image(&mut self, reference: Option<String>) {
        self.image_ref = reference;
        self.changed();
    }

    pub fn set_watermark(&mut self, reference: Option<String>) {
        self.watermark_ref = reference;
        self.changed();
    }

    /// Check or uncheck one effect; at most one effect is active.
    pub fn toggle_effect(&mut self, effect: TextEffect, checked: bool) {
        self.style.effect = self.style.effect.toggled(effect, checked);
        self.changed();
    }

    /// Set the scale as reported by the size slider.
    pub fn set_font_scale(&mut self, value: f32) {
        self.style.font_scale = FontScale::from_slider(value);
        self.changed();
    }

    pub fn set_position(&mut self, position: CaptionPosition) {
        self.style.position = position;
        self.changed();
    }

    pub fn set_style(&mut self, style: CaptionStyle) {
        self.style = style;
        self.changed();
    }

    /// Back to no effect, scale 1 and the default anchor.
    pub fn reset_style(&mut self) {
        self.style = CaptionStyle::default();
        self.changed();
    }

    /// Register the callback notified on every drag update.
    pub fn on_position_change<F>(&mut self, listener: F)
    where
        F: FnMut(CaptionPosition) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Image rectangle in logical preview coordinates, empty before the first preview.
    pub fn canvas_rect(&self) -> CanvasRect {
        self.preview
            .as_ref()
            .map(|preview| preview.rect)
            .unwrap_or_default()
    }

    fn drag_context(&self) -> DragContext {
        DragContext {
            rect: self.canvas_rect(),
            position: self.style.position,
            font_scale: self.style.font_scale,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> CursorHint {
        let context = self.drag_context();
        let response = self.controller.pointer_down(&context, x, y);
        self.apply_pointer(response)
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> CursorHint {
        let context = self.drag_context();
        let response = self.controller.pointer_move(&context, x, y);
        self.apply_pointer(response)
    }

    pub fn pointer_up(&mut self) -> CursorHint {
        let response = self.controller.pointer_up();
        self.apply_pointer(response)
    }

    pub fn pointer_leave(&mut self) -> CursorHint {
        let response = self.controller.pointer_leave();
        self.apply_pointer(response)
    }

    fn apply_pointer(&mut self, response: PointerResponse) -> CursorHint {
        if let Some(position) = response.position {
            self.set_position(position);
            if let Some(listener) = self.listener.as_mut() {
                listener(position);
            }
        }
        response.cursor
    }

    /// Snapshot the inputs for a preview pass. `None` when no image is selected.
    pub fn prepare_preview(&self) -> Option<PreviewJob<L>> {
        let image_ref = self.image_ref.clone()?;
        let canvas = &self.config.canvas;
        Some(PreviewJob {
            loader: Arc::clone(&self.loader),
            ticket: self.generation.begin(),
            image_ref,
            watermark_ref: self.watermark_ref.clone(),
            caption: self.caption.clone(),
            style: self.style,
            width: canvas.preview_width,
            height: canvas.preview_height,
            pixel_ratio: canvas.device_pixel_ratio,
            font: self.font.clone(),
        })
    }

    /// Accept `result` if no input changed since its job was prepared.
    pub fn apply_preview(&mut self, result: PreviewResult) -> PreviewStatus {
        let PreviewResult { ticket, outcome } = result;
        match outcome {
            _ if !ticket.is_current() => {
                debug!(generation = ticket.generation(), "Discarding superseded preview");
                PreviewStatus::Superseded
            }
            PreviewOutcome::Superseded => PreviewStatus::Superseded,
            PreviewOutcome::Rendered(preview) => {
                let rect = preview.rect;
                debug!(
                    generation = ticket.generation(),
                    draw_width = rect.draw_width,
                    draw_height = rect.draw_height,
                    "Preview rendered"
                );
                self.preview = Some(preview);
                PreviewStatus::Rendered
            }
            PreviewOutcome::Failed(e) => {
                warn!(error = %e, "Preview resources failed to load; keeping previous preview");
                PreviewStatus::Failed(e)
            }
        }
    }

    /// Prepare, run and apply a preview pass.
    pub async fn render_preview(&mut self) -> PreviewStatus {
        match self.prepare_preview() {
            Some(job) => {
                let result = job.run().await;
                self.apply_preview(result)
            }
            None => PreviewStatus::NoImage,
        }
    }

    /// Last accepted preview.
    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn preview_png(&self) -> std::result::Result<Option<Vec<u8>>, ExportError> {
        self.preview
            .as_ref()
            .map(|preview| export::encode_png(&preview.image))
            .transpose()
    }

    async fn load_current(&self) -> Result<SceneResources> {
        let image_ref = self.image_ref.as_deref().ok_or(MemeError::NoImage)?;
        let resources =
            load_scene_resources(&*self.loader, image_ref, self.watermark_ref.as_deref())
                .await?;
        Ok(resources)
    }

    /// Paint operations of a preview pass, without rasterizing.
    pub async fn plan(&self, options: RenderOptions) -> Result<Vec<PaintOp>> {
        let resources = self.load_current().await?;
        let canvas = &self.config.canvas;
        let mut recorder = PaintRecorder::with_font(
            canvas.preview_width as f32,
            canvas.preview_height as f32,
            self.font.resolve().await,
        );
        let scene = scene_for(&resources, &self.caption, self.style);
        render(&mut recorder, &scene, options, &RenderTicket::detached());
        Ok(recorder.into_ops())
    }

    /// Render the current inputs at export resolution.
    pub async fn export_image(&self) -> Result<RgbaImage> {
        let resources = self.load_current().await?;
        let font = self.font.resolve().await;
        let scene = scene_for(&resources, &self.caption, self.style);
        let image =
            export::render_export(&scene, &self.config.canvas, font, &RenderTicket::detached())?;
        Ok(image)
    }

    pub async fn export_png(&self) -> Result<Vec<u8>> {
        let image = self.export_image().await?;
        Ok(export::encode_png(&image)?)
    }

    /// PNG export as a `data:image/png;base64,` URL.
    pub async fn export_data_url(&self) -> Result<String> {
        let png = self.export_png().await?;
        Ok(export::to_data_url(&png))
    }

    /// Write the PNG export to `path`. A directory receives `my-meme.png`.
    pub async fn export_to_file(&self, path: &Path) -> Result<PathBuf> {
        let target = if tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            path.join(DEFAULT_EXPORT_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        let png = self.export_png().await?;
        tokio::fs::write(&target, &png)
            .await
            .map_err(ExportError::from)?;

        info!(path = %target.display(), bytes = png.len(), "Meme exported");
        Ok(target)
    }
}

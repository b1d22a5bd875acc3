//! Caption font loading.
//!
//! The caption face is loaded once per process and shared by every render
//! pass. Loading tries the configured face first, then each fallback path.
//! When no face can be read the process keeps going: text is measured with
//! an average-advance estimate and glyphs are skipped.
//!
//! Line wrapping depends on the final metrics, so callers must finish
//! [`init`] or [`ensure_loaded`] before their first measurement.

use ab_glyph::{point, Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

use super::ResourceError;
use crate::config::FontConfig;
use crate::constants::FALLBACK_ADVANCE_RATIO;

static FONT_STATE: OnceLock<FontState> = OnceLock::new();

/// Parsed caption typeface.
#[derive(Clone)]
pub struct CaptionFont {
    font: FontArc,
    source: String,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("source", &self.source)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl CaptionFont {
    pub fn from_bytes(data: Vec<u8>, source: impl Into<String>) -> Result<Self, ResourceError> {
        let source = source.into();
        let font = FontArc::try_from_vec(data)
            .map_err(|e| ResourceError::Font(format!("{source}: {e}")))?;
        Ok(Self { font, source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ResourceError> {
        let data = std::fs::read(path)
            .map_err(|e| ResourceError::Font(format!("{}: {e}", path.display())))?;
        Self::from_bytes(data, path.display().to_string())
    }

    /// Where the face was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Advance width of `text` at `font_size` pixels, kerning included.
    pub fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(font_size));

        let mut width = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;
        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
        width
    }

    /// Distance from the top of the em box to the baseline.
    pub fn ascent(&self, font_size: f32) -> f32 {
        self.font.as_scaled(PxScale::from(font_size)).ascent()
    }

    /// Outlines of `text` laid out on one line starting at `origin_x`.
    ///
    /// Whitespace and glyphs missing from the face yield no outline.
    pub fn outline_line(
        &self,
        text: &str,
        font_size: f32,
        origin_x: f32,
        baseline_y: f32,
    ) -> Vec<OutlinedGlyph> {
        let scale = PxScale::from(font_size);
        let scaled = self.font.as_scaled(scale);

        let mut outlines = Vec::new();
        let mut cursor_x = origin_x;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }

            let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                outlines.push(outlined);
            }

            cursor_x += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        outlines
    }
}

/// Which face the process ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    /// The configured face.
    Primary,
    /// One of the fallback faces.
    Fallback,
    /// No face could be loaded; metrics are estimated.
    Unavailable,
}

/// Outcome of loading the caption font.
#[derive(Debug, Clone)]
pub struct FontState {
    pub font: Option<CaptionFont>,
    pub status: FontStatus,
}

impl FontState {
    /// Try each candidate in `config` in order. Never fails.
    pub fn load(config: &FontConfig) -> Self {
        for (path, primary) in config.candidates() {
            match CaptionFont::from_file(path) {
                Ok(font) => {
                    let status = if primary {
                        FontStatus::Primary
                    } else {
                        FontStatus::Fallback
                    };
                    info!(source = font.source(), ?status, "Caption font loaded");
                    return Self {
                        font: Some(font),
                        status,
                    };
                }
                Err(e) if primary => warn!(error = %e, "Caption font unavailable, trying fallbacks"),
                Err(_) => {}
            }
        }

        warn!("No caption font could be loaded; using estimated metrics");
        Self {
            font: None,
            status: FontStatus::Unavailable,
        }
    }
}

/// Load the process-wide caption font if that has not happened yet.
///
/// Only the first call's config is used; later calls return the same state.
pub fn init(config: &FontConfig) -> &'static FontState {
    FONT_STATE.get_or_init(|| FontState::load(config))
}

/// Process-wide font state, if [`init`] has run.
pub fn current() -> Option<&'static FontState> {
    FONT_STATE.get()
}

/// Async variant of [`init`] that reads font files off the async workers.
pub async fn ensure_loaded(config: &FontConfig) -> &'static FontState {
    if let Some(state) = FONT_STATE.get() {
        return state;
    }

    let owned = config.clone();
    match tokio::task::spawn_blocking(move || init(&owned)).await {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "Font loading task failed; loading inline");
            init(config)
        }
    }
}

/// Width estimate used when no face is available.
pub fn estimate_advance(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * FALLBACK_ADVANCE_RATIO
}

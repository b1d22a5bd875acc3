// Constants module - centralized default values and composition ratios
//
// Every ratio here is relative to the contained image rectangle, so preview
// and export canvases of different sizes produce the same composition.

// =============================================================================
// Canvas defaults
// =============================================================================

/// Default interactive preview canvas width in logical pixels
pub const DEFAULT_PREVIEW_WIDTH: u32 = 700;

/// Default interactive preview canvas height in logical pixels
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 700;

/// Default export base width; the export canvas is the image contained in this box
pub const DEFAULT_EXPORT_WIDTH: u32 = 700;

/// Default export base height
pub const DEFAULT_EXPORT_HEIGHT: u32 = 700;

/// Default device pixel ratio applied to both canvases
pub const DEFAULT_DEVICE_PIXEL_RATIO: f32 = 1.0;

// =============================================================================
// Caption layout
// =============================================================================

/// Base font size as a fraction of the contained image height
pub const BASE_FONT_RATIO: f32 = 0.08;

/// Maximum caption line width as a fraction of the contained image width
pub const WRAP_WIDTH_RATIO: f32 = 0.9;

/// Horizontal bounding box padding as a fraction of the font size
pub const BOX_PADDING_X_RATIO: f32 = 0.4;

/// Vertical bounding box padding as a fraction of the font size
pub const BOX_PADDING_Y_RATIO: f32 = 0.3;

/// Dash pattern (on, off) of the preview bounding box outline
pub const BOUNDING_BOX_DASH: [f32; 2] = [6.0, 4.0];

/// Line width of the preview bounding box outline
pub const BOUNDING_BOX_LINE_WIDTH: f32 = 1.0;

/// Average glyph advance used when no font face could be loaded
pub const FALLBACK_ADVANCE_RATIO: f32 = 0.5;

// =============================================================================
// Text effects
// =============================================================================

/// Outline width as a fraction of the font size
pub const STROKE_WIDTH_RATIO: f32 = 0.15;

/// Minimum outline width in pixels
pub const MIN_STROKE_WIDTH: f32 = 4.0;

// =============================================================================
// Watermark
// =============================================================================

/// Watermark width as a fraction of the contained image width
pub const WATERMARK_WIDTH_RATIO: f32 = 0.15;

/// Inset from the bottom-right corner as a fraction of the contained image width
pub const WATERMARK_PADDING_RATIO: f32 = 0.03;

/// Opacity the watermark is painted with
pub const WATERMARK_OPACITY: f32 = 0.9;

// =============================================================================
// Interaction
// =============================================================================

/// Radius around the caption hot spot that counts as a hit, in canvas pixels
pub const HIT_RADIUS_PX: f32 = 300.0;

/// Number of lines assumed when estimating the caption block height
pub const ESTIMATED_CAPTION_LINES: f32 = 3.0;

// =============================================================================
// Style defaults
// =============================================================================

/// Smallest font scale the slider allows
pub const MIN_FONT_SCALE: f32 = 0.5;

/// Largest font scale the slider allows
pub const MAX_FONT_SCALE: f32 = 2.0;

/// Slider step for the font scale
pub const FONT_SCALE_STEP: f32 = 0.05;

/// Default font scale
pub const DEFAULT_FONT_SCALE: f32 = 1.0;

/// Default caption anchor, horizontal fraction of the image width
pub const DEFAULT_CAPTION_X: f32 = 0.5;

/// Default caption anchor, vertical fraction of the image height
pub const DEFAULT_CAPTION_Y: f32 = 0.6;

// =============================================================================
// Resource fetching
// =============================================================================

/// Default maximum number of decoded images kept in memory
pub const DEFAULT_MAX_CACHE_ENTRIES: u64 = 100;

/// Default TTL of cached images in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default HTTP fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Export
// =============================================================================

/// File name used when the caller does not choose one
pub const DEFAULT_EXPORT_FILE_NAME: &str = "my-meme.png";

/// MIME type of exported images
pub const EXPORT_MIME_TYPE: &str = "image/png";

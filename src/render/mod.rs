//! Caption compositing engine.
//!
//! This module renders a caption and watermark over a template image. It is
//! split leaf-first:
//!
//! - [`geometry`]: contain fit of the image and normalized caption anchors
//! - [`layout`]: greedy word wrap and the caption bounding box
//! - [`effects`]: the four mutually exclusive text paint styles
//! - [`compose`]: the fixed-order pipeline shared by preview and export
//! - [`surface`], [`raster`], [`recorder`]: paint targets
//! - [`generation`]: superseded-render guard
//!
//! # Example
//!
//! ```
//! use image::RgbaImage;
//! use memekit::render::{render, RasterSurface, RenderOptions, RenderTicket, Scene};
//!
//! let template = RgbaImage::new(1000, 500);
//! let scene = Scene::new(&template).with_caption("such caption");
//!
//! let mut surface = RasterSurface::new(700, 700, 1.0, None);
//! let outcome = render(&mut surface, &scene, RenderOptions::export(), &RenderTicket::detached());
//! assert!(outcome.is_completed());
//! assert_eq!(surface.image().dimensions(), (700, 700));
//! ```

pub mod compose;
pub mod effects;
pub mod generation;
pub mod geometry;
pub mod layout;
pub mod raster;
pub mod recorder;
pub mod style;
pub mod surface;

pub use compose::{render, RenderOptions, RenderOutcome, Scene};
pub use effects::TextEffect;
pub use generation::{RenderGeneration, RenderTicket};
pub use geometry::{compute_contain, CanvasRect, CaptionPosition, Rect};
pub use layout::{wrap_text, LineLayout};
pub use raster::RasterSurface;
pub use recorder::{PaintOp, PaintRecorder};
pub use style::{CaptionStyle, FontScale};
pub use surface::{Color, PaintSurface, Shadow, ShadowScope};

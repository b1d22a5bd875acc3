//! Image and font resources.
//!
//! # Features
//!
//! - Template and watermark images from http(s) URLs, data URLs and local files
//! - Decoded-image cache with LRU eviction and TTL
//! - Concurrent loading of the template image and watermark
//! - Process-wide caption font with graceful fallback
//!
//! Every failure here is recoverable; see [`ResourceError`].

pub mod error;
pub mod font;
pub mod image_fetcher;
pub mod loader;

pub use error::ResourceError;
pub use font::{CaptionFont, FontState, FontStatus};
pub use image_fetcher::{CachedImage, ImageFetcher, ImageSource};
pub use loader::{load_scene_resources, ResourceLoader, SceneResources, StaticLoader};

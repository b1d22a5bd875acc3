//! Template and watermark image fetcher with caching.
//!
//! This module loads images from URLs, data URLs and the local filesystem,
//! decodes them to RGBA and caches the decoded result in memory.
//!
//! # Supported Sources
//!
//! - `https://example.com/image.png` or `http://...` - fetched over HTTP
//! - `data:image/png;base64,...` - decoded inline
//! - `file:///path/to/image.png` or a plain path - read from disk
//!
//! # Caching
//!
//! Decoded images are cached keyed by source. The cache uses LRU eviction
//! with a configurable TTL. Data URLs are decoded on every call since the
//! reference already carries the bytes.
//!
//! # Example
//!
//! ```ignore
//! use memekit::config::FetcherConfig;
//! use memekit::resources::ImageFetcher;
//!
//! let fetcher = ImageFetcher::new(&FetcherConfig::default())?;
//! let template = fetcher.fetch("https://example.com/doge.jpg").await?;
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use moka::future::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::ResourceError;
use crate::config::FetcherConfig;

/// Parsed location of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `http://` or `https://` URL.
    Http(String),
    /// Complete `data:` URL.
    Data(String),
    /// Local file.
    File(PathBuf),
}

impl ImageSource {
    /// Parse a reference into an ImageSource.
    ///
    /// Anything without a scheme is treated as a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedSource`] for empty references and
    /// unknown schemes.
    pub fn parse(source: &str) -> Result<Self, ResourceError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ResourceError::UnsupportedSource(
                "empty image reference".to_string(),
            ));
        }

        if source.starts_with("https://") || source.starts_with("http://") {
            Ok(ImageSource::Http(source.to_string()))
        } else if source.starts_with("data:") {
            Ok(ImageSource::Data(source.to_string()))
        } else if let Some(path) = source.strip_prefix("file://") {
            if path.is_empty() {
                return Err(ResourceError::UnsupportedSource(source.to_string()));
            }
            Ok(ImageSource::File(PathBuf::from(path)))
        } else if source.contains("://") {
            Err(ResourceError::UnsupportedSource(format!(
                "{source}. Use http(s)://, data: or file://"
            )))
        } else {
            Ok(ImageSource::File(PathBuf::from(source)))
        }
    }

    /// Cache key for this source, or `None` when it should not be cached.
    pub fn cache_key(&self) -> Option<String> {
        match self {
            ImageSource::Http(url) => Some(url.clone()),
            ImageSource::Data(_) => None,
            ImageSource::File(path) => Some(format!("file://{}", path.display())),
        }
    }
}

/// Decoded image shared between the cache and render passes.
#[derive(Clone)]
pub struct CachedImage {
    pub image: Arc<RgbaImage>,
}

impl std::fmt::Debug for CachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedImage")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .finish()
    }
}

impl CachedImage {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }
}

/// Image loader with built-in caching.
#[derive(Clone)]
pub struct ImageFetcher {
    cache: Cache<String, CachedImage>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl ImageFetcher {
    /// Create a new image fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::Config` if the HTTP client cannot be created.
    pub fn new(config: &FetcherConfig) -> Result<Self, ResourceError> {
        let cache = Cache::builder()
            .max_capacity(config.max_cache_entries)
            .time_to_live(config.cache_ttl())
            .build();

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ResourceError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { cache, http_client })
    }

    /// Load and decode an image.
    ///
    /// Cacheable sources are served from memory after the first successful
    /// load until their TTL expires. Failed loads are not cached.
    pub async fn fetch(&self, source: &str) -> Result<CachedImage, ResourceError> {
        let parsed = ImageSource::parse(source)?;
        let cache_key = parsed.cache_key();

        if let Some(key) = &cache_key {
            if let Some(cached) = self.cache.get(key).await {
                debug!(source = %key, "Image cache hit");
                return Ok(cached);
            }
        }

        let image = match &parsed {
            ImageSource::Http(url) => self.fetch_from_http(url).await?,
            ImageSource::Data(url) => decode_data_url(url)?,
            ImageSource::File(path) => fetch_from_file(path).await?,
        };

        info!(
            width = image.width(),
            height = image.height(),
            cached = cache_key.is_some(),
            "Image loaded"
        );

        let cached = CachedImage::new(image);
        if let Some(key) = cache_key {
            self.cache.insert(key, cached.clone()).await;
        }

        Ok(cached)
    }

    async fn fetch_from_http(&self, url: &str) -> Result<RgbaImage, ResourceError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ResourceError::Fetch(format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ResourceError::Fetch(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResourceError::Fetch(format!("Failed to read HTTP body: {e}")))?;

        let format = detect_image_format(&bytes, url)?;
        decode_image(&bytes, format)
    }

    /// Number of cached images.
    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Clear all cached images.
    pub async fn clear_cache(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    /// Check if an image is cached.
    pub async fn is_cached(&self, source: &str) -> bool {
        match ImageSource::parse(source).map(|parsed| parsed.cache_key()) {
            Ok(Some(key)) => self.cache.get(&key).await.is_some(),
            _ => false,
        }
    }
}

async fn fetch_from_file(path: &Path) -> Result<RgbaImage, ResourceError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| ResourceError::Fetch(format!("Failed to read {}: {e}", path.display())))?;

    let format = detect_image_format(&data, &path.to_string_lossy())?;
    decode_image(&data, format)
}

/// Decode a base64 `data:` URL into an RGBA image.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, ResourceError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ResourceError::UnsupportedSource("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResourceError::Fetch("data URL has no payload".to_string()))?;

    let mime = meta.strip_suffix(";base64").ok_or_else(|| {
        ResourceError::Fetch("only base64-encoded data URLs are supported".to_string())
    })?;

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| ResourceError::Fetch(format!("Invalid base64 payload: {e}")))?;

    let format = match image::guess_format(&data) {
        Ok(format) => format,
        Err(_) => ImageFormat::from_mime_type(mime)
            .ok_or_else(|| ResourceError::Decode(format!("Unsupported image type: {mime}")))?,
    };
    decode_image(&data, format)
}

fn decode_image(data: &[u8], format: ImageFormat) -> Result<RgbaImage, ResourceError> {
    image::load_from_memory_with_format(data, format)
        .map(|image| image.to_rgba8())
        .map_err(|e| ResourceError::Decode(e.to_string()))
}

/// Detect image format from bytes or filename extension.
pub fn detect_image_format(data: &[u8], path: &str) -> Result<ImageFormat, ResourceError> {
    if let Ok(format) = image::guess_format(data) {
        return Ok(format);
    }

    // Ignore query strings when falling back to the extension
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let ext = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "gif" => Ok(ImageFormat::Gif),
        "webp" => Ok(ImageFormat::WebP),
        _ => Err(ResourceError::Decode(format!(
            "Unsupported image format: {ext}"
        ))),
    }
}

//! Loading seam between the editor and image sources.
//!
//! The editor never fetches directly; it goes through [`ResourceLoader`],
//! implemented by [`ImageFetcher`] for real sources and by [`StaticLoader`]
//! for images already in memory.

use async_trait::async_trait;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::image_fetcher::ImageFetcher;
use super::ResourceError;

#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Load and decode the image behind `reference`.
    async fn load_image(&self, reference: &str) -> Result<Arc<RgbaImage>, ResourceError>;
}

#[async_trait]
impl ResourceLoader for ImageFetcher {
    async fn load_image(&self, reference: &str) -> Result<Arc<RgbaImage>, ResourceError> {
        self.fetch(reference).await.map(|cached| cached.image)
    }
}

/// Loader serving images registered up front.
#[derive(Debug, Default)]
pub struct StaticLoader {
    images: HashMap<String, Arc<RgbaImage>>,
    loads: AtomicUsize,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, reference: impl Into<String>, image: RgbaImage) -> Self {
        self.images.insert(reference.into(), Arc::new(image));
        self
    }

    /// Number of `load_image` calls so far, failed ones included.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ResourceLoader for StaticLoader {
    async fn load_image(&self, reference: &str) -> Result<Arc<RgbaImage>, ResourceError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| ResourceError::Fetch(format!("no image registered for {reference}")))
    }
}

/// Decoded inputs of one render pass.
#[derive(Debug, Clone)]
pub struct SceneResources {
    pub image: Arc<RgbaImage>,
    pub watermark: Option<Arc<RgbaImage>>,
}

/// Load the template image and optional watermark concurrently.
///
/// Either failure fails the whole load; nothing is returned half-decoded.
pub async fn load_scene_resources<L>(
    loader: &L,
    image: &str,
    watermark: Option<&str>,
) -> Result<SceneResources, ResourceError>
where
    L: ResourceLoader + ?Sized,
{
    let watermark_load = async {
        match watermark {
            Some(reference) => loader.load_image(reference).await.map(Some),
            None => Ok(None),
        }
    };

    let (image, watermark) = tokio::join!(loader.load_image(image), watermark_load);

    Ok(SceneResources {
        image: image?,
        watermark: watermark?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn test_static_loader_serves_registered_images() {
        let loader = StaticLoader::new().with_image("doge", RgbaImage::new(4, 3));
        let image = loader.load_image("doge").await.unwrap();
        assert_eq!(image.dimensions(), (4, 3));

        let missing = loader.load_image("cat").await;
        assert!(matches!(missing, Err(ResourceError::Fetch(_))));
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn test_scene_without_watermark() {
        let loader = StaticLoader::new().with_image("doge", RgbaImage::new(4, 3));
        let resources = load_scene_resources(&loader, "doge", None).await.unwrap();
        assert!(resources.watermark.is_none());
        assert_eq!(loader.load_count(), 1);
    }

    #[tokio::test]
    async fn test_watermark_failure_fails_the_scene() {
        let loader = StaticLoader::new().with_image("doge", RgbaImage::new(4, 3));
        let result = load_scene_resources(&loader, "doge", Some("missing-logo")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dyn_loader() {
        let loader: Box<dyn ResourceLoader> = Box::new(
            StaticLoader::new()
                .with_image("doge", RgbaImage::new(4, 3))
                .with_image("logo", RgbaImage::new(2, 2)),
        );
        let resources = load_scene_resources(loader.as_ref(), "doge", Some("logo"))
            .await
            .unwrap();
        assert_eq!(resources.watermark.unwrap().dimensions(), (2, 2));
    }

    /// Completes only when two loads are in flight at once.
    struct RendezvousLoader {
        barrier: Barrier,
    }

    #[async_trait]
    impl ResourceLoader for RendezvousLoader {
        async fn load_image(&self, _reference: &str) -> Result<Arc<RgbaImage>, ResourceError> {
            self.barrier.wait().await;
            Ok(Arc::new(RgbaImage::new(1, 1)))
        }
    }

    #[tokio::test]
    async fn test_image_and_watermark_load_concurrently() {
        let loader = RendezvousLoader {
            barrier: Barrier::new(2),
        };
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            load_scene_resources(&loader, "image", Some("watermark")),
        )
        .await;

        let resources = result.expect("loads ran sequentially").unwrap();
        assert!(resources.watermark.is_some());
    }
}

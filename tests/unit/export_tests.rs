// Export tests through the real image fetcher using data URL templates

use image::{Rgba, RgbaImage};
use memekit::config::MemeConfig;
use memekit::export::{encode_png, to_data_url};
use memekit::resources::image_fetcher::decode_data_url;
use memekit::{MemeEditor, MemeError};
use tempfile::TempDir;

fn template_url(width: u32, height: u32) -> String {
    let image = RgbaImage::from_pixel(width, height, Rgba([90, 160, 40, 255]));
    to_data_url(&encode_png(&image).expect("Failed to encode template"))
}

fn editor(config: MemeConfig) -> MemeEditor {
    let mut editor = MemeEditor::from_config(config)
        .expect("Failed to create editor")
        .with_font(None);
    editor.set_image(Some(template_url(100, 50)));
    editor.set_caption("exported");
    editor
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png)
        .expect("export is not a valid PNG")
        .to_rgba8()
}

#[tokio::test]
async fn test_export_has_no_letterbox() {
    let png = editor(MemeConfig::default()).export_png().await.unwrap();
    let image = decode(&png);

    assert_eq!(image.dimensions(), (700, 350));
    assert_eq!(image.get_pixel(0, 0)[3], 255);
    assert_eq!(image.get_pixel(699, 349)[3], 255);
}

#[tokio::test]
async fn test_export_scales_with_device_pixel_ratio() {
    let config = MemeConfig::from_yaml_with_env("canvas:\n  device_pixel_ratio: 2.0\n").unwrap();
    let png = editor(config).export_png().await.unwrap();
    assert_eq!(decode(&png).dimensions(), (1400, 700));
}

#[tokio::test]
async fn test_export_data_url_decodes_to_export() {
    let editor = editor(MemeConfig::default());
    let url = editor.export_data_url().await.unwrap();
    assert!(url.starts_with("data:image/png;base64,"));

    let image = decode_data_url(&url).unwrap();
    assert_eq!(image.dimensions(), (700, 350));
}

#[tokio::test]
async fn test_export_to_directory_uses_default_name() {
    let dir = TempDir::new().unwrap();
    let target = editor(MemeConfig::default())
        .export_to_file(dir.path())
        .await
        .unwrap();

    assert_eq!(target, dir.path().join("my-meme.png"));
    let bytes = std::fs::read(&target).unwrap();
    assert_eq!(decode(&bytes).dimensions(), (700, 350));
}

#[tokio::test]
async fn test_export_to_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.png");
    let target = editor(MemeConfig::default())
        .export_to_file(&path)
        .await
        .unwrap();
    assert_eq!(target, path);
    assert!(path.exists());
}

#[tokio::test]
async fn test_export_without_image_fails() {
    let mut editor = editor(MemeConfig::default());
    editor.set_image(None);
    assert!(matches!(editor.export_png().await, Err(MemeError::NoImage)));
}

#[tokio::test]
async fn test_export_with_broken_watermark_fails() {
    let mut editor = editor(MemeConfig::default());
    editor.set_watermark(Some("data:image/png;base64,bm90IGFuIGltYWdl".to_string()));
    assert!(matches!(
        editor.export_png().await,
        Err(MemeError::Resource(_))
    ));
}

// Configuration loading tests

use memekit::config::{ConfigError, MemeConfig};
use memekit::render::TextEffect;
use memekit::{MemeEditor, MemeError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_can_load_config_from_file() {
    let file = write_config(
        r#"
canvas:
  export_width: 1200
  export_height: 1200
  device_pixel_ratio: 2.0
style:
  text_effect: glow
  font_scale: 1.5
  caption_position:
    x_percent: 0.25
    y_percent: 0.1
"#,
    );

    let config = MemeConfig::from_file(file.path()).expect("Failed to load config");
    assert_eq!(config.canvas.export_width, 1200);
    assert_eq!(config.canvas.preview_width, 700);
    assert_eq!(config.style.text_effect, TextEffect::Glow);
    assert_eq!(config.style.font_scale.value(), 1.5);
    assert_eq!(config.style.caption_position.x_percent(), 0.25);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_reports_path() {
    let error = MemeConfig::from_file("/nonexistent/memekit.yaml").unwrap_err();
    assert!(matches!(error, ConfigError::Read { .. }));
    assert!(error.to_string().contains("/nonexistent/memekit.yaml"));
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("MEMEKIT_TEST_WATERMARK", "https://example.com/mark.png");
    let config = MemeConfig::from_yaml_with_env("watermark: ${MEMEKIT_TEST_WATERMARK}\n")
        .expect("Failed to substitute env var");
    assert_eq!(
        config.watermark.as_deref(),
        Some("https://example.com/mark.png")
    );
}

#[test]
fn test_unset_env_var_is_an_error() {
    let error = MemeConfig::from_yaml_with_env("watermark: ${MEMEKIT_TEST_SURELY_UNSET}\n")
        .unwrap_err();
    assert!(matches!(error, ConfigError::MissingEnvVar(name) if name == "MEMEKIT_TEST_SURELY_UNSET"));
}

#[test]
fn test_out_of_range_style_values_are_clamped_on_load() {
    let config = MemeConfig::from_yaml_with_env(
        r#"
style:
  font_scale: 9.0
  caption_position:
    x_percent: -1.0
    y_percent: 3.0
"#,
    )
    .unwrap();
    assert_eq!(config.style.font_scale.value(), 2.0);
    assert_eq!(config.style.caption_position.x_percent(), 0.0);
    assert_eq!(config.style.caption_position.y_percent(), 1.0);
}

#[test]
fn test_unknown_effect_fails_to_parse() {
    let error = MemeConfig::from_yaml_with_env("style:\n  text_effect: sparkle\n").unwrap_err();
    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn test_editor_rejects_invalid_config() {
    let config = MemeConfig::from_yaml_with_env("canvas:\n  device_pixel_ratio: 0\n").unwrap();
    let result = MemeEditor::from_config(config);
    assert!(matches!(
        result,
        Err(MemeError::Config(ConfigError::Invalid(_)))
    ));
}

#[test]
fn test_editor_starts_from_config_style() {
    let config = MemeConfig::from_yaml_with_env(
        "style:\n  text_effect: stroke\nwatermark: data:image/png;base64,AAAA\n",
    )
    .unwrap();
    let editor = MemeEditor::from_config(config).expect("Failed to create editor");
    assert_eq!(editor.effect(), TextEffect::Stroke);
    assert_eq!(editor.watermark_ref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(editor.caption(), "");
    assert!(editor.image_ref().is_none());
}

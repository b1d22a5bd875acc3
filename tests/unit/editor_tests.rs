// Editor session tests: preview scheduling, dragging and style changes

use image::{Rgba, RgbaImage};
use memekit::config::MemeConfig;
use memekit::interaction::CursorHint;
use memekit::render::{CaptionPosition, PaintOp, RenderOptions, TextEffect};
use memekit::resources::{ResourceError, StaticLoader};
use memekit::{MemeEditor, PreviewStatus};
use parking_lot::Mutex;
use std::sync::Arc;

const EPSILON: f32 = 1e-3;

fn loader() -> Arc<StaticLoader> {
    Arc::new(
        StaticLoader::new()
            .with_image("wide", RgbaImage::from_pixel(1000, 500, Rgba([30, 30, 30, 255])))
            .with_image("tall", RgbaImage::from_pixel(500, 1000, Rgba([30, 30, 30, 255])))
            .with_image("mark", RgbaImage::from_pixel(64, 32, Rgba([255, 255, 255, 255]))),
    )
}

fn editor_with(loader: Arc<StaticLoader>) -> MemeEditor<StaticLoader> {
    let mut editor = MemeEditor::new(loader, MemeConfig::default()).with_font(None);
    editor.set_image(Some("wide".to_string()));
    editor.set_caption("one does not simply");
    editor
}

fn editor() -> MemeEditor<StaticLoader> {
    editor_with(loader())
}

#[tokio::test]
async fn test_drag_updates_position_and_notifies_listener() {
    let mut editor = editor();
    assert_eq!(editor.render_preview().await, PreviewStatus::Rendered);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    editor.on_position_change(move |position| sink.lock().push(position));

    // Default anchor of a 1000x500 template in 700x700 is (350, 385)
    assert_eq!(editor.pointer_move(350.0, 385.0), CursorHint::Grab);
    assert_eq!(editor.pointer_down(350.0, 385.0), CursorHint::Grabbing);

    let before = editor.generation();
    assert_eq!(editor.pointer_move(300.0, 300.0), CursorHint::Grabbing);
    assert!(editor.generation() > before, "drag must supersede in-flight previews");

    let position = editor.position();
    assert!((position.x_percent() - 300.0 / 700.0).abs() < EPSILON);
    assert!((position.y_percent() - 125.0 / 350.0).abs() < EPSILON);

    editor.pointer_move(320.0, 310.0);
    assert_eq!(editor.pointer_up(), CursorHint::Default);
    assert!(!editor.is_dragging());

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], editor.position());
}

#[tokio::test]
async fn test_hover_does_not_notify_listener() {
    let mut editor = editor();
    editor.render_preview().await;

    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    editor.on_position_change(move |_| *counter.lock() += 1);

    editor.pointer_move(350.0, 385.0);
    editor.pointer_move(10.0, 10.0);
    editor.pointer_leave();
    assert_eq!(*calls.lock(), 0);
}

#[tokio::test]
async fn test_drag_stops_above_image_bottom() {
    let mut editor = editor();
    editor.render_preview().await;

    editor.pointer_down(350.0, 385.0);
    editor.pointer_move(350.0, 5000.0);
    editor.pointer_leave();

    // Three estimated lines at 28px keep the anchor 84px above the bottom
    let rect = editor.canvas_rect();
    let (_, anchor_y) = rect.anchor_for(editor.position());
    assert!((anchor_y - (525.0 - 84.0)).abs() < EPSILON);
}

#[tokio::test]
async fn test_latest_preview_wins() {
    let mut editor = editor();

    let first = editor.prepare_preview().unwrap();
    let second = editor.prepare_preview().unwrap();
    assert!(second.generation() > first.generation());

    let (first, second) = tokio::join!(first.run(), second.run());
    assert_eq!(editor.apply_preview(first), PreviewStatus::Superseded);
    assert_eq!(editor.apply_preview(second), PreviewStatus::Rendered);
}

#[tokio::test]
async fn test_preview_job_runs_on_spawned_task() {
    let mut editor = editor();
    let job = editor.prepare_preview().unwrap();

    let result = tokio::spawn(job.run()).await.expect("preview task panicked");
    assert_eq!(editor.apply_preview(result), PreviewStatus::Rendered);
    assert!(editor.preview_png().unwrap().is_some());
}

#[tokio::test]
async fn test_switching_template_moves_hit_area_after_render() {
    let mut editor = editor();
    editor.render_preview().await;
    assert_eq!(editor.canvas_rect().offset_y, 175.0);

    editor.set_image(Some("tall".to_string()));
    assert_eq!(editor.render_preview().await, PreviewStatus::Rendered);

    let rect = editor.canvas_rect();
    assert_eq!((rect.offset_x, rect.offset_y), (175.0, 0.0));
    assert_eq!((rect.draw_width, rect.draw_height), (350.0, 700.0));
}

#[tokio::test]
async fn test_missing_template_keeps_last_preview() {
    let mut editor = editor();
    editor.render_preview().await;
    let before = editor.preview().unwrap().image.clone();

    editor.set_image(Some("gone".to_string()));
    let status = editor.render_preview().await;
    assert!(matches!(status, PreviewStatus::Failed(ResourceError::Fetch(_))));
    assert_eq!(editor.preview().unwrap().image, before);
}

#[tokio::test]
async fn test_resources_are_loaded_together() {
    let loader = loader();
    let mut editor = editor_with(Arc::clone(&loader));
    editor.set_watermark(Some("mark".to_string()));

    assert_eq!(editor.render_preview().await, PreviewStatus::Rendered);
    assert_eq!(loader.load_count(), 2);
}

#[tokio::test]
async fn test_plan_reflects_effect_toggles() {
    let mut editor = editor();

    editor.toggle_effect(TextEffect::Stroke, true);
    let ops = editor.plan(RenderOptions::export()).await.unwrap();
    assert!(ops.iter().any(|op| matches!(op, PaintOp::StrokeText { .. })));

    // Unchecking an inactive effect keeps the active one
    editor.toggle_effect(TextEffect::Glow, false);
    assert_eq!(editor.effect(), TextEffect::Stroke);

    editor.toggle_effect(TextEffect::Stroke, false);
    assert_eq!(editor.effect(), TextEffect::None);
    let ops = editor.plan(RenderOptions::export()).await.unwrap();
    assert!(!ops.iter().any(|op| matches!(op, PaintOp::StrokeText { .. })));
}

#[tokio::test]
async fn test_plan_serializes_to_json() {
    let editor = editor();
    let ops = editor.plan(RenderOptions::preview()).await.unwrap();
    let json = serde_json::to_value(&ops).unwrap();

    assert_eq!(json[0]["op"], "clear");
    assert_eq!(json[1]["op"], "draw_image");
    assert_eq!(json[2]["op"], "stroke_dashed_rect");
}

#[test]
fn test_set_position_clamps() {
    let mut editor = editor();
    editor.set_position(CaptionPosition::new(1.5, -0.5));
    assert_eq!(editor.position().x_percent(), 1.0);
    assert_eq!(editor.position().y_percent(), 0.0);
}

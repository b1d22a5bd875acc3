// Composition pipeline tests against the recording and raster surfaces

use image::{Rgba, RgbaImage};
use memekit::constants::WATERMARK_OPACITY;
use memekit::render::{
    compute_contain, render, CaptionPosition, CaptionStyle, FontScale, PaintOp, PaintRecorder,
    RasterSurface, Rect, RenderGeneration, RenderOptions, RenderOutcome, RenderTicket, Scene,
    Shadow, TextEffect,
};
use memekit::resources::font::estimate_advance;
use rstest::rstest;

const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

fn template() -> RgbaImage {
    RgbaImage::from_pixel(1000, 500, RED)
}

fn record(scene: &Scene<'_>, options: RenderOptions) -> PaintRecorder {
    let mut surface = PaintRecorder::new(700.0, 700.0);
    let outcome = render(&mut surface, scene, options, &RenderTicket::detached());
    assert!(outcome.is_completed());
    surface
}

fn style(effect: TextEffect) -> CaptionStyle {
    CaptionStyle {
        effect,
        ..CaptionStyle::default()
    }
}

#[test]
fn test_wide_template_is_letterboxed_vertically() {
    let image = template();
    let mut surface = RasterSurface::new(700, 700, 1.0, None);
    let outcome = render(
        &mut surface,
        &Scene::new(&image),
        RenderOptions::export(),
        &RenderTicket::detached(),
    );

    let RenderOutcome::Completed(rect) = outcome else {
        panic!("render was superseded");
    };
    assert_eq!(rect, compute_contain(1000.0, 500.0, 700.0, 700.0));
    assert_eq!((rect.offset_x, rect.offset_y), (0.0, 175.0));

    let pixels = surface.image();
    assert_eq!(pixels.get_pixel(350, 100)[3], 0, "top margin stays transparent");
    assert_eq!(pixels.get_pixel(350, 650)[3], 0, "bottom margin stays transparent");
    let center = pixels.get_pixel(350, 350);
    for (channel, expected) in center.0.iter().zip(RED.0) {
        assert!(channel.abs_diff(expected) <= 1, "{center:?} vs {RED:?}");
    }
}

#[test]
fn test_long_caption_wraps_within_max_width() {
    let image = template();
    let caption = "when the code compiles on the first try and you have no idea \
                   why it works but you ship it anyway on a friday afternoon";
    let surface = record(
        &Scene::new(&image).with_caption(caption),
        RenderOptions::export(),
    );

    // 350px tall image: font size floor(350 * 0.08) = 28, max width 630
    let lines = surface.filled_text();
    assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
    for line in &lines {
        if line.contains(' ') {
            assert!(estimate_advance(line, 28.0) <= 630.0, "line too wide: {line}");
        }
    }
    assert_eq!(lines.join(" "), caption.split_whitespace().collect::<Vec<_>>().join(" "));
}

#[test]
fn test_unsplittable_word_stays_on_one_line() {
    let image = template();
    let word = "A".repeat(200);
    let surface = record(
        &Scene::new(&image).with_caption(&word),
        RenderOptions::export(),
    );
    assert_eq!(surface.filled_text(), vec![word.as_str()]);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn test_blank_caption_draws_image_only(#[case] caption: &str) {
    let image = template();
    let surface = record(
        &Scene::new(&image).with_caption(caption),
        RenderOptions::preview(),
    );
    assert_eq!(surface.ops().len(), 2);
    assert_eq!(surface.ops()[0], PaintOp::Clear);
    assert!(matches!(surface.ops()[1], PaintOp::DrawImage { .. }));
}

#[test]
fn test_stroke_outline_precedes_fill_at_same_point() {
    let image = template();
    let surface = record(
        &Scene::new(&image)
            .with_caption("stroke me")
            .with_style(style(TextEffect::Stroke)),
        RenderOptions::export(),
    );

    let text_ops: Vec<&PaintOp> = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, PaintOp::StrokeText { .. } | PaintOp::FillText { .. }))
        .collect();
    assert_eq!(text_ops.len(), 2);

    match (text_ops[0], text_ops[1]) {
        (
            PaintOp::StrokeText {
                x: sx,
                y: sy,
                line_width,
                ..
            },
            PaintOp::FillText { x: fx, y: fy, .. },
        ) => {
            assert_eq!((sx, sy), (fx, fy));
            // max(4, floor(28 * 0.15)) = 4
            assert_eq!(*line_width, 4.0);
        }
        other => panic!("unexpected order: {other:?}"),
    }
}

#[rstest]
#[case(TextEffect::Shadow)]
#[case(TextEffect::Glow)]
fn test_shadow_effects_leave_no_shadow_behind(#[case] effect: TextEffect) {
    let image = template();
    let mark = RgbaImage::from_pixel(200, 100, RED);
    let surface = record(
        &Scene::new(&image)
            .with_caption("glowing")
            .with_watermark(Some(&mark))
            .with_style(style(effect)),
        RenderOptions::export(),
    );

    let last_shadow = surface
        .ops()
        .iter()
        .rev()
        .find_map(|op| match op {
            PaintOp::SetShadow(shadow) => Some(*shadow),
            _ => None,
        })
        .expect("effect should set a shadow");
    assert_eq!(last_shadow, Shadow::NONE);
    assert!(matches!(surface.ops().last(), Some(PaintOp::DrawImage { .. })));
}

#[test]
fn test_watermark_sits_in_bottom_right_corner() {
    let image = template();
    let mark = RgbaImage::from_pixel(200, 100, RED);
    let surface = record(
        &Scene::new(&image).with_watermark(Some(&mark)),
        RenderOptions::export(),
    );

    let Some(PaintOp::DrawImage {
        source_width,
        source_height,
        target,
        opacity,
    }) = surface.ops().last()
    else {
        panic!("watermark should be painted last");
    };
    assert_eq!((*source_width, *source_height), (200, 100));
    assert_eq!(*opacity, WATERMARK_OPACITY);

    // width 0.15 * 700, inset 0.03 * 700 from the image corner
    let expected = Rect::new(574.0, 451.5, 105.0, 52.5);
    for (actual, wanted) in [
        (target.x, expected.x),
        (target.y, expected.y),
        (target.width, expected.width),
        (target.height, expected.height),
    ] {
        assert!((actual - wanted).abs() < 1e-3, "{target:?} vs {expected:?}");
    }
}

#[test]
fn test_bounding_box_only_in_preview() {
    let image = template();
    let scene = Scene::new(&image).with_caption("boxed");

    let has_box = |surface: &PaintRecorder| {
        surface
            .ops()
            .iter()
            .any(|op| matches!(op, PaintOp::StrokeDashedRect { .. }))
    };
    assert!(has_box(&record(&scene, RenderOptions::preview())));
    assert!(!has_box(&record(&scene, RenderOptions::export())));
}

#[test]
fn test_caption_follows_position_and_scale() {
    let image = template();
    let scene = Scene::new(&image).with_caption("moved").with_style(CaptionStyle {
        effect: TextEffect::None,
        font_scale: FontScale::new(2.0),
        position: CaptionPosition::new(0.25, 0.0),
    });
    let surface = record(&scene, RenderOptions::export());

    let fill = surface
        .ops()
        .iter()
        .find_map(|op| match op {
            PaintOp::FillText { x, y, font_size, .. } => Some((*x, *y, *font_size)),
            _ => None,
        })
        .unwrap();
    assert_eq!(fill, (175.0, 175.0, 56.0));
}

#[test]
fn test_render_is_idempotent() {
    let image = template();
    let mark = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 255, 128]));
    let scene = Scene::new(&image)
        .with_caption("same every time")
        .with_watermark(Some(&mark))
        .with_style(style(TextEffect::Shadow));

    let paint = || {
        let mut surface = RasterSurface::new(350, 350, 1.0, None);
        render(
            &mut surface,
            &scene,
            RenderOptions::preview(),
            &RenderTicket::detached(),
        );
        surface.into_image()
    };
    assert_eq!(paint(), paint());
}

#[test]
fn test_superseded_pass_paints_nothing() {
    let generation = RenderGeneration::new();
    let stale = generation.begin();
    let fresh = generation.begin();
    assert!(!stale.is_current());

    let image = template();
    let scene = Scene::new(&image).with_caption("late");

    let mut surface = PaintRecorder::new(700.0, 700.0);
    assert_eq!(
        render(&mut surface, &scene, RenderOptions::preview(), &stale),
        RenderOutcome::Superseded
    );
    assert!(surface.ops().is_empty());

    assert!(render(&mut surface, &scene, RenderOptions::preview(), &fresh).is_completed());
}

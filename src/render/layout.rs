//! Caption line wrapping and bounding box computation.
//!
//! Wrapping is greedy: words are appended to the current line while the
//! measured width of the candidate line fits, otherwise the line is
//! committed. Words are never split, so a single word wider than the limit
//! occupies a line of its own.

use super::geometry::Rect;
use crate::constants::{BOX_PADDING_X_RATIO, BOX_PADDING_Y_RATIO};

/// Wrapped caption lines plus their bounding box in canvas pixels.
///
/// Derived per render pass; never reused across different text, width or
/// font size.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub lines: Vec<String>,
    pub bounds: Rect,
    pub line_height: f32,
}

impl LineLayout {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Top coordinate of each line, paired with the line text.
    pub fn positioned_lines(&self, anchor_y: f32) -> impl Iterator<Item = (f32, &str)> + '_ {
        let line_height = self.line_height;
        self.lines
            .iter()
            .enumerate()
            .map(move |(index, line)| (anchor_y + index as f32 * line_height, line.as_str()))
    }
}

/// Greedily wrap `text` so every multi-word line measures at most `max_width`.
///
/// Whitespace-only input yields no lines.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Wrap a caption anchored at `(anchor_x, anchor_y)` and compute its bounding box.
///
/// The anchor is the horizontal center and top of the first line. The box
/// is padded by `0.4 * font_size` horizontally and `0.3 * font_size`
/// vertically on each side. Returns `None` when there is nothing to draw.
pub fn layout_caption<F>(
    text: &str,
    anchor_x: f32,
    anchor_y: f32,
    max_width: f32,
    font_size: f32,
    measure: F,
) -> Option<LineLayout>
where
    F: Fn(&str) -> f32,
{
    let lines = wrap_text(text, max_width, &measure);
    if lines.is_empty() {
        return None;
    }

    let widest = lines
        .iter()
        .map(|line| measure(line))
        .fold(0.0_f32, f32::max);

    let padding_x = font_size * BOX_PADDING_X_RATIO;
    let padding_y = font_size * BOX_PADDING_Y_RATIO;
    let width = widest + padding_x * 2.0;
    let height = lines.len() as f32 * font_size + padding_y * 2.0;

    Some(LineLayout {
        lines,
        bounds: Rect::new(anchor_x - width / 2.0, anchor_y - padding_y, width, height),
        line_height: font_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ten pixels per character, spaces included
    fn fixed_measure(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_text("", 100.0, fixed_measure).is_empty());
        assert!(wrap_text("   \t\n ", 100.0, fixed_measure).is_empty());
        assert!(layout_caption("  ", 50.0, 50.0, 100.0, 20.0, fixed_measure).is_none());
    }

    #[test]
    fn test_single_wide_word_is_not_split() {
        let lines = wrap_text("supercalifragilistic", 50.0, fixed_measure);
        assert_eq!(lines, vec!["supercalifragilistic".to_string()]);
    }

    #[test]
    fn test_long_caption_wraps_within_width() {
        let caption = "this is a very long caption that should wrap across two lines";
        let max_width = 300.0;
        let lines = wrap_text(caption, max_width, fixed_measure);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(fixed_measure(line) <= max_width, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), caption);
    }

    #[test]
    fn test_wrap_collapses_repeated_whitespace() {
        let lines = wrap_text("  one   two\tthree ", 1000.0, fixed_measure);
        assert_eq!(lines, vec!["one two three".to_string()]);
    }

    #[test]
    fn test_overflowing_word_starts_new_line() {
        let lines = wrap_text("hi enormousword ok", 60.0, fixed_measure);
        assert_eq!(
            lines,
            vec![
                "hi".to_string(),
                "enormousword".to_string(),
                "ok".to_string()
            ]
        );
    }

    #[test]
    fn test_fit_is_inclusive() {
        // "ab cd" measures exactly 50
        let lines = wrap_text("ab cd", 50.0, fixed_measure);
        assert_eq!(lines, vec!["ab cd".to_string()]);
    }

    #[test]
    fn test_bounding_box_padding_and_position() {
        let layout = layout_caption("abcd ef", 200.0, 100.0, 50.0, 20.0, fixed_measure).unwrap();

        assert_eq!(layout.lines, vec!["abcd".to_string(), "ef".to_string()]);
        // widest line 40 + 2 * 8 padding
        assert!((layout.bounds.width - 56.0).abs() < 1e-4);
        // 2 lines * 20 + 2 * 6 padding
        assert!((layout.bounds.height - 52.0).abs() < 1e-4);
        assert!((layout.bounds.x - 172.0).abs() < 1e-4);
        assert!((layout.bounds.y - 94.0).abs() < 1e-4);
        assert_eq!(layout.line_height, 20.0);
    }

    #[test]
    fn test_positioned_lines_advance_by_line_height() {
        let layout = layout_caption("aaaa bbbb cccc", 0.0, 10.0, 40.0, 25.0, fixed_measure).unwrap();
        let tops: Vec<f32> = layout.positioned_lines(10.0).map(|(y, _)| y).collect();
        assert_eq!(tops, vec![10.0, 35.0, 60.0]);
        assert_eq!(layout.line_count(), 3);
    }
}

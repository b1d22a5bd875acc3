//! Interactive caption positioning.
//!
//! [`PositionController`] is a two-state machine (idle, dragging) driven by
//! pointer events in canvas-local logical pixels. It never renders; it
//! reports a cursor hint and, while dragging, the new [`CaptionPosition`].
//!
//! Hit testing uses a fixed radius around a hot spot half an estimated
//! caption block below the anchor. The block is estimated as three lines at
//! the current font size, which is cheap and independent of the actual
//! wrap. The same estimate keeps the dragged block above the image bottom.

use serde::Serialize;

use crate::constants::{BASE_FONT_RATIO, ESTIMATED_CAPTION_LINES, HIT_RADIUS_PX};
use crate::render::{CanvasRect, CaptionPosition, FontScale};

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer offset from the caption anchor captured on press.
    Dragging { offset_x: f32, offset_y: f32 },
}

/// Current layout state the controller reads on every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    pub rect: CanvasRect,
    pub position: CaptionPosition,
    pub font_scale: FontScale,
}

impl DragContext {
    fn anchor(&self) -> (f32, f32) {
        self.rect.anchor_for(self.position)
    }

    fn block_height(&self) -> f32 {
        estimated_block_height(&self.rect, self.font_scale)
    }
}

/// Result of one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerResponse {
    pub cursor: CursorHint,
    /// New caption position, only emitted while dragging.
    pub position: Option<CaptionPosition>,
}

impl PointerResponse {
    fn cursor(cursor: CursorHint) -> Self {
        Self {
            cursor,
            position: None,
        }
    }
}

/// Estimated caption block height: three lines at the current font size.
pub fn estimated_block_height(rect: &CanvasRect, font_scale: FontScale) -> f32 {
    rect.draw_height * BASE_FONT_RATIO * font_scale.value() * ESTIMATED_CAPTION_LINES
}

/// Clamp a candidate anchor so it stays on the image and the estimated
/// block does not run past the image bottom.
pub fn clamp_anchor(rect: &CanvasRect, block_height: f32, x: f32, y: f32) -> (f32, f32) {
    let min_x = rect.offset_x;
    let max_x = rect.offset_x + rect.draw_width;
    let min_y = rect.offset_y;
    let max_y = (rect.offset_y + rect.draw_height - block_height).max(min_y);
    (x.clamp(min_x, max_x), y.clamp(min_y, max_y))
}

#[derive(Debug, Clone, Default)]
pub struct PositionController {
    state: DragState,
}

impl PositionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether `(x, y)` is over the caption.
    pub fn hit_test(&self, context: &DragContext, x: f32, y: f32) -> bool {
        if context.rect.is_empty() {
            return false;
        }
        let (anchor_x, anchor_y) = context.anchor();
        let dx = x - anchor_x;
        let dy = y - (anchor_y + context.block_height() / 2.0);
        dx * dx + dy * dy <= HIT_RADIUS_PX * HIT_RADIUS_PX
    }

    pub fn pointer_down(&mut self, context: &DragContext, x: f32, y: f32) -> PointerResponse {
        if !self.hit_test(context, x, y) {
            return PointerResponse::cursor(CursorHint::Default);
        }

        let (anchor_x, anchor_y) = context.anchor();
        self.state = DragState::Dragging {
            offset_x: x - anchor_x,
            offset_y: y - anchor_y,
        };
        PointerResponse::cursor(CursorHint::Grabbing)
    }

    pub fn pointer_move(&mut self, context: &DragContext, x: f32, y: f32) -> PointerResponse {
        match self.state {
            DragState::Dragging { offset_x, offset_y } => {
                let rect = &context.rect;
                let (anchor_x, anchor_y) =
                    clamp_anchor(rect, context.block_height(), x - offset_x, y - offset_y);
                PointerResponse {
                    cursor: CursorHint::Grabbing,
                    position: Some(rect.normalize(anchor_x, anchor_y)),
                }
            }
            DragState::Idle if self.hit_test(context, x, y) => {
                PointerResponse::cursor(CursorHint::Grab)
            }
            DragState::Idle => PointerResponse::cursor(CursorHint::Default),
        }
    }

    /// Release ends any drag, wherever the pointer is.
    pub fn pointer_up(&mut self) -> PointerResponse {
        self.state = DragState::Idle;
        PointerResponse::cursor(CursorHint::Default)
    }

    /// Leaving the canvas ends any drag.
    pub fn pointer_leave(&mut self) -> PointerResponse {
        self.pointer_up()
    }
}

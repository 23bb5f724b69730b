//! Canvas layout constants and geometry helpers shared by editing and rendering.

use crate::diagram::Actor;
use kurbo::{Line, Point, Rect, Size};

/// Width of an actor box.
pub const ACTOR_WIDTH: i32 = 120;
/// Height of an actor box.
pub const ACTOR_HEIGHT: i32 = 40;
/// Top edge of every actor box.
pub const ACTOR_TOP_Y: i32 = 20;
/// Horizontal gap between freshly added actors.
pub const ACTOR_GAP: i32 = 40;
/// Center x of the first actor.
pub const ACTOR_BASE_OFFSET: i32 = 100;

/// Vertical position of the first interaction arrow.
pub const INTERACTION_START_Y: f64 = 120.0;
/// Vertical distance between consecutive interactions.
pub const INTERACTION_V_GAP: f64 = 60.0;

/// Default canvas size.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1000.0, 700.0);

/// Minimum distance between an actor box and the canvas edge while dragging.
pub const DRAG_MARGIN: f64 = 10.0;
/// Distance of a label's center above its arrow.
pub const LABEL_OFFSET: f64 = 10.0;
/// X position of the sequence numbers.
pub const INDEX_MARGIN_X: f64 = 40.0;
/// Gap between the end of a lifeline and the canvas bottom.
pub const LIFELINE_BOTTOM_INSET: f64 = 20.0;
/// Gap between an actor box and its selection outline.
pub const SELECTION_OUTLINE_MARGIN: f64 = 3.0;

/// Pointer travel separating a click from a drag.
pub const DRAG_THRESHOLD: f64 = 6.0;

/// Half height of the clickable band around an interaction arrow.
pub const LINE_HIT_TOLERANCE: f64 = 4.0;
/// Font size used for interaction labels.
pub const LABEL_FONT_SIZE: f64 = 12.0;
/// Font size used for actor names.
pub const ACTOR_FONT_SIZE: f64 = 13.0;
/// Approximate advance of one label character, for hit boxes.
const LABEL_CHAR_WIDTH: f64 = 7.0;

/// Center x of the actor at `index` when it is first added.
pub fn actor_x_for_index(index: usize) -> i32 {
    ACTOR_BASE_OFFSET + index as i32 * (ACTOR_WIDTH + ACTOR_GAP)
}

/// Box of an actor.
pub fn actor_rect(actor: &Actor) -> Rect {
    let half = f64::from(ACTOR_WIDTH) / 2.0;
    let x = f64::from(actor.x);
    let y = f64::from(actor.y);
    Rect::new(x - half, y, x + half, y + f64::from(ACTOR_HEIGHT))
}

/// Vertical position of the interaction at `index`.
pub fn interaction_y(index: usize) -> f64 {
    INTERACTION_START_Y + index as f64 * INTERACTION_V_GAP
}

/// Point on the actor's lifeline where new interaction previews start.
pub fn interaction_anchor(actor: &Actor) -> Point {
    Point::new(f64::from(actor.x), INTERACTION_START_Y)
}

/// Dashed lifeline from the bottom of the actor box towards the canvas bottom.
pub fn lifeline(actor: &Actor, canvas_height: f64) -> Line {
    let x = f64::from(actor.x);
    let top = f64::from(actor.y + ACTOR_HEIGHT);
    Line::new((x, top), (x, canvas_height - LIFELINE_BOTTOM_INSET))
}

/// Clamp a dragged actor center so its box stays inside the canvas.
///
/// When the canvas is narrower than one actor the left bound wins.
pub fn clamp_actor_x(x: f64, canvas_width: f64) -> i32 {
    let half = f64::from(ACTOR_WIDTH) / 2.0;
    let lo = half + DRAG_MARGIN;
    let hi = canvas_width - half - DRAG_MARGIN;
    x.min(hi).max(lo).round() as i32
}

/// Clickable band around an interaction arrow.
pub fn interaction_line_band(x1: f64, x2: f64, y: f64) -> Rect {
    Rect::new(
        x1.min(x2),
        y - LINE_HIT_TOLERANCE,
        x1.max(x2),
        y + LINE_HIT_TOLERANCE,
    )
}

/// Approximate box of a label centered at `center`.
pub fn label_box(center: Point, label: &str) -> Rect {
    let width = label.chars().count() as f64 * LABEL_CHAR_WIDTH;
    let height = LABEL_FONT_SIZE + 2.0;
    Rect::from_center_size(center, (width, height))
}

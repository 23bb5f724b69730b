//! Gesture controller: press, drag and release on the canvas.
//!
//! A gesture is one press followed by any number of drags and a release.
//! Pressing an actor is ambiguous until the pointer either travels
//! [`DRAG_THRESHOLD`] (start an interaction) or is released (select the
//! actor). In creation mode any drag starts the interaction. Holding Shift
//! moves the actor instead.

use crate::diagram::{ActorId, DiagramError, LineStyle};
use crate::dialogs::{Notice, Prompt};
use crate::input::{CanvasEvent, Modifiers};
use crate::layout::{self, DRAG_THRESHOLD};
use crate::session::{EditorSession, Update};
use kurbo::Point;

/// Dashed or solid line following the pointer while an interaction is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLine {
    pub start: Point,
    pub end: Point,
    pub style: LineStyle,
}

/// Transient state of the current gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pressed on an actor, not yet dragged far enough to start an interaction.
    PressedOnActor { actor: ActorId, press: Point },
    /// Shift-dragging an actor horizontally.
    DraggingActorForMove {
        actor: ActorId,
        /// `actor.x - cursor.x` at press time.
        offset_x: f64,
        /// Position restored when the gesture is cancelled.
        original_x: i32,
    },
    /// Dragging out a new interaction from `start`.
    DraggingToCreateInteraction {
        start: ActorId,
        preview: Option<PreviewLine>,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn preview(&self) -> Option<&PreviewLine> {
        match self {
            GestureState::DraggingToCreateInteraction { preview, .. } => preview.as_ref(),
            _ => None,
        }
    }
}

impl EditorSession {
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Live preview line, if an interaction is being drawn.
    pub fn preview(&self) -> Option<&PreviewLine> {
        self.gesture.preview()
    }

    /// Dispatch a normalized canvas event.
    pub fn handle_canvas_event(&mut self, event: CanvasEvent) -> Update {
        match event {
            CanvasEvent::Press { position, modifiers } => self.press(position, modifiers),
            CanvasEvent::Drag { position } => self.drag(position),
            CanvasEvent::Release { position } => self.release(position),
            CanvasEvent::DoubleClick { position } => self.double_click(position),
        }
    }

    pub fn press(&mut self, point: Point, modifiers: Modifiers) -> Update {
        if self.is_modal() {
            return Update::NONE;
        }
        let mut update = Update::NONE;
        if !self.gesture.is_idle() {
            update |= self.cancel_gesture();
        }

        if let Some(index) = self.hits.interaction_at(point) {
            return update | self.select_interaction(index);
        }

        let Some(actor) = self.diagram.find_actor_at(point) else {
            return update | self.clear_selection();
        };
        let (id, x) = (actor.id, actor.x);

        self.gesture = if modifiers.shift {
            GestureState::DraggingActorForMove {
                actor: id,
                offset_x: f64::from(x) - point.x,
                original_x: x,
            }
        } else {
            GestureState::PressedOnActor { actor: id, press: point }
        };
        log::debug!("Press on actor {}: {:?}", id, self.gesture);
        update
    }

    pub fn drag(&mut self, point: Point) -> Update {
        if self.is_modal() {
            return Update::NONE;
        }
        match self.gesture {
            GestureState::Idle => Update::NONE,
            GestureState::PressedOnActor { actor, press } => {
                let threshold = if self.creation_mode { 0.0 } else { DRAG_THRESHOLD };
                if press.distance(point) < threshold {
                    return Update::NONE;
                }
                log::debug!("Drag from actor {} starts an interaction", actor);
                self.gesture = GestureState::DraggingToCreateInteraction {
                    start: actor,
                    preview: None,
                };
                self.update_preview(actor, point)
            }
            GestureState::DraggingActorForMove { actor, offset_x, .. } => {
                let x = layout::clamp_actor_x(point.x + offset_x, self.canvas_size.width);
                if self.diagram.actor(actor).is_some_and(|a| a.x == x) {
                    return Update::NONE;
                }
                self.diagram.set_actor_x(actor, x);
                self.touch();
                Update::REDRAW
            }
            GestureState::DraggingToCreateInteraction { start, .. } => self.update_preview(start, point),
        }
    }

    fn update_preview(&mut self, start: ActorId, point: Point) -> Update {
        let Some(anchor) = self.diagram.actor(start).map(layout::interaction_anchor) else {
            return Update::NONE;
        };
        self.gesture = GestureState::DraggingToCreateInteraction {
            start,
            preview: Some(PreviewLine {
                start: anchor,
                end: point,
                style: self.new_interaction_style,
            }),
        };
        Update::REDRAW
    }

    pub fn release(&mut self, point: Point) -> Update {
        if self.is_modal() {
            return Update::NONE;
        }
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle => Update::NONE,
            GestureState::PressedOnActor { actor, .. } => self.select_actor(actor),
            GestureState::DraggingActorForMove { actor, .. } => {
                log::debug!("Actor {} moved", actor);
                Update::REDRAW
            }
            GestureState::DraggingToCreateInteraction { start, .. } => {
                self.finish_interaction(start, point) | Update::REDRAW
            }
        }
    }

    fn finish_interaction(&mut self, start: ActorId, point: Point) -> Update {
        let Some(target) = self.diagram.find_actor_at(point).map(|a| a.id) else {
            self.notify(Notice::info("Info", "Release on an actor to create an interaction"));
            return Update::NONE;
        };
        match self.add_interaction(start, target, "", self.new_interaction_style) {
            Ok(index) => {
                let _ = self.open_prompt(Prompt::InteractionLabel { index });
                Update::ALL
            }
            Err(err @ DiagramError::SelfInteraction(_)) => {
                log::warn!("{}", err);
                self.notify(Notice::error("Invalid", err.to_string()));
                Update::NONE
            }
            Err(err) => {
                log::warn!("Interaction not created: {}", err);
                Update::NONE
            }
        }
    }

    /// Double-clicking an interaction selects it and opens the label editor.
    pub fn double_click(&mut self, point: Point) -> Update {
        if self.is_modal() {
            return Update::NONE;
        }
        let Some(index) = self.hits.interaction_at(point) else {
            return Update::NONE;
        };
        self.gesture = GestureState::Idle;
        self.select_interaction(index) | self.edit_label(index)
    }

    /// Abandon the current gesture, restoring a moved actor.
    pub fn cancel_gesture(&mut self) -> Update {
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle => Update::NONE,
            GestureState::PressedOnActor { .. } => Update::NONE,
            GestureState::DraggingActorForMove { actor, original_x, .. } => {
                self.diagram.set_actor_x(actor, original_x);
                Update::REDRAW
            }
            GestureState::DraggingToCreateInteraction { .. } => Update::REDRAW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{NoticeLevel, PromptResponse};
    use crate::hit::HitIndex;
    use crate::selection::Selection;
    use kurbo::{Rect, Size};

    const NO_MODS: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Alice at x=100, Bob at x=260, Carol at x=420.
    fn session() -> EditorSession {
        let mut session = EditorSession::new();
        for name in ["Alice", "Bob", "Carol"] {
            let _ = session.add_actor(name);
        }
        session
    }

    fn alice() -> Point {
        Point::new(100.0, 40.0)
    }

    fn bob() -> Point {
        Point::new(260.0, 40.0)
    }

    #[test]
    fn test_click_actor_selects_it() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        assert!(matches!(session.gesture(), GestureState::PressedOnActor { actor: 1, .. }));
        assert!(session.selection().is_none());

        let _ = session.drag(Point::new(103.0, 42.0));
        assert!(matches!(session.gesture(), GestureState::PressedOnActor { .. }));

        assert_eq!(session.release(Point::new(103.0, 42.0)), Update::REDRAW);
        assert_eq!(session.selection(), Selection::Actor(1));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_press_blank_canvas_clears_selection() {
        let mut session = session();
        let _ = session.select_actor(2);
        assert_eq!(session.press(Point::new(500.0, 500.0), NO_MODS), Update::REDRAW);
        assert!(session.selection().is_none());
        assert!(session.gesture().is_idle());
        assert!(session.release(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_drag_creates_interaction_and_prompts_for_label() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        assert_eq!(session.drag(Point::new(180.0, 90.0)), Update::REDRAW);

        let preview = session.preview().copied().unwrap();
        assert_eq!(preview.start, Point::new(100.0, 120.0));
        assert_eq!(preview.end, Point::new(180.0, 90.0));
        assert_eq!(preview.style, LineStyle::Solid);

        assert_eq!(session.release(bob()), Update::ALL);
        assert!(session.preview().is_none());
        assert_eq!(session.diagram().interactions().len(), 1);
        assert_eq!(session.pending_prompt(), Some(&Prompt::InteractionLabel { index: 0 }));

        let _ = session.resolve_prompt(PromptResponse::Submitted("hello".to_string()));
        assert_eq!(session.list().rows()[0], "1. Alice -> Bob [solid]: hello");
    }

    #[test]
    fn test_cancelled_label_keeps_empty_interaction() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        let _ = session.drag(Point::new(200.0, 40.0));
        let _ = session.release(bob());
        let _ = session.resolve_prompt(PromptResponse::Cancelled);
        assert_eq!(session.diagram().interactions()[0].label, "");
    }

    #[test]
    fn test_new_interaction_uses_current_style() {
        let mut session = session();
        session.set_new_interaction_style(LineStyle::Dashed);
        let _ = session.press(bob(), NO_MODS);
        let _ = session.drag(Point::new(200.0, 40.0));
        assert_eq!(session.preview().map(|p| p.style), Some(LineStyle::Dashed));
        let _ = session.release(alice());
        let created = &session.diagram().interactions()[0];
        assert_eq!((created.source_id, created.target_id), (2, 1));
        assert_eq!(created.style, LineStyle::Dashed);
    }

    #[test]
    fn test_release_on_same_actor_is_rejected() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        let _ = session.drag(Point::new(130.0, 50.0));
        let _ = session.release(Point::new(120.0, 45.0));

        assert!(session.diagram().interactions().is_empty());
        assert!(!session.is_modal());
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Cannot create interaction to the same actor");
    }

    #[test]
    fn test_release_on_blank_canvas_notifies() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        let _ = session.drag(Point::new(300.0, 300.0));
        assert_eq!(session.release(Point::new(300.0, 300.0)), Update::REDRAW);

        assert!(session.diagram().interactions().is_empty());
        assert!(session.preview().is_none());
        let notices = session.take_notices();
        assert_eq!(notices[0].message, "Release on an actor to create an interaction");
    }

    #[test]
    fn test_creation_mode_skips_threshold() {
        let mut session = session();
        let _ = session.set_creation_mode(true);
        let _ = session.press(alice(), NO_MODS);
        assert!(matches!(session.gesture(), GestureState::PressedOnActor { actor: 1, .. }));
        let _ = session.drag(Point::new(102.0, 41.0));
        assert!(session.preview().is_some());
        let _ = session.release(bob());
        assert_eq!(session.diagram().interactions().len(), 1);
    }

    #[test]
    fn test_creation_mode_click_still_selects_actor() {
        let mut session = session();
        let _ = session.set_creation_mode(true);
        let _ = session.press(alice(), NO_MODS);
        assert_eq!(session.release(alice()), Update::REDRAW);

        assert_eq!(session.selection(), Selection::Actor(1));
        assert!(session.take_notices().is_empty());
        assert!(session.diagram().interactions().is_empty());
    }

    #[test]
    fn test_drag_of_exactly_threshold_starts_interaction() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        let _ = session.drag(Point::new(100.0 + DRAG_THRESHOLD - 0.5, 40.0));
        assert!(matches!(session.gesture(), GestureState::PressedOnActor { .. }));

        assert_eq!(session.drag(Point::new(100.0 + DRAG_THRESHOLD, 40.0)), Update::REDRAW);
        assert!(matches!(
            session.gesture(),
            GestureState::DraggingToCreateInteraction { start: 1, .. }
        ));
    }

    #[test]
    fn test_shift_drag_moves_actor_with_offset() {
        let mut session = session();
        let _ = session.press(Point::new(110.0, 40.0), SHIFT);
        assert!(matches!(
            session.gesture(),
            GestureState::DraggingActorForMove { actor: 1, original_x: 100, .. }
        ));
        assert_eq!(session.drag(Point::new(210.0, 80.0)), Update::REDRAW);
        assert_eq!(session.diagram().actor(1).map(|a| a.x), Some(200));

        let _ = session.release(Point::new(210.0, 80.0));
        assert!(session.gesture().is_idle());
        assert_eq!(session.diagram().actor(1).map(|a| a.x), Some(200));
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_drag_beyond_right_edge_clamps() {
        let mut session = session();
        let _ = session.press(alice(), SHIFT);
        let _ = session.drag(Point::new(5000.0, 40.0));
        let width = session.canvas_size().width;
        assert_eq!(session.diagram().actor(1).map(|a| a.x), Some((width - 60.0 - 10.0) as i32));

        let _ = session.drag(Point::new(-400.0, 40.0));
        assert_eq!(session.diagram().actor(1).map(|a| a.x), Some(70));
    }

    #[test]
    fn test_clamp_follows_canvas_width() {
        let mut session = session();
        let _ = session.set_canvas_size(Size::new(600.0, 400.0));
        let _ = session.press(alice(), SHIFT);
        let _ = session.drag(Point::new(900.0, 40.0));
        assert_eq!(session.diagram().actor(1).map(|a| a.x), Some(530));
    }

    #[test]
    fn test_cancel_restores_actor_position() {
        let mut session = session();
        let _ = session.press(bob(), SHIFT);
        let _ = session.drag(Point::new(500.0, 40.0));
        assert_eq!(session.cancel_gesture(), Update::REDRAW);
        assert_eq!(session.diagram().actor(2).map(|a| a.x), Some(260));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_cancel_discards_preview() {
        let mut session = session();
        let _ = session.press(alice(), NO_MODS);
        let _ = session.drag(Point::new(200.0, 200.0));
        let _ = session.cancel_gesture();
        assert!(session.preview().is_none());
        assert!(session.release(bob()).is_none());
        assert!(session.diagram().interactions().is_empty());
    }

    #[test]
    fn test_interaction_hit_takes_priority_over_actor() {
        let mut session = session();
        session.add_interaction(1, 2, "a", LineStyle::Solid).unwrap();
        let mut hits = HitIndex::new();
        // Overlaps Alice's box on purpose.
        hits.push(Rect::new(40.0, 30.0, 260.0, 50.0), 0);
        session.install_hit_index(hits);

        let _ = session.press(alice(), NO_MODS);
        assert_eq!(session.selection(), Selection::Interaction(0));
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_double_click_opens_label_editor() {
        let mut session = session();
        session.add_interaction(1, 2, "ping", LineStyle::Solid).unwrap();
        let mut hits = HitIndex::new();
        hits.push(Rect::new(100.0, 116.0, 260.0, 124.0), 0);
        session.install_hit_index(hits);

        let point = Point::new(150.0, 120.0);
        let _ = session.press(point, NO_MODS);
        let _ = session.double_click(point);
        assert_eq!(session.selected_interaction(), Some(0));
        assert_eq!(
            session.pending_prompt(),
            Some(&Prompt::EditLabel {
                index: 0,
                initial: "ping".to_string()
            })
        );
        assert!(session.double_click(Point::new(900.0, 600.0)).is_none());
    }

    #[test]
    fn test_pointer_events_ignored_while_prompt_pending() {
        let mut session = session();
        let _ = session.request_add_actor();
        let _ = session.select_actor(1);

        assert!(session.press(Point::new(500.0, 500.0), NO_MODS).is_none());
        assert_eq!(session.selection(), Selection::Actor(1));
        assert!(session.press(alice(), SHIFT).is_none());
        assert!(session.gesture().is_idle());
    }

    #[test]
    fn test_canvas_event_dispatch() {
        let mut session = session();
        let _ = session.handle_canvas_event(CanvasEvent::Press {
            position: alice(),
            modifiers: NO_MODS,
        });
        let _ = session.handle_canvas_event(CanvasEvent::Drag { position: Point::new(200.0, 100.0) });
        let _ = session.handle_canvas_event(CanvasEvent::Release {
            position: Point::new(420.0, 30.0),
        });
        let created = &session.diagram().interactions()[0];
        assert_eq!((created.source_id, created.target_id), (1, 3));
    }
}

//! Backend-independent display list.
//!
//! [`build_display_list`] is a pure function of the session and palette. It
//! decides what is drawn, in which order and with which slot colors, and
//! records the hit regions of every interaction it draws. Backends only
//! paint the resulting commands.

use crate::renderer::RenderContext;
use kurbo::{Line, Point, Rect, Size};
use seqdraw_core::diagram::LineStyle;
use seqdraw_core::hit::HitIndex;
use seqdraw_core::layout::{
    self, ACTOR_FONT_SIZE, INDEX_MARGIN_X, LABEL_FONT_SIZE, LABEL_OFFSET, SELECTION_OUTLINE_MARGIN,
};
use seqdraw_core::selection::Selection;
use seqdraw_core::theme::{Slot, ThemeColor};

/// Dash pattern of lifelines.
pub const LIFELINE_DASH: [f64; 2] = [4.0, 4.0];
/// Dash pattern of dashed interactions and previews.
pub const INTERACTION_DASH: [f64; 2] = [6.0, 4.0];
/// Stroke width of interaction arrows.
pub const ARROW_WIDTH: f64 = 2.0;
/// Stroke width of the selected-interaction highlight.
pub const HIGHLIGHT_WIDTH: f64 = 6.0;
/// Stroke width of the selected-actor outline.
pub const OUTLINE_WIDTH: f64 = 3.0;

/// One drawing primitive in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: ThemeColor,
    },
    StrokeRect {
        rect: Rect,
        color: ThemeColor,
        width: f64,
    },
    /// A plain line, optionally dashed.
    Line {
        line: Line,
        color: ThemeColor,
        width: f64,
        dash: Option<[f64; 2]>,
    },
    /// A line with an arrowhead at `line.p1`.
    Arrow {
        line: Line,
        color: ThemeColor,
        width: f64,
        dash: Option<[f64; 2]>,
    },
    /// Text centered on `center`.
    Text {
        center: Point,
        text: String,
        color: ThemeColor,
        size: f64,
    },
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub size: Size,
    pub background: ThemeColor,
    pub commands: Vec<DrawCommand>,
    pub hits: HitIndex,
}

fn dash_for(style: LineStyle) -> Option<[f64; 2]> {
    style.is_dashed().then_some(INTERACTION_DASH)
}

/// Build the display list for the current session state.
pub fn build_display_list(ctx: &RenderContext) -> DisplayList {
    let session = ctx.session;
    let diagram = session.diagram();
    let palette = &ctx.palette;
    let size = session.canvas_size();
    let selection = session.selection();

    let mut commands = Vec::new();
    let mut hits = HitIndex::new();

    for actor in diagram.actors() {
        let rect = layout::actor_rect(actor);
        if selection == Selection::Actor(actor.id) {
            commands.push(DrawCommand::StrokeRect {
                rect: rect.inflate(SELECTION_OUTLINE_MARGIN, SELECTION_OUTLINE_MARGIN),
                color: palette.get(Slot::Accent),
                width: OUTLINE_WIDTH,
            });
        }
        commands.push(DrawCommand::FillRect {
            rect,
            color: palette.get(Slot::ActorFill),
        });
        commands.push(DrawCommand::StrokeRect {
            rect,
            color: palette.get(Slot::ActorOutline),
            width: 1.0,
        });
        commands.push(DrawCommand::Text {
            center: rect.center(),
            text: actor.name.clone(),
            color: palette.get(Slot::ActorText),
            size: ACTOR_FONT_SIZE,
        });
        commands.push(DrawCommand::Line {
            line: layout::lifeline(actor, size.height),
            color: palette.get(Slot::Lifeline),
            width: 1.0,
            dash: Some(LIFELINE_DASH),
        });
    }

    for (index, interaction) in diagram.interactions().iter().enumerate() {
        let (Some(source), Some(target)) = (
            diagram.actor(interaction.source_id),
            diagram.actor(interaction.target_id),
        ) else {
            continue;
        };
        let y = layout::interaction_y(index);
        let (sx, tx) = (f64::from(source.x), f64::from(target.x));
        let line = Line::new((sx, y), (tx, y));

        if selection == Selection::Interaction(index) {
            commands.push(DrawCommand::Line {
                line,
                color: palette.get(Slot::Accent),
                width: HIGHLIGHT_WIDTH,
                dash: dash_for(interaction.style),
            });
        }
        commands.push(DrawCommand::Arrow {
            line,
            color: palette.get(Slot::Label),
            width: ARROW_WIDTH,
            dash: dash_for(interaction.style),
        });
        hits.push(layout::interaction_line_band(sx, tx, y), index);

        if !interaction.label.is_empty() {
            let center = Point::new((sx + tx) / 2.0, y - LABEL_OFFSET);
            commands.push(DrawCommand::Text {
                center,
                text: interaction.label.clone(),
                color: palette.get(Slot::Label),
                size: LABEL_FONT_SIZE,
            });
            hits.push(layout::label_box(center, &interaction.label), index);
        }

        commands.push(DrawCommand::Text {
            center: Point::new(INDEX_MARGIN_X, y),
            text: (index + 1).to_string(),
            color: palette.get(Slot::IndexNumber),
            size: LABEL_FONT_SIZE,
        });
    }

    if ctx.show_preview {
        if let Some(preview) = session.preview() {
            commands.push(DrawCommand::Arrow {
                line: Line::new(preview.start, preview.end),
                color: palette.get(Slot::PreviewLine),
                width: ARROW_WIDTH,
                dash: dash_for(preview.style),
            });
        }
    }

    DisplayList {
        size,
        background: palette.get(Slot::CanvasBackground),
        commands,
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqdraw_core::input::Modifiers;
    use seqdraw_core::session::EditorSession;
    use seqdraw_core::theme::Palette;

    fn session() -> EditorSession {
        let mut session = EditorSession::new();
        let _ = session.add_actor("Alice");
        let _ = session.add_actor("Bob");
        session
    }

    fn texts(list: &DisplayList) -> Vec<&str> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_session() {
        let session = EditorSession::new();
        let list = build_display_list(&RenderContext::new(&session));
        assert!(list.commands.is_empty());
        assert!(list.hits.is_empty());
        assert_eq!(list.size, Size::new(1000.0, 700.0));
        assert_eq!(list.background, Palette::LIGHT.get(Slot::CanvasBackground));
    }

    #[test]
    fn test_actor_commands_in_order() {
        let session = session();
        let list = build_display_list(&RenderContext::new(&session));
        assert_eq!(list.commands.len(), 8);
        assert!(matches!(
            list.commands[0],
            DrawCommand::FillRect { rect, .. } if rect == Rect::new(40.0, 20.0, 160.0, 60.0)
        ));
        assert!(matches!(list.commands[1], DrawCommand::StrokeRect { .. }));
        assert!(matches!(
            &list.commands[2],
            DrawCommand::Text { center, text, .. } if *center == Point::new(100.0, 40.0) && text == "Alice"
        ));
        match &list.commands[3] {
            DrawCommand::Line { line, dash, .. } => {
                assert_eq!(*line, Line::new((100.0, 60.0), (100.0, 680.0)));
                assert_eq!(*dash, Some(LIFELINE_DASH));
            }
            other => panic!("expected lifeline, got {:?}", other),
        }
    }

    #[test]
    fn test_selected_actor_outline_drawn_first() {
        let mut session = session();
        let _ = session.select_actor(2);
        let list = build_display_list(&RenderContext::new(&session));
        match &list.commands[4] {
            DrawCommand::StrokeRect { rect, color, width } => {
                assert_eq!(*rect, Rect::new(197.0, 17.0, 323.0, 63.0));
                assert_eq!(*color, Palette::LIGHT.get(Slot::Accent));
                assert_eq!(*width, OUTLINE_WIDTH);
            }
            other => panic!("expected outline, got {:?}", other),
        }
        assert!(matches!(list.commands[5], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_interaction_commands_and_hits() {
        let mut session = session();
        session.add_interaction(1, 2, "hello", LineStyle::Solid).unwrap();
        session.add_interaction(2, 1, "", LineStyle::Dashed).unwrap();
        let list = build_display_list(&RenderContext::new(&session));

        assert_eq!(texts(&list), vec!["Alice", "Bob", "hello", "1", "2"]);
        let arrows: Vec<(&Line, &Option<[f64; 2]>)> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arrow { line, dash, .. } => Some((line, dash)),
                _ => None,
            })
            .collect();
        assert_eq!(arrows.len(), 2);
        assert_eq!(*arrows[0].0, Line::new((100.0, 120.0), (260.0, 120.0)));
        assert_eq!(*arrows[0].1, None);
        assert_eq!(*arrows[1].0, Line::new((260.0, 180.0), (100.0, 180.0)));
        assert_eq!(*arrows[1].1, Some(INTERACTION_DASH));

        // Line band plus label box for the first, line band only for the second.
        assert_eq!(list.hits.len(), 3);
        assert_eq!(list.hits.interaction_at(Point::new(180.0, 110.0)), Some(0));
        assert_eq!(list.hits.interaction_at(Point::new(150.0, 182.0)), Some(1));
        assert_eq!(list.hits.interaction_at(Point::new(150.0, 150.0)), None);
    }

    #[test]
    fn test_selected_interaction_highlight_precedes_arrow() {
        let mut session = session();
        session.add_interaction(1, 2, "", LineStyle::Solid).unwrap();
        let _ = session.select_interaction(0);
        let list = build_display_list(&RenderContext::new(&session));
        let position = list
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { width, .. } if *width == HIGHLIGHT_WIDTH))
            .unwrap();
        assert!(matches!(list.commands[position + 1], DrawCommand::Arrow { .. }));
    }

    #[test]
    fn test_highlight_follows_interaction_dash() {
        let mut session = session();
        session.add_interaction(1, 2, "", LineStyle::Dashed).unwrap();
        let _ = session.select_interaction(0);
        let list = build_display_list(&RenderContext::new(&session));
        let highlight = list
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Line { width, dash, .. } if *width == HIGHLIGHT_WIDTH => Some(*dash),
                _ => None,
            })
            .unwrap();
        assert_eq!(highlight, Some(INTERACTION_DASH));
    }

    #[test]
    fn test_unresolved_interaction_skipped() {
        let mut session = session();
        session.add_interaction(1, 9, "lost", LineStyle::Solid).unwrap();
        session.add_interaction(1, 2, "kept", LineStyle::Solid).unwrap();
        let list = build_display_list(&RenderContext::new(&session));
        assert_eq!(texts(&list), vec!["Alice", "Bob", "kept", "2"]);
        assert_eq!(list.hits.interaction_at(Point::new(180.0, 180.0)), Some(1));
        assert_eq!(list.hits.interaction_at(Point::new(180.0, 120.0)), None);
    }

    #[test]
    fn test_preview_drawn_last_and_optional() {
        let mut session = session();
        session.set_new_interaction_style(LineStyle::Dashed);
        let _ = session.press(Point::new(100.0, 40.0), Modifiers::default());
        let _ = session.drag(Point::new(200.0, 150.0));

        let list = build_display_list(&RenderContext::new(&session));
        match list.commands.last() {
            Some(DrawCommand::Arrow { line, color, dash, .. }) => {
                assert_eq!(*line, Line::new((100.0, 120.0), (200.0, 150.0)));
                assert_eq!(*color, Palette::LIGHT.get(Slot::PreviewLine));
                assert_eq!(*dash, Some(INTERACTION_DASH));
            }
            other => panic!("expected preview arrow, got {:?}", other),
        }

        let export = build_display_list(&RenderContext::new(&session).without_preview());
        assert!(!export.commands.iter().any(|c| matches!(c, DrawCommand::Arrow { .. })));
    }

    #[test]
    fn test_palette_slots_drive_colors() {
        let session = session();
        let list = build_display_list(&RenderContext::new(&session).with_palette(Palette::DARK));
        assert_eq!(list.background, Palette::DARK.get(Slot::CanvasBackground));
        assert!(matches!(
            list.commands[0],
            DrawCommand::FillRect { color, .. } if color == Palette::DARK.get(Slot::ActorFill)
        ));
    }
}

//! Selectable list rows.

use egui::{Align2, CornerRadius, CursorIcon, FontId, Pos2, Response, Sense, Ui, vec2};

use crate::{sizing, theme};

/// One selectable row of text. Returns the row's response;
/// callers check `clicked()` and may call `scroll_to_me`.
pub fn list_row(ui: &mut Ui, text: &str, selected: bool) -> Response {
    let colors = theme::colors(ui);
    let size = vec2(ui.available_width(), sizing::ROW_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg = if selected {
            Some(colors.selected_bg)
        } else if response.hovered() {
            Some(colors.hover_bg)
        } else {
            None
        };
        if let Some(bg) = bg {
            ui.painter().rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg);
        }
        let painter = ui.painter().with_clip_rect(rect.shrink(2.0));
        painter.text(
            Pos2::new(rect.left() + 6.0, rect.center().y),
            Align2::LEFT_CENTER,
            text,
            FontId::proportional(12.0),
            if selected { colors.accent } else { colors.text },
        );
    }

    response.on_hover_cursor(CursorIcon::PointingHand)
}

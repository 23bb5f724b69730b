//! Menu components: menu items, separators, panel frames.

use egui::{Color32, Context, CornerRadius, CursorIcon, Frame, Margin, Pos2, Sense, Stroke, Ui, vec2};

use crate::theme::{self, WidgetColors};
use crate::sizing;

/// Show a menu item with label and optional shortcut.
pub fn menu_item(ui: &mut Ui, label: &str, shortcut: &str) -> bool {
    menu_item_enabled(ui, label, shortcut, true)
}

/// Show a menu item that can be enabled/disabled.
pub fn menu_item_enabled(ui: &mut Ui, label: &str, shortcut: &str, enabled: bool) -> bool {
    let colors = theme::colors(ui);
    let size = vec2(ui.available_width().max(180.0), 28.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        if enabled && response.hovered() {
            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), colors.hover_bg);
        }

        ui.painter().text(
            Pos2::new(rect.left() + 12.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(13.0),
            if enabled { colors.text } else { colors.text_disabled },
        );

        if !shortcut.is_empty() {
            ui.painter().text(
                Pos2::new(rect.right() - 12.0, rect.center().y),
                egui::Align2::RIGHT_CENTER,
                shortcut,
                egui::FontId::proportional(12.0),
                if enabled { colors.text_muted } else { colors.text_disabled },
            );
        }
    }

    let clicked = response.clicked();
    if enabled {
        response.on_hover_cursor(CursorIcon::PointingHand);
    }
    enabled && clicked
}

/// Draw a menu separator line.
pub fn menu_separator(ui: &mut Ui) {
    ui.add_space(4.0);
    let rect = ui.available_rect_before_wrap();
    let y = rect.top();
    ui.painter().line_segment(
        [Pos2::new(rect.left() + 8.0, y), Pos2::new(rect.right() - 8.0, y)],
        Stroke::new(1.0, theme::colors(ui).border),
    );
    ui.add_space(4.0);
}

fn context_colors(ctx: &Context) -> WidgetColors {
    if ctx.style().visuals.dark_mode { theme::DARK } else { theme::LIGHT }
}

/// Standard panel frame with shadow, used for the side panel and dialogs.
pub fn panel_frame(ctx: &Context) -> Frame {
    let colors = context_colors(ctx);
    Frame::new()
        .fill(colors.panel_bg)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, colors.border))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(10))
}

/// Frame for the top menu and document tab bar.
pub fn toolbar_frame(ctx: &Context) -> Frame {
    let colors = context_colors(ctx);
    Frame::new()
        .fill(colors.panel_bg)
        .stroke(Stroke::new(1.0, colors.border))
        .inner_margin(Margin::symmetric(8, 4))
}

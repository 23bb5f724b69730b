//! Layout helpers: separators, section labels.

use egui::{Pos2, Stroke, Ui};

use crate::theme;

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
        Stroke::new(1.0, theme::colors(ui).border),
    );
    ui.add_space(8.0);
}

/// Draw a short vertical separator between toolbar groups.
pub fn vertical_separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let height = 14.0;
    let x = rect.left() + 1.0;
    let top = rect.center().y - height / 2.0;
    ui.painter().line_segment(
        [Pos2::new(x, top), Pos2::new(x, top + height)],
        Stroke::new(1.0, theme::colors(ui).border),
    );
    ui.add_space(3.0);
}

/// Draw a section label (small, muted, uppercase text).
pub fn section_label(ui: &mut Ui, text: &str) {
    let color = theme::colors(ui).text_muted;
    ui.label(egui::RichText::new(text.to_uppercase()).size(10.0).color(color));
}

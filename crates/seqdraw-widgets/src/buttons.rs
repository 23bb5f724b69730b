//! Button components: text buttons, toggle buttons, segmented choices.

use egui::{Align2, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::{sizing, theme};

/// A toggle button with text label.
/// Uses a solid accent background while on.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    min_width: Option<f32>,
    tooltip: Option<&'a str>,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            min_width: None,
            tooltip: None,
        }
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let colors = theme::colors(ui);
        let font_id = FontId::proportional(12.0);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), colors.text);
        let text_width = galley.size().x + 16.0;
        let width = self.min_width.map_or(text_width, |w| w.max(text_width));
        let (rect, response) = ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                colors.accent
            } else if response.hovered() {
                colors.hover_bg
            } else {
                colors.button_bg
            };
            let text_color = if self.selected { colors.on_accent } else { colors.text };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        let response = match self.tooltip {
            Some(tooltip) => response.on_hover_text(tooltip),
            None => response,
        };
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A full-width action button with optional shortcut hint.
pub struct TextButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
    enabled: bool,
}

impl<'a> TextButton<'a> {
    /// Create a new text button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
            enabled: true,
        }
    }

    /// Add a shortcut hint.
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Grey the button out and ignore clicks when false.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let colors = theme::colors(ui);
        let size = vec2(ui.available_width(), sizing::BUTTON_HEIGHT);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.enabled && response.hovered() {
                colors.hover_bg
            } else {
                colors.button_bg
            };
            let text_color = if self.enabled { colors.text } else { colors.text_disabled };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                Pos2::new(rect.left() + 8.0, rect.center().y),
                Align2::LEFT_CENTER,
                self.label,
                FontId::proportional(12.0),
                text_color,
            );
            if let Some(shortcut) = self.shortcut {
                ui.painter().text(
                    Pos2::new(rect.right() - 8.0, rect.center().y),
                    Align2::RIGHT_CENTER,
                    shortcut,
                    FontId::proportional(11.0),
                    if self.enabled { colors.text_muted } else { colors.text_disabled },
                );
            }
        }

        if self.enabled {
            let clicked = response.clicked();
            response.on_hover_cursor(CursorIcon::PointingHand);
            clicked
        } else {
            false
        }
    }
}

/// A row of mutually exclusive text options.
pub struct Segmented<'a, T: Copy + PartialEq> {
    options: &'a [(T, &'a str)],
    current: Option<T>,
    enabled: bool,
}

impl<'a, T: Copy + PartialEq> Segmented<'a, T> {
    /// `current` of `None` shows no option as active.
    pub fn new(options: &'a [(T, &'a str)], current: Option<T>) -> Self {
        Self {
            options,
            current,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the control and return the newly chosen value, if any.
    pub fn show(self, ui: &mut Ui) -> Option<T> {
        if self.options.is_empty() {
            return None;
        }
        let colors = theme::colors(ui);
        let base_id = ui.next_auto_id();
        let size = vec2(ui.available_width(), sizing::BUTTON_HEIGHT);
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let segment_width = rect.width() / self.options.len() as f32;
        let radius = CornerRadius::same(sizing::CORNER_RADIUS);

        ui.painter().rect_filled(rect, radius, colors.button_bg);
        ui.painter()
            .rect_stroke(rect, radius, Stroke::new(1.0, colors.border), StrokeKind::Inside);

        let mut chosen = None;
        for (i, (value, label)) in self.options.iter().enumerate() {
            let segment = Rect::from_min_size(
                Pos2::new(rect.left() + segment_width * i as f32, rect.top()),
                vec2(segment_width, rect.height()),
            );
            let id = base_id.with(("segment", i));
            let sense = if self.enabled { Sense::click() } else { Sense::hover() };
            let response = ui.interact(segment, id, sense);
            let active = self.current == Some(*value);

            let (bg, fg) = if !self.enabled {
                (None, colors.text_disabled)
            } else if active {
                (Some(colors.accent), colors.on_accent)
            } else if response.hovered() {
                (Some(colors.hover_bg), colors.text)
            } else {
                (None, colors.text)
            };
            if let Some(bg) = bg {
                ui.painter().rect_filled(segment.shrink(1.0), radius, bg);
            }
            ui.painter()
                .text(segment.center(), Align2::CENTER_CENTER, *label, FontId::proportional(12.0), fg);

            if self.enabled && response.clicked() && !active {
                chosen = Some(*value);
            }
            if self.enabled {
                response.on_hover_cursor(CursorIcon::PointingHand);
            }
        }
        chosen
    }
}

//! Styled egui widgets for the SeqDraw editor.
//!
//! - **Buttons**: text buttons with shortcut hints, toggle buttons, segmented choices
//! - **List**: selectable rows for the interaction list
//! - **Menu**: menu items, separators, panel frames
//! - **Layout**: section labels, separators
//!
//! Every widget reads its colors from [`theme::colors`], which follows the
//! light or dark mode of the surrounding `Ui`.

pub mod buttons;
pub mod layout;
pub mod list;
pub mod menu;

pub use buttons::{Segmented, TextButton, ToggleButton};
pub use layout::{section_label, separator, vertical_separator};
pub use list::list_row;
pub use menu::{menu_item, menu_item_enabled, menu_separator, panel_frame, toolbar_frame};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Standard button height
    pub const BUTTON_HEIGHT: f32 = 26.0;
    /// Height of an interaction list row
    pub const ROW_HEIGHT: f32 = 22.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Widget colors for light and dark mode.
pub mod theme {
    use egui::{Color32, Ui};

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct WidgetColors {
        pub text: Color32,
        pub text_muted: Color32,
        pub text_disabled: Color32,
        pub border: Color32,
        pub accent: Color32,
        pub on_accent: Color32,
        pub button_bg: Color32,
        pub hover_bg: Color32,
        pub selected_bg: Color32,
        pub panel_bg: Color32,
    }

    pub const LIGHT: WidgetColors = WidgetColors {
        text: Color32::from_rgb(0x11, 0x18, 0x27),
        text_muted: Color32::from_rgb(0x6b, 0x72, 0x80),
        text_disabled: Color32::from_gray(180),
        border: Color32::from_rgb(0xe6, 0xe9, 0xef),
        accent: Color32::from_rgb(0x4a, 0x90, 0xe2),
        on_accent: Color32::WHITE,
        button_bg: Color32::from_gray(242),
        hover_bg: Color32::from_gray(232),
        selected_bg: Color32::from_rgb(0xe3, 0xee, 0xfb),
        panel_bg: Color32::from_rgb(0xff, 0xff, 0xff),
    };

    pub const DARK: WidgetColors = WidgetColors {
        text: Color32::from_rgb(0xe6, 0xee, 0xf6),
        text_muted: Color32::from_rgb(0x9a, 0xa3, 0xad),
        text_disabled: Color32::from_gray(90),
        border: Color32::from_rgb(0x26, 0x2a, 0x31),
        accent: Color32::from_rgb(0x4a, 0x90, 0xe2),
        on_accent: Color32::WHITE,
        button_bg: Color32::from_rgb(0x1d, 0x20, 0x28),
        hover_bg: Color32::from_rgb(0x2a, 0x2e, 0x38),
        selected_bg: Color32::from_rgb(0x1e, 0x33, 0x4f),
        panel_bg: Color32::from_rgb(0x11, 0x12, 0x17),
    };

    /// Colors matching the dark mode flag of `ui`.
    pub fn colors(ui: &Ui) -> WidgetColors {
        if ui.visuals().dark_mode { DARK } else { LIGHT }
    }
}

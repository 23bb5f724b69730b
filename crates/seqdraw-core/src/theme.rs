//! Light and dark palettes with named color slots.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ThemeColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// True when every RGB channel is within `tolerance` of `other`.
    pub fn is_near(self, other: ThemeColor, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
    }
}

impl From<ThemeColor> for Color {
    fn from(c: ThemeColor) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

/// Named palette slots. Rendering refers to colors only through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    AppBackground,
    CardBackground,
    Text,
    MutedText,
    Accent,
    CardBorder,
    CanvasBackground,
    ActorFill,
    ActorOutline,
    ActorText,
    Lifeline,
    Label,
    IndexNumber,
    PreviewLine,
}

/// Resolved light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

/// User theme choice. `System` follows the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::System,
        ThemePreference::Light,
        ThemePreference::Dark,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::System => "System",
            ThemePreference::Light => "Light",
            ThemePreference::Dark => "Dark",
        }
    }

    /// Resolve against the system theme; unknown system themes count as light.
    pub fn resolve(self, system: Option<ThemeKind>) -> ThemeKind {
        match self {
            ThemePreference::Light => ThemeKind::Light,
            ThemePreference::Dark => ThemeKind::Dark,
            ThemePreference::System => system.unwrap_or(ThemeKind::Light),
        }
    }
}

/// Colors for every [`Slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub kind: ThemeKind,
    app_bg: ThemeColor,
    card_bg: ThemeColor,
    text_fg: ThemeColor,
    muted_fg: ThemeColor,
    accent: ThemeColor,
    card_border: ThemeColor,
    canvas_bg: ThemeColor,
    actor_fill: ThemeColor,
    actor_outline: ThemeColor,
    actor_text: ThemeColor,
    lifeline: ThemeColor,
    label_fg: ThemeColor,
    index_fg: ThemeColor,
    preview_line: ThemeColor,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        kind: ThemeKind::Light,
        app_bg: ThemeColor::rgb(0xf5, 0xf7, 0xfa),
        card_bg: ThemeColor::rgb(0xff, 0xff, 0xff),
        text_fg: ThemeColor::rgb(0x11, 0x18, 0x27),
        muted_fg: ThemeColor::rgb(0x6b, 0x72, 0x80),
        accent: ThemeColor::rgb(0x4a, 0x90, 0xe2),
        card_border: ThemeColor::rgb(0xe6, 0xe9, 0xef),
        canvas_bg: ThemeColor::rgb(0xff, 0xff, 0xff),
        actor_fill: ThemeColor::rgb(0xf0, 0xf0, 0xff),
        actor_outline: ThemeColor::rgb(0x00, 0x00, 0x00),
        actor_text: ThemeColor::rgb(0x11, 0x11, 0x11),
        lifeline: ThemeColor::rgb(0x88, 0x88, 0x88),
        label_fg: ThemeColor::rgb(0x22, 0x22, 0x22),
        index_fg: ThemeColor::rgb(0x66, 0x66, 0x66),
        preview_line: ThemeColor::rgb(0x99, 0x99, 0x99),
    };

    pub const DARK: Palette = Palette {
        kind: ThemeKind::Dark,
        app_bg: ThemeColor::rgb(0x11, 0x12, 0x17),
        card_bg: ThemeColor::rgb(0x11, 0x12, 0x17),
        text_fg: ThemeColor::rgb(0xe6, 0xee, 0xf6),
        muted_fg: ThemeColor::rgb(0x9a, 0xa3, 0xad),
        accent: ThemeColor::rgb(0x4a, 0x90, 0xe2),
        card_border: ThemeColor::rgb(0x0b, 0x11, 0x16),
        canvas_bg: ThemeColor::rgb(0x11, 0x12, 0x17),
        actor_fill: ThemeColor::rgb(0x18, 0x1b, 0x22),
        actor_outline: ThemeColor::rgb(0x26, 0x2a, 0x31),
        actor_text: ThemeColor::rgb(0xe6, 0xee, 0xf6),
        lifeline: ThemeColor::rgb(0x2f, 0x34, 0x40),
        label_fg: ThemeColor::rgb(0xe6, 0xee, 0xf6),
        index_fg: ThemeColor::rgb(0x9a, 0xa3, 0xad),
        preview_line: ThemeColor::rgb(0x6b, 0x72, 0x80),
    };

    pub fn for_kind(kind: ThemeKind) -> Palette {
        match kind {
            ThemeKind::Light => Palette::LIGHT,
            ThemeKind::Dark => Palette::DARK,
        }
    }

    pub fn get(&self, slot: Slot) -> ThemeColor {
        match slot {
            Slot::AppBackground => self.app_bg,
            Slot::CardBackground => self.card_bg,
            Slot::Text => self.text_fg,
            Slot::MutedText => self.muted_fg,
            Slot::Accent => self.accent,
            Slot::CardBorder => self.card_border,
            Slot::CanvasBackground => self.canvas_bg,
            Slot::ActorFill => self.actor_fill,
            Slot::ActorOutline => self.actor_outline,
            Slot::ActorText => self.actor_text,
            Slot::Lifeline => self.lifeline,
            Slot::Label => self.label_fg,
            Slot::IndexNumber => self.index_fg,
            Slot::PreviewLine => self.preview_line,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::LIGHT
    }
}

//! Renderer trait abstraction.

use kurbo::{Affine, Vec2};
use peniko::Color;
use seqdraw_core::hit::HitIndex;
use seqdraw_core::session::EditorSession;
use seqdraw_core::theme::{Palette, Slot};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The session to draw: diagram, selection and gesture preview.
    pub session: &'a EditorSession,
    /// Colors by slot.
    pub palette: Palette,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Top-left of the canvas within the window, in logical pixels.
    pub origin: Vec2,
    /// Draw the live interaction preview line.
    pub show_preview: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(session: &'a EditorSession) -> Self {
        Self {
            session,
            palette: Palette::default(),
            scale_factor: 1.0,
            origin: Vec2::ZERO,
            show_preview: true,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Canvas coordinates to physical window pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * Affine::translate(self.origin)
    }

    /// Leave out transient gesture feedback, e.g. for export.
    pub fn without_preview(mut self) -> Self {
        self.show_preview = false;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame.
    ///
    /// Returns the hit index of what was drawn, to be installed into the
    /// session.
    fn build_scene(&mut self, ctx: &RenderContext) -> HitIndex;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.palette.get(Slot::CanvasBackground).into()
    }
}

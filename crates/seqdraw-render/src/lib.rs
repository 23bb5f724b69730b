//! SeqDraw Render Library
//!
//! Turns an editing session into a display list, paints it with Vello, and
//! encodes rendered pixels for raster export.

mod display;
mod export;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use display::{DisplayList, DrawCommand, build_display_list};
pub use export::{CHROMA_KEY_TOLERANCE, ExportError, ExportFormat, ExportOptions, RasterImage, encode, export_raster};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;

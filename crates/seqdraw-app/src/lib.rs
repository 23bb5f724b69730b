//! SeqDraw Application
//!
//! The desktop shell: window, GPU surface, egui panels and the glue that
//! routes input into the active editing session.

mod app;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use shortcuts::{Command, Shortcut, ShortcutRegistry};
pub use ui::{render_ui, UiAction, UiState};

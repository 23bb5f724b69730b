//! SeqDraw Core Library
//!
//! Platform-agnostic data model and editing logic for the SeqDraw sequence
//! diagram editor: the diagram itself, the per-document editing session with
//! its gesture state machine and selection, and persistence.

pub mod dialogs;
pub mod diagram;
pub mod gesture;
pub mod hit;
pub mod input;
pub mod layout;
pub mod preferences;
pub mod selection;
pub mod session;
pub mod storage;
pub mod theme;
pub mod workspace;

pub use dialogs::{Dialogs, Notice, NoticeLevel, Prompt, PromptResponse};
pub use diagram::{Actor, ActorId, Diagram, DiagramError, Interaction, LineStyle, MoveDirection};
pub use gesture::{GestureState, PreviewLine};
pub use hit::HitIndex;
pub use input::{CanvasEvent, InputState, Modifiers, MouseButton, PointerEvent};
pub use preferences::{Preferences, PreferencesError, PreferencesStore};
pub use selection::{InteractionList, Selection};
pub use session::{EditorSession, Update};
pub use theme::{Palette, Slot, ThemeColor, ThemeKind, ThemePreference};
pub use workspace::{Document, DocumentId, Workspace};

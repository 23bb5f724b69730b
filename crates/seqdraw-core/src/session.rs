//! Editing state for one open document.
//!
//! An [`EditorSession`] bundles the diagram with everything that is only
//! meaningful while it is being edited: selection, gesture state, the textual
//! interaction list, the hit index of the last render pass, the pending
//! prompt and queued notices. Gesture handling lives in [`crate::gesture`],
//! selection and list synchronization in [`crate::selection`].

use crate::diagram::{ActorId, Diagram, DiagramError, LineStyle};
use crate::dialogs::{Dialogs, Notice, Prompt, PromptResponse};
use crate::gesture::GestureState;
use crate::hit::HitIndex;
use crate::layout::DEFAULT_CANVAS_SIZE;
use crate::selection::{InteractionList, Selection};
use kurbo::Size;
use std::collections::VecDeque;
use std::ops::{BitOr, BitOrAssign};

/// What the host has to refresh after a session operation.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Update {
    /// The canvas must be redrawn.
    pub redraw: bool,
    /// The interaction list widget must be refreshed from [`EditorSession::list`].
    pub rebuild_list: bool,
}

impl Update {
    pub const NONE: Update = Update {
        redraw: false,
        rebuild_list: false,
    };
    pub const REDRAW: Update = Update {
        redraw: true,
        rebuild_list: false,
    };
    pub const ALL: Update = Update {
        redraw: true,
        rebuild_list: true,
    };

    pub fn is_none(self) -> bool {
        !self.redraw && !self.rebuild_list
    }
}

impl BitOr for Update {
    type Output = Update;

    fn bitor(self, rhs: Update) -> Update {
        Update {
            redraw: self.redraw || rhs.redraw,
            rebuild_list: self.rebuild_list || rhs.rebuild_list,
        }
    }
}

impl BitOrAssign for Update {
    fn bitor_assign(&mut self, rhs: Update) {
        *self = *self | rhs;
    }
}

/// In-memory state of one document being edited.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub(crate) diagram: Diagram,
    pub(crate) selection: Selection,
    pub(crate) gesture: GestureState,
    pub(crate) list: InteractionList,
    pub(crate) hits: HitIndex,
    pub(crate) canvas_size: Size,
    /// When on, pressing an actor starts an interaction drag immediately.
    pub(crate) creation_mode: bool,
    pub(crate) new_interaction_style: LineStyle,
    pub(crate) pending_prompt: Option<Prompt>,
    pub(crate) notices: VecDeque<Notice>,
    modified: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Create a session over an empty diagram.
    pub fn new() -> Self {
        Self::from_diagram(Diagram::new())
    }

    /// Create a session over an existing diagram.
    pub fn from_diagram(diagram: Diagram) -> Self {
        let list = InteractionList::build(&diagram);
        Self {
            diagram,
            selection: Selection::None,
            gesture: GestureState::Idle,
            list,
            hits: HitIndex::new(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            creation_mode: false,
            new_interaction_style: LineStyle::Solid,
            pending_prompt: None,
            notices: VecDeque::new(),
            modified: false,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Textual projection of the interaction sequence.
    pub fn list(&self) -> &InteractionList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut InteractionList {
        &mut self.list
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Size) -> Update {
        if self.canvas_size == size {
            return Update::NONE;
        }
        self.canvas_size = size;
        Update::REDRAW
    }

    /// Hit index of the last render pass.
    pub fn hit_index(&self) -> &HitIndex {
        &self.hits
    }

    /// Install the hit index produced by a render pass.
    pub fn install_hit_index(&mut self, hits: HitIndex) {
        self.hits = hits;
    }

    pub fn creation_mode(&self) -> bool {
        self.creation_mode
    }

    /// Toggle creation mode. Turning it off abandons an interaction being drawn.
    pub fn set_creation_mode(&mut self, on: bool) -> Update {
        log::debug!("Interaction creation mode {}", if on { "on" } else { "off" });
        self.creation_mode = on;
        if !on && matches!(self.gesture, GestureState::DraggingToCreateInteraction { .. }) {
            return self.cancel_gesture();
        }
        Update::NONE
    }

    /// Style given to interactions created by dragging.
    pub fn new_interaction_style(&self) -> LineStyle {
        self.new_interaction_style
    }

    pub fn set_new_interaction_style(&mut self, style: LineStyle) {
        self.new_interaction_style = style;
    }

    /// Whether the document changed since it was created, loaded or saved.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub(crate) fn touch(&mut self) {
        self.modified = true;
    }

    /// Swap in a freshly loaded diagram, resetting all transient state.
    pub fn replace_diagram(&mut self, diagram: Diagram) -> Update {
        let canvas_size = self.canvas_size;
        let creation_mode = self.creation_mode;
        let style = self.new_interaction_style;
        *self = Self::from_diagram(diagram);
        self.canvas_size = canvas_size;
        self.creation_mode = creation_mode;
        self.new_interaction_style = style;
        Update::ALL
    }

    /// Ask the host for the name of a new actor.
    pub fn request_add_actor(&mut self) -> Update {
        self.open_prompt(Prompt::ActorName)
    }

    /// Add an actor. Rejected names raise an error notice.
    pub fn add_actor(&mut self, name: &str) -> Update {
        match self.diagram.add_actor(name) {
            Ok(actor) => {
                log::info!("Added actor {} ({})", actor.id, actor.name);
                self.touch();
                Update::REDRAW
            }
            Err(err) => {
                log::warn!("Rejected actor: {}", err);
                self.notify(Notice::error("Invalid", err.to_string()));
                Update::NONE
            }
        }
    }

    /// Append an interaction and refresh the list. Selection is preserved.
    pub fn add_interaction(
        &mut self,
        source: ActorId,
        target: ActorId,
        label: &str,
        style: LineStyle,
    ) -> Result<usize, DiagramError> {
        let index = self.diagram.add_interaction(source, target, label, style)?;
        log::info!("Added interaction {} ({} -> {})", index, source, target);
        self.touch();
        self.rebuild_list(None);
        Ok(index)
    }

    /// The prompt the host must answer before editing can continue.
    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.pending_prompt.as_ref()
    }

    /// True while a prompt is pending; pointer events are ignored meanwhile.
    pub fn is_modal(&self) -> bool {
        self.pending_prompt.is_some()
    }

    pub(crate) fn open_prompt(&mut self, prompt: Prompt) -> Update {
        if let Some(pending) = &self.pending_prompt {
            log::warn!("Ignoring {:?}, {:?} is still pending", prompt, pending);
            return Update::NONE;
        }
        self.pending_prompt = Some(prompt);
        Update::NONE
    }

    /// Apply the host's answer to the pending prompt.
    pub fn resolve_prompt(&mut self, response: PromptResponse) -> Update {
        let Some(prompt) = self.pending_prompt.take() else {
            return Update::NONE;
        };
        let PromptResponse::Submitted(text) = response else {
            log::debug!("{:?} cancelled", prompt);
            return Update::NONE;
        };
        match prompt {
            Prompt::ActorName => self.add_actor(&text),
            Prompt::InteractionLabel { index } | Prompt::EditLabel { index, .. } => {
                match self.diagram.update_interaction_label(index, &text) {
                    Ok(()) => {
                        self.touch();
                        self.rebuild_list(None);
                        Update::ALL
                    }
                    Err(err) => {
                        log::warn!("Label not applied: {}", err);
                        Update::NONE
                    }
                }
            }
        }
    }

    /// Queue a notice for the host.
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Queued notices, oldest first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Remove the oldest notice once the user has seen it.
    pub fn pop_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Remove and return all queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Answer pending prompts and show queued notices through a blocking
    /// dialog collaborator.
    pub fn drive_dialogs(&mut self, dialogs: &mut dyn Dialogs) -> Update {
        let mut update = Update::NONE;
        loop {
            if let Some(prompt) = self.pending_prompt.clone() {
                let answer = dialogs.ask_string(prompt.title(), prompt.message(), prompt.initial());
                update |= self.resolve_prompt(answer.into());
                continue;
            }
            let Some(notice) = self.notices.pop_front() else {
                break;
            };
            dialogs.show(&notice);
        }
        update
    }
}

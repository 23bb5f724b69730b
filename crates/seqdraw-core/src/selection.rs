//! Selection state and synchronization with the interaction list.
//!
//! At most one element is selected at a time. The list view highlights the
//! selected interaction, and the canvas draws the same selection, so both
//! always read from [`EditorSession::selection`].

use crate::diagram::{ActorId, Diagram, Interaction, LineStyle, MoveDirection};
use crate::dialogs::Prompt;
use crate::session::{EditorSession, Update};

/// Currently selected element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Actor(ActorId),
    Interaction(usize),
}

impl Selection {
    pub fn actor(self) -> Option<ActorId> {
        match self {
            Selection::Actor(id) => Some(id),
            _ => None,
        }
    }

    pub fn interaction(self) -> Option<usize> {
        match self {
            Selection::Interaction(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Selection::None
    }
}

/// Text of one list row: `"<n>. <source> -> <target> [<style>]: <label>"`.
pub fn row_text(diagram: &Diagram, index: usize, interaction: &Interaction) -> String {
    format!(
        "{}. {} -> {} [{}]: {}",
        index + 1,
        diagram.actor_label(interaction.source_id),
        diagram.actor_label(interaction.target_id),
        interaction.style,
        interaction.label
    )
}

/// Rows of the interaction list plus a pending scroll request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionList {
    rows: Vec<String>,
    scroll_to: Option<usize>,
}

impl InteractionList {
    /// Build the rows for every interaction in order.
    pub fn build(diagram: &Diagram) -> Self {
        let rows = diagram
            .interactions()
            .iter()
            .enumerate()
            .map(|(i, interaction)| row_text(diagram, i, interaction))
            .collect();
        Self {
            rows,
            scroll_to: None,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Take the row the list view should scroll into view, if any.
    pub fn take_scroll_request(&mut self) -> Option<usize> {
        self.scroll_to.take()
    }
}

impl EditorSession {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_interaction(&self) -> Option<usize> {
        self.selection.interaction()
    }

    pub fn selected_actor(&self) -> Option<ActorId> {
        self.selection.actor()
    }

    /// Select an interaction, clearing any actor selection.
    ///
    /// An out-of-range index clears the selection instead.
    pub fn select_interaction(&mut self, index: usize) -> Update {
        if index >= self.diagram.interactions().len() {
            return self.clear_selection();
        }
        self.selection = Selection::Interaction(index);
        self.list.scroll_to = Some(index);
        Update::REDRAW
    }

    /// Select an actor, clearing any interaction selection.
    pub fn select_actor(&mut self, id: ActorId) -> Update {
        self.selection = Selection::Actor(id);
        Update::REDRAW
    }

    pub fn clear_selection(&mut self) -> Update {
        self.selection = Selection::None;
        Update::REDRAW
    }

    /// React to the list view's selection changing.
    pub fn on_list_selection(&mut self, row: Option<usize>) -> Update {
        match row {
            Some(index) if self.selection != Selection::Interaction(index) => {
                self.select_interaction(index)
            }
            Some(_) => Update::NONE,
            None if self.selection.interaction().is_some() => self.clear_selection(),
            None => Update::NONE,
        }
    }

    /// Style shown by the selected-interaction style control; `None` means
    /// the control is disabled.
    pub fn style_control(&self) -> Option<LineStyle> {
        let index = self.selection.interaction()?;
        self.diagram.interaction(index).map(|i| i.style)
    }

    /// Restyle the selected interaction. Selection is unchanged.
    pub fn set_selected_style(&mut self, style: LineStyle) -> Update {
        let Some(index) = self.selection.interaction() else {
            return Update::NONE;
        };
        if self.style_control() == Some(style) {
            return Update::NONE;
        }
        if self.diagram.update_interaction_style(index, style).is_err() {
            return Update::NONE;
        }
        self.touch();
        self.rebuild_list(None);
        Update::ALL
    }

    /// Move the selected interaction one step and keep it selected.
    pub fn move_selected(&mut self, direction: MoveDirection) -> Update {
        let Some(index) = self.selection.interaction() else {
            return Update::NONE;
        };
        let Some(new_index) = self.diagram.move_interaction(index, direction) else {
            return Update::NONE;
        };
        log::debug!("Moved interaction {} to {}", index, new_index);
        self.touch();
        self.rebuild_list(Some(new_index));
        Update::ALL
    }

    /// Delete the selected interaction and select whichever one takes its
    /// place, or the new last one.
    pub fn delete_selected(&mut self) -> Update {
        let Some(index) = self.selection.interaction() else {
            return Update::NONE;
        };
        if self.diagram.delete_interaction(index).is_none() {
            return Update::NONE;
        }
        log::info!("Deleted interaction {}", index);
        self.touch();
        let len = self.diagram.interactions().len();
        let next = if index < len {
            Some(index)
        } else {
            len.checked_sub(1)
        };
        self.rebuild_list(next);
        Update::ALL
    }

    /// Ask for a new label for the selected interaction.
    pub fn edit_selected_label(&mut self) -> Update {
        match self.selection.interaction() {
            Some(index) => self.edit_label(index),
            None => Update::NONE,
        }
    }

    /// Ask for a new label for the interaction at `index`.
    pub fn edit_label(&mut self, index: usize) -> Update {
        let Some(interaction) = self.diagram.interaction(index) else {
            return Update::NONE;
        };
        let initial = interaction.label.clone();
        self.open_prompt(Prompt::EditLabel { index, initial })
    }

    /// Recompute list rows from the diagram.
    ///
    /// With an override the given row becomes selected; otherwise the
    /// selected row is kept by position and cleared when it no longer exists.
    pub(crate) fn rebuild_list(&mut self, override_index: Option<usize>) {
        let scroll_to = self.list.scroll_to;
        self.list = InteractionList::build(&self.diagram);
        self.list.scroll_to = scroll_to;
        if let Some(index) = override_index {
            let _ = self.select_interaction(index);
        } else if matches!(self.selection, Selection::Interaction(index) if index >= self.list.len()) {
            self.selection = Selection::None;
        }
    }
}

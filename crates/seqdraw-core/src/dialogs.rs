//! Prompts and notices exchanged between an editor session and its host.
//!
//! The session never blocks on user input. It queues a [`Prompt`] and keeps
//! gesture handling suspended until the host answers with a
//! [`PromptResponse`]. Notices are queued the same way and drained by the host.

/// A modal text request raised by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Name for a new actor.
    ActorName,
    /// Label for the interaction that was just created at `index`.
    InteractionLabel { index: usize },
    /// New label for an existing interaction.
    EditLabel { index: usize, initial: String },
}

impl Prompt {
    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::ActorName => "Add Actor",
            Prompt::InteractionLabel { .. } => "Interaction Label",
            Prompt::EditLabel { .. } => "Edit Label",
        }
    }

    /// Question shown above the text field.
    pub fn message(&self) -> &'static str {
        match self {
            Prompt::ActorName => "Actor name:",
            Prompt::InteractionLabel { .. } => "Label for interaction (optional):",
            Prompt::EditLabel { .. } => "New label:",
        }
    }

    /// Text the field starts with.
    pub fn initial(&self) -> &str {
        match self {
            Prompt::EditLabel { initial, .. } => initial,
            _ => "",
        }
    }
}

/// Host answer to a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// The user confirmed. An empty string is a real value.
    Submitted(String),
    /// The user dismissed the dialog. Nothing changes.
    Cancelled,
}

impl From<Option<String>> for PromptResponse {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => PromptResponse::Submitted(text),
            None => PromptResponse::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Synchronous dialog collaborator, used by hosts that can block and by tests.
pub trait Dialogs {
    /// Ask for a line of text. `None` means the user cancelled.
    fn ask_string(&mut self, title: &str, message: &str, initial: &str) -> Option<String>;

    /// Show an informational message.
    fn info(&mut self, title: &str, message: &str);

    /// Show an error message.
    fn error(&mut self, title: &str, message: &str);

    /// Show a queued notice using the matching method.
    fn show(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => self.info(&notice.title, &notice.message),
            NoticeLevel::Error => self.error(&notice.title, &notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_initial_text() {
        assert_eq!(Prompt::ActorName.initial(), "");
        let edit = Prompt::EditLabel {
            index: 0,
            initial: "hello".to_string(),
        };
        assert_eq!(edit.initial(), "hello");
        assert_eq!(edit.title(), "Edit Label");
    }

    #[test]
    fn test_response_from_option() {
        assert_eq!(PromptResponse::from(None), PromptResponse::Cancelled);
        assert_eq!(
            PromptResponse::from(Some(String::new())),
            PromptResponse::Submitted(String::new())
        );
    }

    #[test]
    fn test_show_dispatches_by_level() {
        #[derive(Default)]
        struct Recorder {
            infos: Vec<String>,
            errors: Vec<String>,
        }
        impl Dialogs for Recorder {
            fn ask_string(&mut self, _: &str, _: &str, _: &str) -> Option<String> {
                None
            }
            fn info(&mut self, _: &str, message: &str) {
                self.infos.push(message.to_string());
            }
            fn error(&mut self, _: &str, message: &str) {
                self.errors.push(message.to_string());
            }
        }

        let mut recorder = Recorder::default();
        recorder.show(&Notice::info("Saved", "ok"));
        recorder.show(&Notice::error("Failed", "disk full"));
        assert_eq!(recorder.infos, vec!["ok"]);
        assert_eq!(recorder.errors, vec!["disk full"]);
    }
}

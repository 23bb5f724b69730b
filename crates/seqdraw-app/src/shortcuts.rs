//! Keyboard shortcut registry and documentation.

/// Editor command reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewDocument,
    OpenDocument,
    SaveDocument,
    SaveDocumentAs,
    Export,
    AddActor,
    DeleteSelected,
    MoveUp,
    MoveDown,
    EditLabel,
    Cancel,
    NextDocument,
    CloseDocument,
    ShowShortcuts,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            alt: false,
            command,
            description,
        }
    }

    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.alt {
            parts.push("Alt");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift && self.alt == alt
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("N", true, false, Command::NewDocument, "New document"),
            Shortcut::new("O", true, false, Command::OpenDocument, "Open..."),
            Shortcut::new("S", true, false, Command::SaveDocument, "Save"),
            Shortcut::new("S", true, true, Command::SaveDocumentAs, "Save As..."),
            Shortcut::new("E", true, false, Command::Export, "Export image..."),
            Shortcut::new("A", true, true, Command::AddActor, "Add actor"),
            Shortcut::new("Delete", false, false, Command::DeleteSelected, "Delete selected interaction"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelected, "Delete selected interaction"),
            Shortcut::new("Up", false, false, Command::MoveUp, "Move selected interaction up").with_alt(),
            Shortcut::new("Down", false, false, Command::MoveDown, "Move selected interaction down").with_alt(),
            Shortcut::new("F2", false, false, Command::EditLabel, "Edit label of selected interaction"),
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current drag"),
            Shortcut::new("Tab", true, false, Command::NextDocument, "Next document"),
            Shortcut::new("W", true, false, Command::CloseDocument, "Close document"),
            Shortcut::new("F1", false, false, Command::ShowShortcuts, "Show keyboard shortcuts"),
        ]
    }

    /// Find the command bound to a key press.
    pub fn lookup(key: &str, ctrl: bool, shift: bool, alt: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift, alt))
            .map(|s| s.command)
    }

    /// Display string of the first shortcut bound to `command`, or "".
    pub fn label(command: Command) -> String {
        Self::all()
            .iter()
            .find(|s| s.command == command)
            .map(Shortcut::format)
            .unwrap_or_default()
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

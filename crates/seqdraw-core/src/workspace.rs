//! Open documents and which one is active.

use crate::diagram::Diagram;
use crate::dialogs::Notice;
use crate::session::EditorSession;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable identifier of an open document for the lifetime of the window.
pub type DocumentId = Uuid;

/// One open document.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// File the document was loaded from or last saved to.
    pub path: Option<PathBuf>,
    untitled_number: usize,
    pub session: EditorSession,
}

impl Document {
    /// File name, or "Untitled N" for documents never saved.
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("Untitled {}", self.untitled_number))
    }

    /// Title with a trailing `*` when there are unsaved changes.
    pub fn display_title(&self) -> String {
        if self.session.is_modified() {
            format!("{}*", self.title())
        } else {
            self.title()
        }
    }
}

/// Document manager. Always holds at least one document.
#[derive(Debug, Clone)]
pub struct Workspace {
    documents: Vec<Document>,
    active: usize,
    untitled_counter: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a workspace with a single empty document.
    pub fn new() -> Self {
        let mut workspace = Self {
            documents: Vec::new(),
            active: 0,
            untitled_counter: 0,
        };
        workspace.new_document();
        workspace
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Document {
        &self.documents[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Document {
        &mut self.documents[self.active]
    }

    pub fn session(&self) -> &EditorSession {
        &self.active().session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.active_mut().session
    }

    /// Open an empty document and make it active.
    pub fn new_document(&mut self) -> usize {
        self.untitled_counter += 1;
        self.push(Document {
            id: Uuid::new_v4(),
            path: None,
            untitled_number: self.untitled_counter,
            session: EditorSession::new(),
        })
    }

    /// Open a loaded diagram and make it active.
    ///
    /// An untouched empty active document is replaced instead of kept around.
    /// Opening a path that is already open reloads it, unless it has unsaved
    /// changes, in which case the open copy is kept and a notice is queued.
    pub fn open_document(&mut self, diagram: Diagram, path: PathBuf) -> usize {
        if let Some(index) = self.documents.iter().position(|d| d.path.as_deref() == Some(path.as_path())) {
            self.active = index;
            let document = &mut self.documents[index];
            if document.session.is_modified() {
                log::warn!("Not reloading {}: it has unsaved changes", path.display());
                let message = format!("{} is already open with unsaved changes", document.title());
                document.session.notify(Notice::info("Open", message));
            } else {
                log::info!("Reloading {}", path.display());
                let _ = document.session.replace_diagram(diagram);
            }
            return index;
        }
        let document = Document {
            id: Uuid::new_v4(),
            path: Some(path),
            untitled_number: 0,
            session: EditorSession::from_diagram(diagram),
        };
        if self.active().path.is_none() && !self.session().is_modified() && self.session().diagram().actors().is_empty() {
            self.documents[self.active] = document;
            return self.active;
        }
        self.push(document)
    }

    fn push(&mut self, document: Document) -> usize {
        self.documents.push(document);
        self.active = self.documents.len() - 1;
        self.active
    }

    /// Activate the document at `index`. Returns false if out of range.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.documents.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Activate the next document, wrapping around.
    pub fn next_document(&mut self) {
        self.active = (self.active + 1) % self.documents.len();
    }

    /// Close the active document. Closing the last one leaves a fresh
    /// empty document.
    pub fn close_active(&mut self) {
        let closed = self.documents.remove(self.active);
        log::info!("Closed {}", closed.title());
        if self.documents.is_empty() {
            self.new_document();
        } else if self.active >= self.documents.len() {
            self.active = self.documents.len() - 1;
        }
    }

    /// Record that the active document now lives at `path`.
    pub fn mark_active_saved(&mut self, path: PathBuf) {
        let document = self.active_mut();
        document.path = Some(path);
        document.session.mark_saved();
    }
}

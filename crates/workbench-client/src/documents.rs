//! Open documents with persisted content and editable drafts.

use workbench_core::error::AppError;
use workbench_core::result::AppResult;

use crate::backend::WorkspaceBackend;

/// A file opened for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    /// Root-relative path.
    pub path: String,
    /// Content as last read from or written to the server.
    pub persisted_content: String,
    /// Content as currently edited.
    pub draft: String,
    /// Size of the persisted content in bytes.
    pub size_bytes: u64,
}

impl OpenDocument {
    fn new(path: String, content: String, size_bytes: u64) -> Self {
        Self {
            path,
            draft: content.clone(),
            persisted_content: content,
            size_bytes,
        }
    }

    /// Whether the draft differs from the persisted content.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.persisted_content
    }
}

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft was written.
    Saved {
        /// Size reported by the server.
        size_bytes: u64,
    },
    /// The draft already matched the persisted content.
    NothingToSave,
}

/// Open documents in tab order.
#[derive(Debug, Clone, Default)]
pub struct OpenDocumentSet {
    documents: Vec<OpenDocument>,
}

impl OpenDocumentSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, or return the existing one untouched.
    ///
    /// An already open document keeps its draft; `content` is ignored.
    pub fn open(&mut self, path: &str, content: String, size_bytes: u64) -> &OpenDocument {
        let index = match self.position(path) {
            Some(index) => index,
            None => {
                self.documents
                    .push(OpenDocument::new(path.to_string(), content, size_bytes));
                self.documents.len() - 1
            }
        };
        &self.documents[index]
    }

    /// Replace the draft of an open document.
    pub fn edit(&mut self, path: &str, draft: impl Into<String>) -> AppResult<()> {
        self.get_mut(path)?.draft = draft.into();
        Ok(())
    }

    /// Write the draft through `backend` if it differs from the persisted content.
    ///
    /// On failure the document is left exactly as it was.
    pub async fn save<B>(&mut self, path: &str, backend: &B) -> AppResult<SaveOutcome>
    where
        B: WorkspaceBackend + ?Sized,
    {
        let document = self.get_mut(path)?;
        if !document.is_dirty() {
            return Ok(SaveOutcome::NothingToSave);
        }

        let receipt = backend.write_file(path, &document.draft).await?;
        document.persisted_content = document.draft.clone();
        document.size_bytes = receipt.size_bytes;

        Ok(SaveOutcome::Saved {
            size_bytes: receipt.size_bytes,
        })
    }

    /// Re-read a document through `backend`, discarding any draft.
    pub async fn reload<B>(&mut self, path: &str, backend: &B) -> AppResult<&OpenDocument>
    where
        B: WorkspaceBackend + ?Sized,
    {
        let index = self
            .position(path)
            .ok_or_else(|| not_open(path))?;

        let file = backend.read_file(path).await?;
        let document = &mut self.documents[index];
        document.draft = file.content.clone();
        document.persisted_content = file.content;
        document.size_bytes = file.size_bytes;

        Ok(document)
    }

    /// Close a document and return the selection that should follow.
    ///
    /// When `selected` is the closed document, selection falls back to the
    /// first remaining document or to none; otherwise it is unchanged.
    pub fn close(&mut self, path: &str, selected: Option<&str>) -> Option<String> {
        if let Some(index) = self.position(path) {
            self.documents.remove(index);
        }

        match selected {
            Some(current) if current == path => self.documents.first().map(|d| d.path.clone()),
            other => other.map(str::to_string),
        }
    }

    /// Drop a document whose file disappeared from disk.
    ///
    /// Same selection semantics as [`close`](Self::close).
    pub fn remove(&mut self, path: &str, selected: Option<&str>) -> Option<String> {
        tracing::debug!(path = %path, "Removing document deleted on disk");
        self.close(path, selected)
    }

    /// Drop every document.
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// An open document.
    pub fn get(&self, path: &str) -> Option<&OpenDocument> {
        self.documents.iter().find(|d| d.path == path)
    }

    /// Whether a document is open.
    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    /// Documents in tab order.
    pub fn iter(&self) -> impl Iterator<Item = &OpenDocument> {
        self.documents.iter()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether any document has unsaved changes.
    pub fn has_unsaved(&self) -> bool {
        self.documents.iter().any(OpenDocument::is_dirty)
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.path == path)
    }

    fn get_mut(&mut self, path: &str) -> AppResult<&mut OpenDocument> {
        self.documents
            .iter_mut()
            .find(|d| d.path == path)
            .ok_or_else(|| not_open(path))
    }
}

fn not_open(path: &str) -> AppError {
    AppError::not_found(format!("Document is not open: {path}"))
}

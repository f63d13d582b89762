use super::document::{Document, DocumentId};
use super::error::{AppError, Result};

/// Result of a tab switch: the newly active document and the one it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switched {
    pub new_id: DocumentId,
    pub old_id: Option<DocumentId>,
}

/// Result of closing a tab. When `all_closed` is true the session is empty
/// and the caller is responsible for creating a replacement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOutcome {
    pub remaining_active: Option<DocumentId>,
    pub all_closed: bool,
}

/// Ordered collection of open documents plus the active id.
///
/// Pure and synchronous; the sync coordinator is the only caller of the
/// mutating methods. Enforces two invariants itself rather than trusting
/// callers: at most one document per file path, and ids are never reused.
pub struct SessionStore {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a document and make it active. If `file_path` matches an existing
    /// entry, that entry is activated and returned unchanged instead of
    /// creating a duplicate tab.
    pub fn create_document(&mut self, file_path: Option<String>, content: &str) -> DocumentId {
        if let Some(ref path) = file_path {
            if let Some(existing) = self.find_by_path(path) {
                self.active_id = Some(existing);
                return existing;
            }
        }

        let id = self.next_document_id();
        self.documents.push(Document::new(id, file_path, content));
        self.active_id = Some(id);
        id
    }

    pub fn switch_to(&mut self, id: DocumentId) -> Result<Switched> {
        if !self.documents.iter().any(|d| d.id == id) {
            return Err(AppError::NotFound);
        }
        let old_id = self.active_id;
        self.active_id = Some(id);
        Ok(Switched { new_id: id, old_id })
    }

    /// Remove a document by id. If it was active, the successor is the
    /// document that slid into its index, or the last remaining document.
    /// No replacement is created here when the session empties.
    pub fn close(&mut self, id: DocumentId) -> Result<CloseOutcome> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(AppError::NotFound)?;
        self.documents.remove(idx);

        if self.active_id == Some(id) {
            self.active_id = None;
            if !self.documents.is_empty() {
                let new_idx = if idx < self.documents.len() {
                    idx
                } else {
                    self.documents.len() - 1
                };
                self.active_id = Some(self.documents[new_idx].id);
            }
        }

        Ok(CloseOutcome {
            remaining_active: self.active_id,
            all_closed: self.documents.is_empty(),
        })
    }

    pub fn get_active(&self) -> Result<&Document> {
        let active_id = self.active_id.ok_or(AppError::NoActiveDocument)?;
        self.documents
            .iter()
            .find(|d| d.id == active_id)
            .ok_or(AppError::NoActiveDocument)
    }

    fn active_mut(&mut self) -> Result<&mut Document> {
        let active_id = self.active_id.ok_or(AppError::NoActiveDocument)?;
        self.documents
            .iter_mut()
            .find(|d| d.id == active_id)
            .ok_or(AppError::NoActiveDocument)
    }

    /// Replace the active document's content snapshot. Never touches the
    /// dirty flag or triggers rendering.
    pub fn update_content(&mut self, text: &str) -> Result<()> {
        self.active_mut()?.content = text.to_string();
        Ok(())
    }

    pub fn set_dirty(&mut self, dirty: bool) -> Result<()> {
        self.active_mut()?.is_dirty = dirty;
        Ok(())
    }

    /// Record a completed save-as against the document it was started for.
    /// By-id rather than active-based so a save finishing after a tab switch
    /// still lands on the right document. Clears the dirty flag.
    pub fn mark_saved(&mut self, id: DocumentId, path: String) -> Result<()> {
        let doc = self.document_mut(id).ok_or(AppError::NotFound)?;
        doc.file_path = Some(path);
        doc.update_display_name();
        doc.is_dirty = false;
        Ok(())
    }

    pub fn set_clean(&mut self, id: DocumentId) -> Result<()> {
        let doc = self.document_mut(id).ok_or(AppError::NotFound)?;
        doc.is_dirty = false;
        Ok(())
    }

    pub fn find_by_path(&self, path: &str) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

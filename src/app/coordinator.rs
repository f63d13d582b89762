use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::document::{DocumentId, WELCOME_TEMPLATE};
use super::error::{AppError, Result};
use super::export::{self, ExportFormat};
use super::open_hook;
use super::preview;
use super::session::SessionStore;
use super::storage::Storage;

const MARKDOWN_FILTER: &str = "*.{md,markdown,txt}";
const IMAGE_FILTER: &str = "*.{png,jpg,jpeg,gif,webp,svg}";

/// The single reusable editable-text widget shared across all documents.
pub trait TextSurface {
    /// Full-buffer replacement; must not read back as a user edit.
    fn set_content(&mut self, text: &str);
    fn content(&self) -> String;
    fn insert_at_cursor(&mut self, text: &str);
}

/// The markdown-to-markup display collaborator. Stateless function of its
/// inputs and the container it is bound to.
pub trait Renderer {
    fn render(&mut self, markdown: &str, base_path: Option<&Path>);
}

/// Orchestrates all content hand-off between the text surface, the renderer
/// and the session store. The only writer of cross-component state: every
/// open/save/close/switch event funnels through here.
pub struct SyncCoordinator<S: Storage, T: TextSurface, R: Renderer> {
    store: SessionStore,
    storage: S,
    surface: T,
    renderer: R,
    /// The document whose snapshot is currently loaded in the text surface.
    bound_id: Option<DocumentId>,
}

impl<S: Storage, T: TextSurface, R: Renderer> SyncCoordinator<S, T, R> {
    /// Create the coordinator with its initial untitled document loaded.
    pub fn new(storage: S, surface: T, renderer: R) -> Self {
        let mut coordinator = Self {
            store: SessionStore::new(),
            storage,
            surface,
            renderer,
            bound_id: None,
        };
        coordinator.store.create_document(None, WELCOME_TEMPLATE);
        // The store is non-empty here, so the load cannot fail.
        let _ = coordinator.load_active();
        coordinator
    }

    /// Read access for the tab presentation, which holds no state of its own.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn window_title(&self) -> String {
        match self.store.get_active() {
            Ok(doc) => {
                let prefix = if doc.is_dirty { "*" } else { "" };
                format!("{}{} - Mendel", prefix, doc.display_name)
            }
            Err(_) => "Untitled - Mendel".to_string(),
        }
    }

    /// Replace the surface and preview with the active document's snapshot.
    fn load_active(&mut self) -> Result<()> {
        let (id, content, base) = {
            let doc = self.store.get_active()?;
            (doc.id, doc.content.clone(), doc.base_path())
        };
        self.surface.set_content(&content);
        self.renderer.render(&content, base.as_deref());
        self.bound_id = Some(id);
        Ok(())
    }

    fn active_base_path(&self) -> Option<PathBuf> {
        self.store.get_active().ok().and_then(|d| d.base_path())
    }

    /// Per-keystroke change notification. No blocking I/O here.
    pub fn on_editor_change(&mut self) -> Result<()> {
        let text = self.surface.content();
        self.store.update_content(&text)?;
        self.store.set_dirty(true)?;
        let base = self.active_base_path();
        self.renderer.render(&text, base.as_deref());
        Ok(())
    }

    /// Tab click. Stale clicks referencing an already-closed document are
    /// swallowed rather than propagated.
    pub fn on_user_switch(&mut self, id: DocumentId) -> Result<()> {
        if self.store.document(id).is_none() {
            return Ok(());
        }
        self.store.switch_to(id)?;
        self.load_active()
    }

    /// Open a file whose content has already been read. If the path is
    /// already open, the fresh content wins over any unsaved edits and the
    /// dirty flag resets (no conflict detection by design).
    pub fn on_open_file(&mut self, path: &str, content: &str) -> Result<()> {
        if let Some(existing) = self.store.find_by_path(path) {
            self.store.switch_to(existing)?;
            self.store.update_content(content)?;
            self.store.set_dirty(false)?;
        } else {
            self.store.create_document(Some(path.to_string()), content);
        }
        self.load_active()
    }

    /// File > Open. Cancel is a clean no-op; the store is untouched until
    /// the read has succeeded.
    pub fn open_dialog_flow(&mut self) -> Result<()> {
        let Some(path) = self.storage.open_dialog(MARKDOWN_FILTER) else {
            return Ok(());
        };
        let content = self.storage.read_text(&path)?;
        self.on_open_file(&path, &content)
    }

    /// Open a path delivered from outside the UI (CLI argument, signal-file
    /// hook, file association).
    pub fn open_path(&mut self, path: &str) -> Result<()> {
        let content = self.storage.read_text(path)?;
        self.on_open_file(path, &content)
    }

    pub fn poll_external_open(&mut self) -> Result<()> {
        match open_hook::take_pending_open() {
            Some(path) => self.open_path(&path),
            None => Ok(()),
        }
    }

    pub fn on_save(&mut self) -> Result<()> {
        // Capture the target before any I/O so the completion lands on this
        // document even if the active tab changes meanwhile.
        let (id, file_path, content) = {
            let doc = self.store.get_active()?;
            (doc.id, doc.file_path.clone(), doc.content.clone())
        };

        match file_path {
            Some(path) => {
                self.storage.write_text(&path, &content)?;
                self.store.set_clean(id)
            }
            None => self.on_save_as(),
        }
    }

    pub fn on_save_as(&mut self) -> Result<()> {
        let (id, display_name, content) = {
            let doc = self.store.get_active()?;
            (doc.id, doc.display_name.clone(), doc.content.clone())
        };

        let default_name = if display_name.contains('.') {
            display_name
        } else {
            format!("{display_name}.md")
        };

        let Some(path) = self.storage.save_dialog(&default_name, MARKDOWN_FILTER) else {
            // Cancelled: document stays dirty and untitled.
            return Ok(());
        };
        self.storage.write_text(&path, &content)?;
        self.store.mark_saved(id, path)?;
        if self.bound_id == Some(id) {
            // The document gained a base path; re-render so relative assets
            // resolve against it.
            let base = self.store.document(id).and_then(|d| d.base_path());
            self.renderer.render(&content, base.as_deref());
        }
        Ok(())
    }

    /// Close a tab, discarding unsaved edits without prompting. An emptied
    /// session is immediately refilled with a fresh untitled document.
    pub fn on_close_tab(&mut self, id: DocumentId) -> Result<()> {
        if self.store.document(id).is_none() {
            return Ok(());
        }
        let outcome = self.store.close(id)?;

        if outcome.all_closed {
            self.store.create_document(None, WELCOME_TEMPLATE);
            return self.load_active();
        }

        // Closing an inactive tab leaves the bound document untouched.
        if outcome.remaining_active == self.bound_id {
            return Ok(());
        }
        self.load_active()
    }

    pub fn on_close_active(&mut self) -> Result<()> {
        let id = self.store.get_active()?.id;
        self.on_close_tab(id)
    }

    pub fn on_new_tab(&mut self) -> Result<()> {
        self.store.create_document(None, WELCOME_TEMPLATE);
        self.load_active()
    }

    /// Insert an image chosen from a dialog. Requires a saved document; the
    /// check runs before the dialog so an untitled document never shows one.
    pub fn on_insert_image(&mut self) -> Result<()> {
        if self.store.get_active()?.file_path.is_none() {
            return Err(AppError::UnsavedDocument);
        }
        let Some(src) = self.storage.open_dialog(IMAGE_FILTER) else {
            return Ok(());
        };
        self.insert_image_from(&src)
    }

    /// Insert a reference to a known image file at the cursor, copying it
    /// into an assets/ directory beside the document. Also the target of
    /// files dropped onto the editor.
    pub fn insert_image_from(&mut self, src: &str) -> Result<()> {
        let file_path = self.store.get_active()?.file_path.clone();
        let Some(doc_path) = file_path else {
            return Err(AppError::UnsavedDocument);
        };

        let dir = Path::new(&doc_path)
            .parent()
            .unwrap_or_else(|| Path::new("."));
        let assets_dir = dir.join("assets");
        self.storage
            .ensure_directory(&assets_dir.to_string_lossy())?;

        let ext = Path::new(&src)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let filename = format!("image-{stamp}.{ext}");
        let dest = assets_dir.join(&filename);

        self.storage.copy_file(&src, &dest.to_string_lossy())?;
        self.surface
            .insert_at_cursor(&format!("![](./assets/{filename})"));
        Ok(())
    }

    pub fn on_export(&mut self, format: ExportFormat) -> Result<()> {
        let (content, base) = {
            let doc = self.store.get_active()?;
            (doc.content.clone(), doc.base_path())
        };
        let html = preview::resolve_asset_paths(&preview::render_markdown(&content), base.as_deref());
        export::export_document(&mut self.storage, format, &content, &html)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStorage {
        files: HashMap<String, String>,
        open_results: Vec<Option<String>>,
        save_results: Vec<Option<String>>,
        writes: Vec<(String, String)>,
    }

    impl MockStorage {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }

        fn next_save(mut self, result: Option<&str>) -> Self {
            self.save_results.push(result.map(String::from));
            self
        }

        fn next_open(mut self, result: Option<&str>) -> Self {
            self.open_results.push(result.map(String::from));
            self
        }
    }

    impl Storage for MockStorage {
        fn open_dialog(&mut self, _pattern: &str) -> Option<String> {
            self.open_results.pop().flatten()
        }

        fn save_dialog(&mut self, _default_name: &str, _pattern: &str) -> Option<String> {
            self.save_results.pop().flatten()
        }

        fn read_text(&mut self, path: &str) -> Result<String> {
            self.files.get(path).cloned().ok_or_else(|| {
                AppError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, path))
            })
        }

        fn write_text(&mut self, path: &str, contents: &str) -> Result<()> {
            self.writes.push((path.to_string(), contents.to_string()));
            self.files.insert(path.to_string(), contents.to_string());
            Ok(())
        }

        fn write_binary(&mut self, path: &str, base64_data: &str) -> Result<()> {
            self.writes.push((path.to_string(), base64_data.to_string()));
            Ok(())
        }

        fn ensure_directory(&mut self, _path: &str) -> Result<()> {
            Ok(())
        }

        fn copy_file(&mut self, src: &str, dest: &str) -> Result<()> {
            self.writes.push((dest.to_string(), format!("copy of {src}")));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSurface {
        text: String,
        loads: usize,
        inserted: Vec<String>,
    }

    impl TextSurface for MockSurface {
        fn set_content(&mut self, text: &str) {
            self.text = text.to_string();
            self.loads += 1;
        }

        fn content(&self) -> String {
            self.text.clone()
        }

        fn insert_at_cursor(&mut self, text: &str) {
            self.text.push_str(text);
            self.inserted.push(text.to_string());
        }
    }

    #[derive(Default)]
    struct MockRenderer {
        calls: Vec<(String, Option<PathBuf>)>,
    }

    impl Renderer for MockRenderer {
        fn render(&mut self, markdown: &str, base_path: Option<&Path>) {
            self.calls
                .push((markdown.to_string(), base_path.map(Path::to_path_buf)));
        }
    }

    type TestCoordinator = SyncCoordinator<MockStorage, MockSurface, MockRenderer>;

    fn coordinator(storage: MockStorage) -> TestCoordinator {
        SyncCoordinator::new(storage, MockSurface::default(), MockRenderer::default())
    }

    fn type_text(c: &mut TestCoordinator, text: &str) {
        c.surface.text = text.to_string();
        c.on_editor_change().unwrap();
    }

    #[test]
    fn test_starts_with_one_untitled_tab_loaded() {
        let c = coordinator(MockStorage::default());
        assert_eq!(c.store().count(), 1);
        assert!(c.surface.text.starts_with("# Welcome to Mendel"));
        assert_eq!(c.renderer.calls.len(), 1);
        assert_eq!(c.window_title(), "Untitled - Mendel");
    }

    #[test]
    fn test_edit_marks_dirty_and_rerenders() {
        let mut c = coordinator(MockStorage::default());
        type_text(&mut c, "hello");

        let doc = c.store().get_active().unwrap();
        assert_eq!(doc.content, "hello");
        assert!(doc.is_dirty);
        assert_eq!(c.renderer.calls.last().unwrap().0, "hello");
        assert_eq!(c.window_title(), "*Untitled - Mendel");
    }

    #[test]
    fn test_switch_away_and_back_restores_content() {
        let mut c = coordinator(MockStorage::default());
        let a = c.store().active_id().unwrap();
        type_text(&mut c, "content of A");

        c.on_new_tab().unwrap();
        let b = c.store().active_id().unwrap();
        type_text(&mut c, "content of B");

        c.on_user_switch(a).unwrap();
        assert_eq!(c.surface.text, "content of A");
        c.on_user_switch(b).unwrap();
        assert_eq!(c.surface.text, "content of B");
    }

    #[test]
    fn test_switch_to_closed_tab_is_swallowed() {
        let mut c = coordinator(MockStorage::default());
        let a = c.store().active_id().unwrap();
        c.on_new_tab().unwrap();
        c.on_close_tab(a).unwrap();

        // A queued click on the closed tab arrives late.
        assert!(c.on_user_switch(a).is_ok());
        assert_eq!(c.store().count(), 1);
    }

    #[test]
    fn test_close_active_loads_successor() {
        let mut c = coordinator(MockStorage::default());
        let a = c.store().active_id().unwrap();
        type_text(&mut c, "hello");
        c.on_open_file("/x/report.md", "report body").unwrap();
        let b = c.store().active_id().unwrap();

        c.on_user_switch(a).unwrap();
        c.on_close_tab(a).unwrap();

        assert_eq!(c.store().active_id(), Some(b));
        assert_eq!(c.store().count(), 1);
        assert_eq!(c.surface.text, "report body");
    }

    #[test]
    fn test_close_inactive_skips_reload() {
        let mut c = coordinator(MockStorage::default());
        let a = c.store().active_id().unwrap();
        c.on_new_tab().unwrap();
        let b = c.store().active_id().unwrap();

        let loads_before = c.surface.loads;
        c.on_close_tab(a).unwrap();

        assert_eq!(c.store().active_id(), Some(b));
        // The bound document did not change, so nothing was pushed.
        assert_eq!(c.surface.loads, loads_before);
    }

    #[test]
    fn test_close_last_tab_creates_replacement() {
        let mut c = coordinator(MockStorage::default());
        let a = c.store().active_id().unwrap();
        type_text(&mut c, "unsaved, discarded silently");

        c.on_close_tab(a).unwrap();

        assert_eq!(c.store().count(), 1);
        let doc = c.store().get_active().unwrap();
        assert_ne!(doc.id, a);
        assert!(doc.file_path.is_none());
        assert!(!doc.is_dirty);
        assert!(c.surface.text.starts_with("# Welcome to Mendel"));
    }

    #[test]
    fn test_open_file_creates_tab_and_renders_with_base() {
        let mut c = coordinator(MockStorage::default());
        c.on_open_file("/x/docs/report.md", "# v1").unwrap();

        assert_eq!(c.store().count(), 2);
        assert_eq!(c.surface.text, "# v1");
        let (markdown, base) = c.renderer.calls.last().unwrap();
        assert_eq!(markdown, "# v1");
        assert_eq!(base.as_deref(), Some(Path::new("/x/docs")));
        assert_eq!(c.window_title(), "report.md - Mendel");
    }

    #[test]
    fn test_reopen_source_wins_over_unsaved_edits() {
        let mut c = coordinator(MockStorage::default());
        c.on_open_file("/x/report.md", "v1").unwrap();
        type_text(&mut c, "draft");
        assert!(c.store().get_active().unwrap().is_dirty);

        c.on_open_file("/x/report.md", "v2").unwrap();

        assert_eq!(c.store().count(), 2, "no duplicate tab");
        let doc = c.store().get_active().unwrap();
        assert_eq!(doc.content, "v2");
        assert!(!doc.is_dirty);
        assert_eq!(c.surface.text, "v2");
    }

    #[test]
    fn test_open_dialog_cancel_is_noop() {
        let mut c = coordinator(MockStorage::default().next_open(None));
        c.open_dialog_flow().unwrap();
        assert_eq!(c.store().count(), 1);
    }

    #[test]
    fn test_open_dialog_reads_then_opens() {
        let storage = MockStorage::default()
            .with_file("/x/a.md", "file body")
            .next_open(Some("/x/a.md"));
        let mut c = coordinator(storage);

        c.open_dialog_flow().unwrap();
        assert_eq!(c.surface.text, "file body");
        assert_eq!(c.store().count(), 2);
    }

    #[test]
    fn test_open_unreadable_path_leaves_store_unchanged() {
        let mut c = coordinator(MockStorage::default());
        let err = c.open_path("/x/missing.md").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(c.store().count(), 1);
    }

    #[test]
    fn test_save_with_path_writes_and_clears_dirty() {
        let mut c = coordinator(MockStorage::default());
        c.on_open_file("/x/report.md", "v1").unwrap();
        type_text(&mut c, "v1 plus edits");

        c.on_save().unwrap();

        let (path, written) = c.storage.writes.last().unwrap();
        assert_eq!(path, "/x/report.md");
        assert_eq!(written, "v1 plus edits");
        assert!(!c.store().get_active().unwrap().is_dirty);
    }

    #[test]
    fn test_save_untitled_delegates_to_save_as() {
        let mut c = coordinator(MockStorage::default().next_save(Some("/tmp/new.md")));
        type_text(&mut c, "fresh text");

        c.on_save().unwrap();

        let doc = c.store().get_active().unwrap();
        assert_eq!(doc.file_path.as_deref(), Some("/tmp/new.md"));
        assert_eq!(doc.display_name, "new.md");
        assert!(!doc.is_dirty);
        assert_eq!(c.storage.writes.last().unwrap().0, "/tmp/new.md");
    }

    #[test]
    fn test_save_as_cancelled_is_noop() {
        let mut c = coordinator(MockStorage::default().next_save(None));
        type_text(&mut c, "draft");

        c.on_save_as().unwrap();

        let doc = c.store().get_active().unwrap();
        assert!(doc.is_dirty);
        assert!(doc.file_path.is_none());
        assert!(c.storage.writes.is_empty());
    }

    #[test]
    fn test_dirty_cycle_clean_edit_save_edit() {
        let mut c = coordinator(MockStorage::default().next_save(Some("/tmp/cycle.md")));
        type_text(&mut c, "one");
        c.on_save().unwrap();
        assert!(!c.store().get_active().unwrap().is_dirty);

        // The very next edit re-dirties the document.
        type_text(&mut c, "two");
        assert!(c.store().get_active().unwrap().is_dirty);
    }

    #[test]
    fn test_insert_image_requires_saved_document() {
        let mut c = coordinator(MockStorage::default().next_open(Some("/pics/cat.png")));
        assert!(matches!(
            c.on_insert_image(),
            Err(AppError::UnsavedDocument)
        ));
        assert!(c.surface.inserted.is_empty());
    }

    #[test]
    fn test_insert_image_copies_and_inserts_reference() {
        let storage = MockStorage::default().next_open(Some("/pics/cat.png"));
        let mut c = coordinator(storage);
        c.on_open_file("/x/report.md", "body").unwrap();

        c.on_insert_image().unwrap();

        let (dest, _) = c.storage.writes.last().unwrap();
        assert!(dest.starts_with("/x/assets/image-"));
        assert!(dest.ends_with(".png"));
        let inserted = c.surface.inserted.last().unwrap();
        assert!(inserted.starts_with("![](./assets/image-"));
    }

    #[test]
    fn test_insert_dropped_image_skips_dialog() {
        let mut c = coordinator(MockStorage::default());
        c.on_open_file("/x/report.md", "body").unwrap();

        c.insert_image_from("/pics/shot.jpeg").unwrap();

        let (dest, _) = c.storage.writes.last().unwrap();
        assert!(dest.starts_with("/x/assets/image-"));
        assert!(dest.ends_with(".jpeg"));
        assert!(
            c.surface
                .inserted
                .last()
                .unwrap()
                .starts_with("![](./assets/image-")
        );
    }

    #[test]
    fn test_insert_dropped_image_requires_saved_document() {
        let mut c = coordinator(MockStorage::default());
        assert!(matches!(
            c.insert_image_from("/pics/shot.png"),
            Err(AppError::UnsavedDocument)
        ));
        assert!(c.storage.writes.is_empty());
    }

    #[test]
    fn test_export_cancel_writes_nothing() {
        let mut c = coordinator(MockStorage::default().next_save(None));
        c.on_export(ExportFormat::Html).unwrap();
        assert!(c.storage.writes.is_empty());
    }

    #[test]
    fn test_export_html_writes_standalone_document() {
        let mut c = coordinator(MockStorage::default().next_save(Some("/tmp/out.html")));
        type_text(&mut c, "# My Doc\n\nbody");

        c.on_export(ExportFormat::Html).unwrap();

        let (path, written) = c.storage.writes.last().unwrap();
        assert_eq!(path, "/tmp/out.html");
        assert!(written.contains("<h1>My Doc</h1>"));
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Default content for new untitled tabs.
pub const WELCOME_TEMPLATE: &str = "\
# Welcome to Mendel

A minimal editor with **live preview**.

## Features

- **Live preview** as you type
- **Tabs** for multiple documents
- **File operations** (Open, Save, Save As)
- **Export** to text, HTML, PDF and more

```rust
fn hello() {
    println!(\"Hello, world!\");
}
```

> Start editing to see the preview update in real time.
";

/// One open buffer: its optional file association, the last-known content
/// snapshot, and its dirty flag.
///
/// The `content` field is authoritative only while the document is inactive;
/// the active document is kept current by the coordinator on every editor
/// change, so a tab switch always finds an up-to-date snapshot here.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub file_path: Option<String>,
    pub content: String,
    pub is_dirty: bool,
    pub display_name: String,
}

impl Document {
    pub fn new(id: DocumentId, file_path: Option<String>, content: &str) -> Self {
        let display_name = match file_path.as_deref() {
            Some(path) => extract_filename(path),
            None => "Untitled".to_string(),
        };

        Self {
            id,
            file_path,
            content: content.to_string(),
            is_dirty: false,
            display_name,
        }
    }

    pub fn update_display_name(&mut self) {
        if let Some(ref path) = self.file_path {
            self.display_name = extract_filename(path);
        }
    }

    /// Directory containing the document's file, used to resolve relative
    /// asset references in the preview. None while untitled.
    pub fn base_path(&self) -> Option<PathBuf> {
        self.file_path
            .as_deref()
            .and_then(|p| Path::new(p).parent())
            .map(Path::to_path_buf)
    }
}

/// Extract the final path segment, or "Untitled" when there is none.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Untitled".to_string())
}

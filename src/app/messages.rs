use super::document::DocumentId;
use super::export::ExportFormat;

/// All messages that can be sent through the FLTK channel.
/// Menu and tab-bar callbacks send one of these; the dispatch loop in main
/// routes them to the sync coordinator.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNewTab,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,

    // Tabs
    TabSwitch(DocumentId),
    TabClose(DocumentId),
    TabCloseActive,

    // Editing surface
    EditorChanged,

    // Insert & export
    InsertImage,
    InsertDroppedImage(String),
    Export(ExportFormat),

    // View
    ToggleDarkMode,

    // Externally requested opens (signal-file poll)
    PollExternalOpen,
}

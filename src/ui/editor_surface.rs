use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use fltk::{
    app::Sender,
    enums::Event,
    prelude::*,
    text::{TextBuffer, TextEditor},
};

use crate::app::coordinator::TextSurface;
use crate::app::messages::Message;

/// The one editable widget shared across all documents. User edits emit
/// `Message::EditorChanged`; programmatic full-buffer replacement during tab
/// switches is muted so it never reads back as an edit.
pub struct EditorSurface {
    editor: TextEditor,
    buffer: TextBuffer,
    muted: Rc<Cell<bool>>,
}

impl EditorSurface {
    pub fn new(mut editor: TextEditor, sender: Sender<Message>) -> Self {
        let mut buffer = TextBuffer::default();
        editor.set_buffer(buffer.clone());

        let muted = Rc::new(Cell::new(false));
        let muted_cb = muted.clone();
        buffer.add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
            if (inserted > 0 || deleted > 0) && !muted_cb.get() {
                sender.send(Message::EditorChanged);
            }
        });

        // Image files dropped onto the editor go through the same insert
        // flow as the menu action. The drop payload arrives as a Paste event
        // right after DndRelease, so a flag tells the two apart from a
        // keyboard paste.
        let dnd_pending = Cell::new(false);
        editor.handle(move |_, event| match event {
            Event::DndEnter | Event::DndDrag | Event::DndRelease => {
                dnd_pending.set(event == Event::DndRelease);
                true
            }
            Event::Paste if dnd_pending.get() => {
                dnd_pending.set(false);
                match dropped_image_path(&fltk::app::event_text()) {
                    Some(path) => {
                        sender.send(Message::InsertDroppedImage(path));
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        });

        Self {
            editor,
            buffer,
            muted,
        }
    }
}

impl TextSurface for EditorSurface {
    fn set_content(&mut self, text: &str) {
        self.muted.set(true);
        self.buffer.set_text(text);
        self.muted.set(false);
        self.editor.set_insert_position(0);
        self.editor.show_insert_position();
    }

    fn content(&self) -> String {
        buffer_text_no_leak(&self.buffer)
    }

    fn insert_at_cursor(&mut self, text: &str) {
        let pos = self.editor.insert_position();
        self.buffer.insert(pos, text);
        self.editor.set_insert_position(pos + text.len() as i32);
    }
}

/// Read text from an FLTK TextBuffer without leaking the C-allocated copy.
///
/// `TextBuffer::text()` copies a `malloc()`'d C string into a Rust String
/// but never frees the original pointer, leaking the full buffer size on
/// every call. This runs on every keystroke, so call the FFI directly and
/// free the C allocation ourselves.
fn buffer_text_no_leak(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: Fl_Text_Buffer_text returns a malloc'd, null-terminated C
    // string (or null when empty); we copy it into a Rust String and free
    // the allocation. The inner buffer pointer stays valid while `buf` does.
    unsafe {
        let inner = buf.as_ptr() as *mut std::ffi::c_void;
        let ptr = Fl_Text_Buffer_text(inner);
        if ptr.is_null() {
            return String::new();
        }
        let cstr = std::ffi::CStr::from_ptr(ptr);
        let result = cstr.to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        result
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Extract an image file path from a drag-and-drop payload. Depending on
/// the platform the payload is a percent-encoded uri-list (`file:///…`, one
/// entry per line) or a plain path. Non-image drops return None so normal
/// text handling takes over.
fn dropped_image_path(payload: &str) -> Option<String> {
    let first = payload.lines().next()?.trim();
    let path = match first.strip_prefix("file://") {
        Some(rest) => percent_decode(rest),
        None => first.to_string(),
    };
    let ext = Path::new(&path)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(path)
    } else {
        None
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(b) = hex {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

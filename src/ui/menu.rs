use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::export::ExportFormat;
use crate::app::messages::Message;

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, initial_dark_mode: bool) {
    let s = sender;

    // File
    menu.add("File/New Tab", Shortcut::Ctrl | 't', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileNewTab) });
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSave) });
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileSaveAs) });
    menu.add("File/Close Tab", Shortcut::Ctrl | 'w', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::TabCloseActive) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Insert
    menu.add("Insert/Image...", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::InsertImage) });

    // Export
    for (label, format) in [
        ("Export/Text (.txt)...", ExportFormat::Txt),
        ("Export/HTML (.html)...", ExportFormat::Html),
        ("Export/PDF (.pdf)...", ExportFormat::Pdf),
        ("Export/PNG Image (.png)...", ExportFormat::Png),
        ("Export/JPEG Image (.jpg)...", ExportFormat::Jpg),
        ("Export/Word Document (.docx)...", ExportFormat::Docx),
        ("Export/Rich Text (.rtf)...", ExportFormat::Rtf),
    ] {
        menu.add(label, Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Export(format)) });
    }

    // View
    let dm_flag = if initial_dark_mode { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle };
    menu.add("View/Toggle Dark Mode", Shortcut::None, dm_flag, { let s = *s; move |_| s.send(Message::ToggleDarkMode) });
}

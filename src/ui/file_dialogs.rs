use fltk::dialog::{FileDialogType, NativeFileChooser};

/// Show the native open dialog. Returns None when the user cancels.
pub fn native_open_dialog(filter: &str, directory: Option<&str>) -> Option<String> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseFile);
    nfc.set_filter(filter);
    if let Some(dir) = directory {
        let _ = nfc.set_directory(&dir);
    }
    nfc.show();
    let filename = nfc.filename();
    let s = filename.to_string_lossy();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Show the native save dialog with a suggested file name. Returns None when
/// the user cancels.
pub fn native_save_dialog(
    default_name: &str,
    filter: &str,
    directory: Option<&str>,
) -> Option<String> {
    let mut nfc = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
    nfc.set_filter(filter);
    if let Some(dir) = directory {
        let _ = nfc.set_directory(&dir);
    }
    nfc.set_preset_file(default_name);
    nfc.show();
    let filename = nfc.filename();
    let s = filename.to_string_lossy();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use super::error::Result;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};

/// File-system and native-dialog access. The coordinator only talks to this
/// trait, so tests can swap in a scripted implementation. Dialog cancellation
/// is `None`, never an error.
pub trait Storage {
    fn open_dialog(&mut self, pattern: &str) -> Option<String>;
    fn save_dialog(&mut self, default_name: &str, pattern: &str) -> Option<String>;
    fn read_text(&mut self, path: &str) -> Result<String>;
    fn write_text(&mut self, path: &str, contents: &str) -> Result<()>;
    fn write_binary(&mut self, path: &str, base64_data: &str) -> Result<()>;
    fn ensure_directory(&mut self, path: &str) -> Result<()>;
    fn copy_file(&mut self, src: &str, dest: &str) -> Result<()>;
}

/// Production storage: FLTK native dialogs plus std::fs.
pub struct NativeStorage {
    /// Last directory used in a file open/save dialog.
    last_directory: Option<String>,
}

impl NativeStorage {
    pub fn new() -> Self {
        Self {
            last_directory: None,
        }
    }

    fn remember_directory(&mut self, path: &str) {
        if let Some(parent) = Path::new(path).parent() {
            self.last_directory = Some(parent.to_string_lossy().to_string());
        }
    }
}

impl Default for NativeStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for NativeStorage {
    fn open_dialog(&mut self, pattern: &str) -> Option<String> {
        let path = native_open_dialog(pattern, self.last_directory.as_deref())?;
        self.remember_directory(&path);
        Some(path)
    }

    fn save_dialog(&mut self, default_name: &str, pattern: &str) -> Option<String> {
        let path = native_save_dialog(default_name, pattern, self.last_directory.as_deref())?;
        self.remember_directory(&path);
        Some(path)
    }

    fn read_text(&mut self, path: &str) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn write_text(&mut self, path: &str, contents: &str) -> Result<()> {
        Ok(fs::write(path, contents)?)
    }

    fn write_binary(&mut self, path: &str, base64_data: &str) -> Result<()> {
        let bytes = BASE64
            .decode(base64_data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(fs::write(path, bytes)?)
    }

    fn ensure_directory(&mut self, path: &str) -> Result<()> {
        Ok(fs::create_dir_all(path)?)
    }

    fn copy_file(&mut self, src: &str, dest: &str) -> Result<()> {
        fs::copy(src, dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Dialog methods need a running FLTK app, so only the fs-backed methods
    // are covered here.

    #[test]
    fn test_write_and_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");
        let path = path.to_str().unwrap();

        let mut storage = NativeStorage::new();
        storage.write_text(path, "# hi").unwrap();
        assert_eq!(storage.read_text(path).unwrap(), "# hi");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let mut storage = NativeStorage::new();
        let err = storage.read_text("/nonexistent/nope.md").unwrap_err();
        assert!(matches!(err, crate::app::error::AppError::Io(_)));
    }

    #[test]
    fn test_write_binary_decodes_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");

        let mut storage = NativeStorage::new();
        storage
            .write_binary(path.to_str().unwrap(), "aGVsbG8=")
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_write_binary_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");

        let mut storage = NativeStorage::new();
        assert!(
            storage
                .write_binary(path.to_str().unwrap(), "not base64!!")
                .is_err()
        );
        assert!(!path.exists());
    }

    #[test]
    fn test_ensure_directory_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        fs::write(&src, b"png bytes").unwrap();

        let assets = dir.path().join("assets");
        let dest = assets.join("copy.png");

        let mut storage = NativeStorage::new();
        storage.ensure_directory(assets.to_str().unwrap()).unwrap();
        storage
            .copy_file(src.to_str().unwrap(), dest.to_str().unwrap())
            .unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"png bytes");
    }
}

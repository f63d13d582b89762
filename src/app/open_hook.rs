use std::fs;
use std::path::{Path, PathBuf};

/// Signal file written by external processes (shell hook, file association
/// helper) naming a file the running editor should open.
const SIGNAL_FILE_NAME: &str = ".mendel-open";

pub fn signal_file_path() -> PathBuf {
    std::env::temp_dir().join(SIGNAL_FILE_NAME)
}

/// Consume a pending externally-requested open, if any. Idempotent: a
/// missing or empty signal file is a no-op.
pub fn take_pending_open() -> Option<String> {
    take_pending_open_at(&signal_file_path())
}

fn take_pending_open_at(signal: &Path) -> Option<String> {
    let contents = fs::read_to_string(signal).ok()?;
    let _ = fs::remove_file(signal);
    let path = contents.trim();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_signal_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(take_pending_open_at(&dir.path().join(".mendel-open")), None);
    }

    #[test]
    fn test_pending_open_is_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let signal = dir.path().join(".mendel-open");
        fs::write(&signal, "/x/report.md\n").unwrap();

        assert_eq!(
            take_pending_open_at(&signal),
            Some("/x/report.md".to_string())
        );
        // Consumed: the second poll sees nothing.
        assert!(!signal.exists());
        assert_eq!(take_pending_open_at(&signal), None);
    }

    #[test]
    fn test_blank_signal_is_consumed_silently() {
        let dir = tempfile::tempdir().unwrap();
        let signal = dir.path().join(".mendel-open");
        fs::write(&signal, "   \n").unwrap();

        assert_eq!(take_pending_open_at(&signal), None);
        assert!(!signal.exists());
    }
}

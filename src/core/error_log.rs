//=========================================================================
// Error Log
//=========================================================================
//
// Appends fatal run errors to `<root_path>/ErrorLog.txt`.
//
// Entry format:
//   [<unix seconds>] <error>
//     caused by: <source>
//     caused by: <source of source> ...
//
//=========================================================================

//=== External Dependencies ===============================================

use std::error::Error;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};

//=== Constants ===========================================================

/// File name of the error log inside the settings root directory.
pub const ERROR_LOG_FILE: &str = "ErrorLog.txt";

//=== Public API ==========================================================

/// Appends `error` and its source chain to the error log under `root`.
///
/// Failures are logged as warnings and otherwise ignored, so they never
/// mask the error being reported.
pub fn record(root: &Path, error: &dyn Error) {
    let path = root.join(ERROR_LOG_FILE);

    match append(&path, error) {
        Ok(()) => info!(target: "error_log", "Error written to {}", path.display()),
        Err(e) => warn!(target: "error_log", "Could not write {}: {}", path.display(), e),
    }
}

//=== Internal Helpers ====================================================

fn append(path: &Path, error: &dyn Error) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_entry(error).as_bytes())
}

fn format_entry(error: &dyn Error) -> String {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut entry = format!("[{}] {}\n", stamp, error);
    let mut source = error.source();
    while let Some(cause) = source {
        entry.push_str(&format!("  caused by: {}\n", cause));
        source = cause.source();
    }
    entry
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EngineError, HookError, Phase};
    use std::fs;

    #[test]
    fn record_appends_entries_with_causes() {
        let dir = tempfile::tempdir().unwrap();

        let source: HookError = "out of ammo".into();
        let first = EngineError::hook("Level", Phase::Update, 4, source);
        let second = EngineError::EmptyStack { op: "pop" };

        record(dir.path(), &first);
        record(dir.path(), &second);

        let text = fs::read_to_string(dir.path().join(ERROR_LOG_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("update hook of state `Level` failed in frame 4"));
        assert_eq!(lines[1], "  caused by: out of ammo");
        assert!(lines[2].ends_with("Cannot pop with an empty state stack"));
    }

    #[test]
    fn record_into_missing_directory_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does/not/exist");

        record(&missing, &EngineError::EmptyStack { op: "change" });

        assert!(!missing.join(ERROR_LOG_FILE).exists());
    }
}

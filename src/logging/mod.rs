//! Operator Logging
//!
//! The coordinator and worker keep a small append-only operations log in
//! addition to the structured `tracing` output. Exactly two severities are
//! needed: `info` for normal lifecycle events and `warn` for anything an
//! operator should look at (failed nodes, lost connections, bad input).
//!
//! Components receive the log as an `Arc<dyn EventLog>` at construction so
//! synchronization and file handling stay in one place.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// The logging capability the core components depend on.
///
/// Implementations must be safe to call from any task; messages are
/// single-line, human-readable strings.
pub trait EventLog: Send + Sync {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// Appends timestamped lines to a log file and echoes each message through
/// `tracing` for the operator-visible stream.
pub struct FileLog {
    file: Mutex<File>,
}

impl FileLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn append(&self, level: &str, msg: &str) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        if let Ok(mut file) = self.file.lock() {
            // A full log disk is not worth taking the process down.
            let _ = writeln!(file, "[{}] [{}] {}", stamp, level, msg);
        }
    }
}

impl EventLog for FileLog {
    fn info(&self, msg: &str) {
        self.append("INFO", msg);
        tracing::info!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        self.append("WARN", msg);
        tracing::warn!("{}", msg);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_log_appends_both_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ops.log");

        let log = FileLog::open(&path).unwrap();
        log.info("node registered: node-1");
        log.warn("node node-1 failed (no heartbeat)");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO] node registered: node-1"));
        assert!(lines[1].contains("[WARN] node node-1 failed (no heartbeat)"));
    }

    #[test]
    fn test_file_log_appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ops.log");

        {
            let log = FileLog::open(&path).unwrap();
            log.info("first run");
        }
        {
            let log = FileLog::open(&path).unwrap();
            log.info("second run");
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}

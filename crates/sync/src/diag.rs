//! Append-only diagnostic log.
//!
//! The integration keeps a flat, timestamped log file that operators diff
//! against supplier tickets; `tracing` events mirror every entry for normal
//! observability. Requests and responses are recorded before an outcome is
//! decided, so a crashed run still shows what was sent.
//!
//! Credential values only reach the file when the `log_secrets` debug flag
//! is set (see [`DiagnosticLog::log_sensitive`]).

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;

/// Shared handle to an append-only diagnostic log.
///
/// Cheap to clone; all clones append to the same sink. Write failures are
/// reported through `tracing` and otherwise swallowed - diagnostics must
/// never fail an operation.
#[derive(Clone)]
pub struct DiagnosticLog {
    inner: Arc<Inner>,
}

struct Inner {
    sink: Mutex<Sink>,
    log_secrets: bool,
}

enum Sink {
    File(PathBuf),
    Memory(Vec<String>),
    Disabled,
}

impl DiagnosticLog {
    /// Open (creating if necessary) a log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be opened for appending.
    pub fn to_file(path: impl Into<PathBuf>, log_secrets: bool) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Touch the file so permission problems surface at startup.
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            inner: Arc::new(Inner {
                sink: Mutex::new(Sink::File(path)),
                log_secrets,
            }),
        })
    }

    /// An in-memory log, used by tests to assert on entries.
    #[must_use]
    pub fn in_memory(log_secrets: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink: Mutex::new(Sink::Memory(Vec::new())),
                log_secrets,
            }),
        }
    }

    /// A log that discards everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            inner: Arc::new(Inner {
                sink: Mutex::new(Sink::Disabled),
                log_secrets: false,
            }),
        }
    }

    /// Append one timestamped entry.
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!(target: "superball::diag", "{message}");
        let line = format!("[{}] {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S"), message);

        let Ok(mut sink) = self.inner.sink.lock() else {
            return;
        };
        match &mut *sink {
            Sink::File(path) => {
                let result = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&*path)
                    .and_then(|mut f| f.write_all(line.as_bytes()));
                if let Err(e) = result {
                    tracing::warn!(path = %path.display(), error = %e, "diagnostic log write failed");
                }
            }
            Sink::Memory(entries) => entries.push(line),
            Sink::Disabled => {}
        }
    }

    /// Append an entry containing credential material.
    ///
    /// The closure only runs when the configuration's `log_secrets` flag was
    /// set, so secrets are neither formatted nor written otherwise.
    pub fn log_sensitive(&self, make: impl FnOnce() -> String) {
        if self.inner.log_secrets {
            self.log(make());
        }
    }

    /// Current log contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be read.
    pub fn contents(&self) -> io::Result<String> {
        let sink = self
            .inner
            .sink
            .lock()
            .map_err(|_| io::Error::other("diagnostic log poisoned"))?;
        match &*sink {
            Sink::File(path) => fs::read_to_string(path),
            Sink::Memory(entries) => Ok(entries.concat()),
            Sink::Disabled => Ok(String::new()),
        }
    }

    /// Number of entries written so far (in-memory sink only; files count lines).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.contents().map(|c| c.lines().count()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_log_records_entries() {
        let log = DiagnosticLog::in_memory(false);
        log.log("first");
        log.log("second");
        let contents = log.contents().unwrap();
        assert!(contents.contains("first"));
        assert!(contents.contains("second"));
        assert_eq!(log.entry_count(), 2);
    }

    #[test]
    fn sensitive_entries_are_gated() {
        let gated = DiagnosticLog::in_memory(false);
        gated.log_sensitive(|| "Access Key: hunter2".to_string());
        assert_eq!(gated.entry_count(), 0);

        let open = DiagnosticLog::in_memory(true);
        open.log_sensitive(|| "Access Key: hunter2".to_string());
        assert!(open.contents().unwrap().contains("hunter2"));
    }

    #[test]
    fn file_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/debug.log");
        let log = DiagnosticLog::to_file(&path, false).unwrap();
        log.log("hello");
        log.log("again");
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("hello"));
    }
}

//! Diagnostic log sinks.
//!
//! A [`LogSink`] is handed to the generator explicitly instead of being a
//! process-wide side channel. Sinks never fail: a line that cannot be written
//! is dropped. Every message is also forwarded to the `log` facade at debug
//! level so it shows up alongside the rest of the crate's diagnostics.

// Internal imports (std, crate)
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;

/// Append-only, line oriented diagnostic destination
pub trait LogSink: Send + Sync {
    /// Record one message. Implementations must swallow their own failures.
    fn log(&self, message: &str);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, message: &str) {
        log::debug!("{}", message);
    }
}

/// Sink appending `<timestamp>: <message>` lines to a file
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "{}: {}", timestamp, message)
    }
}

impl LogSink for FileLogSink {
    fn log(&self, message: &str) {
        log::debug!("{}", message);
        if let Err(e) = self.append(message) {
            log::trace!("dropping log line for {}: {}", self.path.display(), e);
        }
    }
}

/// Build the sink selected by `settings.log_file`
pub fn sink_from_settings(settings: &Settings) -> Arc<dyn LogSink> {
    match &settings.log_file {
        Some(path) => Arc::new(FileLogSink::new(path.clone())),
        None => Arc::new(NoopLogSink),
    }
}

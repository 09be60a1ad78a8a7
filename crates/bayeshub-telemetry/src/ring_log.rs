//! Fixed-capacity in-memory diagnostic log
//!
//! Keeps the most recent operational messages. Once full, each new entry
//! overwrites the oldest one. Entries are read back newest first.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Severity tag stamped on each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Notice,
    Warn,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Notice => "NOTICE",
            Self::Warn => "WARN",
            Self::Fatal => "FATAL",
        };
        f.write_str(tag)
    }
}

/// Circular diagnostic log shared across request handlers
pub struct DiagnosticLog {
    capacity: usize,
    entries: Mutex<VecDeque<String>>,
}

impl DiagnosticLog {
    /// Create a log holding at most `capacity` entries (minimum one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently retained
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Append a timestamped entry, evicting the oldest when full
    pub fn record(&self, severity: Severity, message: impl AsRef<str>) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let entry = format!("{} {} {}", now, severity, message.as_ref());

        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn notice(&self, message: impl AsRef<str>) {
        self.record(Severity::Notice, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(Severity::Warn, message);
    }

    pub fn fatal(&self, message: impl AsRef<str>) {
        self.record(Severity::Fatal, message);
    }

    /// Remove and return every entry, newest first
    pub fn drain_to_list(&self) -> Vec<String> {
        self.entries.lock().drain(..).rev().collect()
    }

    /// Emit every entry through tracing, newest first, and empty the log.
    /// Returns the number of entries emitted.
    pub fn drain_to_console(&self) -> usize {
        let entries = self.drain_to_list();
        for entry in &entries {
            tracing::info!(target: "bayeshub::diagnostic", "{}", entry);
        }
        entries.len()
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(100)
    }
}

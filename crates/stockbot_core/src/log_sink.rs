use std::fmt;

use chrono::Local;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Step,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Step => "step",
        };
        f.write_str(label)
    }
}

/// One user-visible progress line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    timestamp: String,
    message: String,
    level: LogLevel,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
            level,
        }
    }

    /// Entry stamped with the current local time.
    pub fn now(message: impl Into<String>, level: LogLevel) -> Self {
        Self::new(local_timestamp(), message, level)
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }
}

/// Human-readable local wall-clock time, e.g. `14:03:27`.
pub fn local_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Append-only, unbounded, ordered list of log entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSink {
    entries: Vec<LogEntry>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: impl Into<String>, level: LogLevel) {
        self.entries.push(LogEntry::now(message, level));
    }

    /// Append an entry produced elsewhere, keeping its timestamp.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

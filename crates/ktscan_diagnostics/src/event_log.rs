//! Thread-safe, run-scoped event log.

use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded log event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    /// The severity the event was recorded at.
    pub severity: Severity,
    /// The exact message text.
    pub message: String,
}

/// A thread-safe accumulator of log events for one analysis run.
///
/// Parser workers may record events concurrently. Every record is also
/// forwarded to `tracing` at the matching level so host log collectors see
/// the same messages tests assert against. The error count is tracked
/// atomically for fast `has_errors` checks without locking the record
/// vector.
pub struct EventLog {
    records: Mutex<Vec<LogRecord>>,
    error_count: AtomicUsize,
}

impl EventLog {
    /// Creates a new empty event log.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Records an event at the given severity.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info => tracing::info!("{message}"),
            Severity::Warn => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
        if severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let mut records = self.records.lock().unwrap();
        records.push(LogRecord { severity, message });
    }

    /// Records a debug-level event.
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    /// Records an info-level event.
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    /// Records a warn-level event.
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    /// Records an error-level event.
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Returns `true` if any error-severity events have been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of error-severity events recorded so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all recorded events in emission order.
    pub fn records(&self) -> Vec<LogRecord> {
        let records = self.records.lock().unwrap();
        records.clone()
    }

    /// Returns `true` if an event with exactly this severity and message
    /// has been recorded.
    pub fn contains(&self, severity: Severity, message: &str) -> bool {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .any(|r| r.severity == severity && r.message == message)
    }

    /// Returns all message texts recorded at the given severity.
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .filter(|r| r.severity == severity)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log() {
        let log = EventLog::new();
        assert!(!log.has_errors());
        assert_eq!(log.error_count(), 0);
        assert!(log.records().is_empty());
    }

    #[test]
    fn records_in_order() {
        let log = EventLog::new();
        log.info("first");
        log.warn("second");
        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].severity, Severity::Warn);
    }

    #[test]
    fn error_count_tracks_errors_only() {
        let log = EventLog::new();
        log.warn("not an error");
        assert!(!log.has_errors());
        log.error("boom");
        assert!(log.has_errors());
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn contains_requires_exact_message() {
        let log = EventLog::new();
        log.info("Content hash cache is disabled");
        assert!(log.contains(Severity::Info, "Content hash cache is disabled"));
        assert!(!log.contains(Severity::Info, "Content hash cache"));
        assert!(!log.contains(Severity::Warn, "Content hash cache is disabled"));
    }

    #[test]
    fn messages_at_filters_by_severity() {
        let log = EventLog::new();
        log.warn("w1");
        log.error("e1");
        log.warn("w2");
        assert_eq!(log.messages_at(Severity::Warn), vec!["w1", "w2"]);
        assert_eq!(log.messages_at(Severity::Error), vec!["e1"]);
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(EventLog::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let log = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    log.error("concurrent");
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(log.error_count(), 800);
        assert_eq!(log.records().len(), 800);
    }
}

//! Diagnostics for the ktscan sensor: per-file analysis errors and the
//! run-scoped event log.
//!
//! The event log is the observable surface of the sensor. Every recoverable
//! condition (cache collisions, parse failures, semantic-context failures)
//! is reported here rather than propagated, and tests assert the exact
//! messages the sensor is contracted to emit.

#![warn(missing_docs)]

mod analysis_error;
mod event_log;
mod severity;

pub use analysis_error::{AnalysisError, TextPointer};
pub use event_log::{EventLog, LogRecord};
pub use severity::Severity;

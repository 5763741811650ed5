//! Error types for the analysis front-end collaborators.

use ktscan_diagnostics::TextPointer;

/// A file could not be parsed.
///
/// Reported as a per-file analysis error with a line/column pointer when
/// the parser could locate the failure. Never aborts the run.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Description of the parse failure.
    pub message: String,
    /// The failure site, when known.
    pub location: Option<TextPointer>,
}

impl ParseError {
    /// Creates a parse error with no location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Creates a parse error located at 1-indexed line/column coordinates.
    pub fn at(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            location: Some(TextPointer::new(line, column)),
        }
    }
}

/// Binding-context construction failed inside the compiler front-end.
///
/// Carried as a value instead of unwinding; the semantic-context guard
/// converts it into a single degraded-mode diagnostic.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct BindError {
    /// Description of the front-end failure.
    pub message: String,
}

impl BindError {
    /// Creates a bind error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::at("unexpected token '}'", 3, 14);
        assert_eq!(format!("{err}"), "unexpected token '}'");
        assert_eq!(err.location, Some(TextPointer::new(3, 14)));
    }

    #[test]
    fn parse_error_without_location() {
        let err = ParseError::new("empty input");
        assert!(err.location.is_none());
    }

    #[test]
    fn bind_error_display() {
        let err = BindError::new("I/O failure while indexing classpath");
        assert_eq!(format!("{err}"), "I/O failure while indexing classpath");
    }
}

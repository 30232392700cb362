//! A single diagnostic message.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One message emitted by a pass.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How severe the message is.
    pub severity: Severity,
    /// Human-readable message text.
    pub message: String,
}

impl Diagnostic {
    /// Creates an informational note.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
        }
    }

    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Diagnostic::note("n").severity, Severity::Note);
        assert_eq!(Diagnostic::warning("w").severity, Severity::Warning);
        assert_eq!(Diagnostic::error("e").severity, Severity::Error);
    }

    #[test]
    fn display() {
        let d = Diagnostic::warning("net clk has no driver");
        assert_eq!(format!("{d}"), "warning: net clk has no driver");
    }

    #[test]
    fn serde_roundtrip() {
        let d = Diagnostic::error("bel already bound");
        let json = serde_json::to_string(&d).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}

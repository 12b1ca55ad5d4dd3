//! Error handling for the aidl front end.
//!
//! Two shapes of failure exist:
//!
//! - [`ParseDiagnostic`]: a recoverable problem found while parsing. The
//!   parse-state controller accumulates these so one run reports as many
//!   problems as possible.
//! - [`AidlError`]: a failure that stops the current operation (I/O, a
//!   duplicate method id, misuse of the controller).

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse_state::ParseStatus;

// ============================================================================
// FATAL ERRORS
// ============================================================================

#[derive(Error, Diagnostic, Debug)]
pub enum AidlError {
    #[error("cannot find input file '{}'", path.display())]
    #[diagnostic(code(aidl::io::not_found), help("check the path given on the command line"))]
    FileNotFound { path: PathBuf },

    #[error("cannot read input file '{}'", path.display())]
    #[diagnostic(code(aidl::io::read))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    #[diagnostic(code(aidl::parse::syntax))]
    Syntax { line: u32, message: String },

    #[error("'{direction}' is not a parameter direction")]
    #[diagnostic(code(aidl::parse::direction), help("expected one of: in, out, inout"))]
    InvalidDirection {
        direction: String,
        line: Option<u32>,
    },

    #[error(
        "interface {interface}: method '{second}' reuses id {id} already assigned to '{first}'"
    )]
    #[diagnostic(
        code(aidl::ids::duplicate),
        help("every explicit method id must be unique within its interface")
    )]
    DuplicateExplicitId {
        interface: String,
        id: u32,
        first: String,
        second: String,
        line: u32,
    },

    #[error("interface {interface}: id '{value}' of method '{method}' is outside 0..={max}")]
    #[diagnostic(code(aidl::ids::range))]
    IdOutOfRange {
        interface: String,
        method: String,
        value: String,
        max: u32,
        line: u32,
    },

    #[error("{operation} is not valid while the parser is {state}")]
    #[diagnostic(code(aidl::usage::precondition))]
    UsagePrecondition {
        operation: &'static str,
        state: ParseStatus,
    },
}

impl AidlError {
    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            AidlError::Syntax { line, .. }
            | AidlError::DuplicateExplicitId { line, .. }
            | AidlError::IdOutOfRange { line, .. } => Some(*line),
            AidlError::InvalidDirection { line, .. } => *line,
            AidlError::FileNotFound { .. }
            | AidlError::Io { .. }
            | AidlError::UsagePrecondition { .. } => None,
        }
    }

    /// Pins an error raised away from the source to `at`. A line the error
    /// already carries is kept.
    pub fn at_line(mut self, at: u32) -> Self {
        if let AidlError::InvalidDirection { line, .. } = &mut self {
            line.get_or_insert(at);
        }
        self
    }
}

// ============================================================================
// ACCUMULATED DIAGNOSTICS
// ============================================================================

/// One reported problem, tagged with the file it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    pub file: String,
    pub line: Option<u32>,
    pub message: String,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_includes_line_when_known() {
        let diag = ParseDiagnostic {
            file: "IFoo.aidl".into(),
            line: Some(3),
            message: "syntax error".into(),
        };
        assert_eq!(diag.to_string(), "IFoo.aidl:3: syntax error");

        let diag = ParseDiagnostic { line: None, ..diag };
        assert_eq!(diag.to_string(), "IFoo.aidl: syntax error");
    }

    #[test]
    fn line_is_reported_for_positional_errors() {
        let err = AidlError::InvalidDirection {
            direction: "inn".into(),
            line: None,
        };
        assert_eq!(err.line(), None);
        let err = err.at_line(7);
        assert_eq!(err.line(), Some(7));
        assert!(err.to_string().contains("'inn'"));
        assert_eq!(err.at_line(9).line(), Some(7));

        let err = AidlError::FileNotFound {
            path: PathBuf::from("missing.aidl"),
        };
        assert_eq!(err.line(), None);
    }
}

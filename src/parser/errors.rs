//! Error types for goroutine dump parsing
//!
//! This module defines [`TraceError`], which represents every way reading a
//! dump can fail. All parse errors are fatal: the parser never returns a
//! partial [`Trace`](crate::model::Trace).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while reading or parsing a dump
#[derive(Debug)]
pub enum TraceError {
    /// The dump file could not be read
    Io { path: PathBuf, source: io::Error },

    /// A line matched none of the grammar productions, or the block
    /// structure around it is invalid
    Malformed {
        line_number: usize,
        line: String,
        expected: &'static str,
    },

    /// A numeric, duration or hexadecimal token failed to convert
    ValueParse {
        line_number: usize,
        line: String,
        fragment: String,
        reason: String,
    },
}

impl TraceError {
    pub(crate) fn malformed(line_number: usize, line: &str, expected: &'static str) -> Self {
        TraceError::Malformed {
            line_number,
            line: line.to_string(),
            expected,
        }
    }

    pub(crate) fn value(
        line_number: usize,
        line: &str,
        fragment: &str,
        reason: impl fmt::Display,
    ) -> Self {
        TraceError::ValueParse {
            line_number,
            line: line.to_string(),
            fragment: fragment.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            TraceError::Malformed {
                line_number,
                line,
                expected,
            } => {
                write!(
                    f,
                    "Invalid trace at line {}: expected {}, got {:?}",
                    line_number, expected, line
                )
            }
            TraceError::ValueParse {
                line_number,
                line,
                fragment,
                reason,
            } => {
                write!(
                    f,
                    "Failed to parse {:?} at line {} ({:?}): {}",
                    fragment, line_number, line, reason
                )
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

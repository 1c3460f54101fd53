//! Goroutine records and their ancestor chains

use super::frame::Frame;
use std::time::Duration;

/// One goroutine captured in the dump
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoRoutine {
    pub id: u64,
    pub status: String,
    /// `None` when the header had no duration clause
    pub age: Option<Duration>,
    /// Index 0 is the innermost (currently executing) frame
    pub stack: Vec<Frame>,
    /// The goroutine whose execution created this one, if recorded
    pub ancestor: Option<Box<GoRoutine>>,
    /// Verbatim non-blank lines of this record's own block
    pub raw: String,
}

impl GoRoutine {
    pub fn new(id: u64, status: impl Into<String>) -> Self {
        GoRoutine {
            id,
            status: status.into(),
            ..GoRoutine::default()
        }
    }

    /// The innermost frame
    pub fn first_frame(&self) -> Option<&Frame> {
        self.stack.first()
    }

    /// Iterate over the ancestor chain, nearest ancestor first
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.ancestor.as_deref(),
        }
    }

    /// Every pointer value of every frame, in frame order
    pub fn all_arguments(&self) -> impl Iterator<Item = u64> + '_ {
        self.stack.iter().flat_map(|f| f.arguments.iter().copied())
    }

    pub(crate) fn push_raw(&mut self, line: &str) {
        if !self.raw.is_empty() {
            self.raw.push('\n');
        }
        self.raw.push_str(line);
    }
}

/// Iterator over an ancestor chain
pub struct Ancestors<'a> {
    next: Option<&'a GoRoutine>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a GoRoutine;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.ancestor.as_deref();
        Some(current)
    }
}

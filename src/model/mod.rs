//! In-memory model of a parsed goroutine dump
//!
//! This module provides the passive data structures produced by the parser:
//! - [`frame`]: A single call-stack entry ([`Frame`])
//! - [`goroutine`]: One thread record with its stack and ancestor chain ([`GoRoutine`])
//! - [`Trace`]: The ordered top-level records of one dump plus filter bookkeeping
//!
//! # Ancestors
//!
//! Ancestor records are never listed at the top level of a [`Trace`]. They are
//! only reachable through [`GoRoutine::ancestor`], and the chain always ends in
//! `None` because the parser only links forward through the file.

pub mod frame;
pub mod goroutine;

pub use frame::Frame;
pub use goroutine::GoRoutine;

use crate::parser::filter::Filters;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

/// A fully parsed and filtered goroutine dump
#[derive(Debug, Clone, Default)]
pub struct Trace {
    /// Top-level records in file order (after filtering)
    pub goroutines: Vec<GoRoutine>,

    /// Pointer value -> ids of the records whose frames mention it
    pub related_args: FxHashMap<u64, BTreeSet<u64>>,

    /// Filters the dump was parsed with
    pub filters: Filters,

    /// Number of top-level records the filters rejected
    pub filtered_out: usize,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.goroutines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goroutines.is_empty()
    }

    /// Find a top-level record by id
    pub fn get(&self, id: u64) -> Option<&GoRoutine> {
        self.goroutines.iter().find(|g| g.id == id)
    }

    /// Ids of the records that reference `pointer` in any frame signature
    pub fn related(&self, pointer: u64) -> Option<&BTreeSet<u64>> {
        self.related_args.get(&pointer)
    }

    pub(crate) fn record_pointer(&mut self, pointer: u64, id: u64) {
        self.related_args.entry(pointer).or_default().insert(id);
    }
}

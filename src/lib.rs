//! # Introduction
//!
//! gorou reads a Go goroutine dump (the text the runtime prints on panic,
//! `SIGQUIT` or `debug.Stack`) and lets you browse it through a terminal UI
//! built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Dump text → Parser → Trace → Grouping → Navigator → TUI
//! ```
//!
//! 1. [`parser`]: line-oriented state machine turning the dump into a
//!    [`model::Trace`], applying include/exclude [`parser::Filters`].
//! 2. [`model`]: goroutines, their frames and ancestor chains.
//! 3. [`grouping`]: buckets goroutines by age, by call-stack fingerprint or
//!    by status.
//! 4. [`navigation`]: the two-level cursor over groups and goroutines that
//!    reports every selection change to a [`navigation::DetailListener`].
//! 5. [`config`] and [`paths`]: `.gorou.toml` discovery, command-line
//!    overrides and captured-path remapping.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod config;
pub mod grouping;
pub mod model;
pub mod navigation;
pub mod parser;
pub mod paths;
pub mod ui;

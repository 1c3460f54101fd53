//! Goroutine dump parser
//!
//! This module transforms the text of a goroutine dump into a [`Trace`]:
//! - [`grammar`]: Line classification (raw line → [`grammar::DumpLine`])
//! - [`parse`]: The parsing state machine (lines → [`Trace`])
//! - [`filter`]: Include/exclude substring filters
//! - [`errors`]: [`TraceError`]
//!
//! # Supported Format
//!
//! The format is the one printed by the Go runtime on `SIGQUIT`, a panic, or
//! `runtime.Stack(buf, true)`: a header per goroutine, then `function(args)`
//! / `\tfile:line` pairs, and optionally `[originating from goroutine N]:`
//! ancestor sections when the program ran with `GODEBUG=tracebackancestors`.
//!
//! # Parser Implementation
//!
//! Hand-written line state machine over anchored regular expressions; the
//! only lookahead is the location line that must follow every frame.
//!
//! [`Trace`]: crate::model::Trace

pub mod errors;
pub mod filter;
pub mod grammar;
pub mod parse;

pub use errors::TraceError;
pub use filter::Filters;
pub use parse::{parse, parse_file, TraceParser};

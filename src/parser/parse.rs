//! Goroutine dump parser
//!
//! This module provides the [`TraceParser`] state machine and the [`parse`] /
//! [`parse_file`] entry points.
//!
//! # Parser Architecture
//!
//! Lines are classified by [`grammar::classify`](super::grammar::classify)
//! and fed through a small state machine:
//! - A header opens a new top-level record and closes the previous one
//! - A signature appends a frame to the *current* record and must be followed
//!   immediately by its location line (the only lookahead)
//! - An ancestor marker links a fresh record from the current one and makes it
//!   current, so following frames land on the ancestor
//!
//! # Filtering
//!
//! Records are appended optimistically. When a top-level record's block is
//! complete the [`Filters`] are checked against its raw text, and a rejected
//! record is popped again.

use super::errors::TraceError;
use super::filter::Filters;
use super::grammar::{self, DumpLine};
use crate::model::{Frame, GoRoutine, Trace};
use std::fs;
use std::path::Path;

/// Parse a dump held in memory
pub fn parse(text: &str, filters: &Filters) -> Result<Trace, TraceError> {
    TraceParser::new(text, filters).parse()
}

/// Read and parse a dump file
pub fn parse_file(path: impl AsRef<Path>, filters: &Filters) -> Result<Trace, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, filters)
}

/// Line-oriented parser for goroutine dumps
pub struct TraceParser<'a> {
    lines: Vec<&'a str>,
    position: usize,
    filters: &'a Filters,
    trace: Trace,
    /// `None` before the first header; `Some(0)` is the top-level record,
    /// `Some(n)` its n-th ancestor
    depth: Option<usize>,
    /// Line number and text that opened the current record
    record_start: (usize, &'a str),
}

impl<'a> TraceParser<'a> {
    pub fn new(text: &'a str, filters: &'a Filters) -> Self {
        TraceParser {
            lines: text.lines().collect(),
            position: 0,
            filters,
            trace: Trace {
                filters: filters.clone(),
                ..Trace::default()
            },
            depth: None,
            record_start: (0, ""),
        }
    }

    /// Consume every line and return the filtered trace
    pub fn parse(mut self) -> Result<Trace, TraceError> {
        while let Some((line_number, line)) = self.advance() {
            match grammar::classify(line) {
                DumpLine::Blank => {}
                DumpLine::Header {
                    id,
                    status,
                    duration,
                } => self.parse_header(line_number, line, id, status, duration)?,
                DumpLine::Signature {
                    created_by,
                    package,
                    call,
                } => self.parse_frame(line_number, line, created_by, package, call)?,
                DumpLine::Ancestor { id } => self.parse_ancestor(line_number, line, id)?,
                DumpLine::Location { .. } => {
                    return Err(TraceError::malformed(
                        line_number,
                        line,
                        "a frame signature before this location line",
                    ));
                }
                DumpLine::Unknown => {
                    return Err(TraceError::malformed(
                        line_number,
                        line,
                        "a goroutine header, frame, location or ancestor marker",
                    ));
                }
            }
        }

        self.finish_goroutine()?;

        log::info!(
            "parsed {} goroutines ({} filtered out)",
            self.trace.goroutines.len(),
            self.trace.filtered_out
        );
        Ok(self.trace)
    }

    // ===== Productions =====

    fn parse_header(
        &mut self,
        line_number: usize,
        line: &'a str,
        id: &str,
        status: &str,
        duration: Option<&str>,
    ) -> Result<(), TraceError> {
        self.finish_goroutine()?;

        let id = parse_id(line_number, line, id)?;
        let mut goroutine = GoRoutine::new(id, status);
        // Trailing status annotations such as `locked to thread` land in
        // `duration` and fail to convert.
        if let Some(duration) = duration {
            let normalized = grammar::normalize_duration(duration);
            let age = humantime::parse_duration(&normalized)
                .map_err(|e| TraceError::value(line_number, line, duration, e))?;
            goroutine.age = Some(age);
        }
        goroutine.push_raw(line);

        self.trace.goroutines.push(goroutine);
        self.depth = Some(0);
        self.record_start = (line_number, line);
        Ok(())
    }

    fn parse_frame(
        &mut self,
        line_number: usize,
        line: &'a str,
        created_by: bool,
        package: &str,
        call: &str,
    ) -> Result<(), TraceError> {
        let Some(owner) = self.current().map(|g| g.id) else {
            return Err(TraceError::malformed(
                line_number,
                line,
                "a goroutine header before the first frame",
            ));
        };

        let mut arguments = Vec::new();
        for token in grammar::hex_tokens(call) {
            let value = u64::from_str_radix(token, 16)
                .map_err(|e| TraceError::value(line_number, line, token, e))?;
            arguments.push(value);
        }
        let (function, arguments_raw) = grammar::split_call(call);

        // Mandatory lookahead: the location line
        let Some((location_number, location_line)) = self.advance() else {
            return Err(TraceError::malformed(
                line_number,
                line,
                "a location line after this frame, found end of input",
            ));
        };
        let Some(DumpLine::Location { file, line: file_line }) = grammar::location(location_line)
        else {
            return Err(TraceError::malformed(
                location_number,
                location_line,
                "a tab-indented file:line location",
            ));
        };
        let file_line = file_line
            .parse::<u64>()
            .map_err(|e| TraceError::value(location_number, location_line, file_line, e))?;
        if file_line == 0 {
            return Err(TraceError::value(
                location_number,
                location_line,
                "0",
                "line numbers start at 1",
            ));
        }

        for &pointer in &arguments {
            self.trace.record_pointer(pointer, owner);
        }

        let frame = Frame {
            package: package.to_string(),
            function,
            arguments_raw,
            arguments,
            file: file.to_string(),
            line: file_line,
            created_by,
        };

        let Some(current) = self.current_mut() else {
            return Err(TraceError::malformed(line_number, line, "a goroutine header"));
        };
        current.push_raw(line);
        current.push_raw(location_line);
        current.stack.push(frame);
        Ok(())
    }

    fn parse_ancestor(
        &mut self,
        line_number: usize,
        line: &'a str,
        id: &str,
    ) -> Result<(), TraceError> {
        let Some(depth) = self.depth else {
            return Err(TraceError::malformed(
                line_number,
                line,
                "a goroutine header before the ancestor marker",
            ));
        };
        self.close_record()?;

        let id = parse_id(line_number, line, id)?;
        let mut ancestor = GoRoutine::new(id, "");
        ancestor.push_raw(line);

        let Some(current) = self.current_mut() else {
            return Err(TraceError::malformed(line_number, line, "a goroutine header"));
        };
        current.ancestor = Some(Box::new(ancestor));
        self.depth = Some(depth + 1);
        self.record_start = (line_number, line);
        Ok(())
    }

    // ===== Helper methods =====

    fn advance(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.position)?;
        self.position += 1;
        Some((self.position, line))
    }

    fn current(&self) -> Option<&GoRoutine> {
        let depth = self.depth?;
        let mut current = self.trace.goroutines.last()?;
        for _ in 0..depth {
            current = current.ancestor.as_deref()?;
        }
        Some(current)
    }

    fn current_mut(&mut self) -> Option<&mut GoRoutine> {
        let depth = self.depth?;
        let mut current = self.trace.goroutines.last_mut()?;
        for _ in 0..depth {
            current = current.ancestor.as_deref_mut()?;
        }
        Some(current)
    }

    /// Every record needs at least one frame
    fn close_record(&self) -> Result<(), TraceError> {
        match self.current() {
            Some(record) if record.stack.is_empty() => {
                let (line_number, line) = self.record_start;
                Err(TraceError::malformed(
                    line_number,
                    line,
                    "at least one frame for this goroutine",
                ))
            }
            _ => Ok(()),
        }
    }

    /// Close the open top-level record and apply the filters to it
    fn finish_goroutine(&mut self) -> Result<(), TraceError> {
        if self.depth.is_none() {
            return Ok(());
        }
        self.close_record()?;
        self.depth = None;

        let rejected = self
            .trace
            .goroutines
            .last()
            .is_some_and(|g| !self.filters.accepts(&g.raw));
        if rejected {
            if let Some(dropped) = self.trace.goroutines.pop() {
                log::debug!("filtered out goroutine {}", dropped.id);
            }
            self.trace.filtered_out += 1;
        }
        Ok(())
    }
}

fn parse_id(line_number: usize, line: &str, id: &str) -> Result<u64, TraceError> {
    id.parse::<u64>()
        .map_err(|e| TraceError::value(line_number, line, id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TWO_THREADS: &str = "\
goroutine 1 [running]:
main.worker(0x1234)
\t/src/a.go:10

goroutine 2 [chan receive, 5 minutes]:
main.waiter()
\t/src/b.go:20
[originating from goroutine 1]:
main.worker(0x1234)
\t/src/a.go:10
";

    #[test]
    fn test_parse_two_threads() {
        let trace = parse(TWO_THREADS, &Filters::none()).unwrap();
        assert_eq!(trace.goroutines.len(), 2);

        let first = &trace.goroutines[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.status, "running");
        assert_eq!(first.age, None);
        assert_eq!(first.stack[0].function, "worker");
        assert_eq!(first.stack[0].arguments, vec![0x1234]);
        assert_eq!(first.stack[0].arguments_raw, "0x1234");

        let second = &trace.goroutines[1];
        assert_eq!(second.age, Some(Duration::from_secs(300)));
        let ancestor = second.ancestor.as_deref().unwrap();
        assert_eq!(ancestor.id, 1);
        assert_eq!(ancestor.stack.len(), 1);
        assert!(ancestor.ancestor.is_none());
    }

    #[test]
    fn test_related_args_recorded() {
        let trace = parse(TWO_THREADS, &Filters::none()).unwrap();
        let ids: Vec<u64> = trace.related(0x1234).unwrap().iter().copied().collect();
        assert_eq!(ids, vec![1]);
        assert!(trace.related(0x9999).is_none());
    }

    #[test]
    fn test_missing_location_at_eof() {
        let err = parse("goroutine 1 [running]:\nmain.main()", &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Malformed { line_number: 2, .. }));
    }

    #[test]
    fn test_missing_location_before_next_frame() {
        let text = "goroutine 1 [running]:\nmain.a()\nmain.b()\n\t/x.go:1\n";
        let err = parse(text, &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Malformed { line_number: 3, .. }));
    }

    #[test]
    fn test_unknown_line_is_fatal() {
        let text = "goroutine 1 [running]:\nmain.main()\n\t/x.go:1\nsomething else\n";
        let err = parse(text, &Filters::none()).unwrap_err();
        match err {
            TraceError::Malformed {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 4);
                assert_eq!(line, "something else");
            }
            other => panic!("Expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_before_header() {
        let err = parse("main.main()\n\t/x.go:1\n", &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Malformed { line_number: 1, .. }));
    }

    #[test]
    fn test_empty_stack_is_fatal() {
        let text = "goroutine 1 [running]:\ngoroutine 2 [running]:\nmain.main()\n\t/x.go:1\n";
        let err = parse(text, &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Malformed { line_number: 1, .. }));
    }

    #[test]
    fn test_bad_duration() {
        let err = parse("goroutine 1 [select, forever]:\n", &Filters::none()).unwrap_err();
        match err {
            TraceError::ValueParse { fragment, .. } => assert_eq!(fragment, "forever"),
            other => panic!("Expected value error, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_ancestor_chain() {
        let text = "\
goroutine 9 [running]:
main.leaf()
\t/src/leaf.go:3
[originating from goroutine 5]:
main.middle(0x10)
\t/src/middle.go:8
[originating from goroutine 1]:
main.main()
\t/src/main.go:20

goroutine 10 [select]:
main.other()
\t/src/other.go:4
";
        let trace = parse(text, &Filters::none()).unwrap();
        let top: Vec<u64> = trace.goroutines.iter().map(|g| g.id).collect();
        assert_eq!(top, vec![9, 10]);

        let chain: Vec<u64> = trace.goroutines[0].ancestors().map(|a| a.id).collect();
        assert_eq!(chain, vec![5, 1]);
        let root = trace.goroutines[0].ancestors().last().unwrap();
        assert_eq!(root.stack[0].function, "main");
        assert!(trace.goroutines[1].ancestor.is_none());

        let ids: Vec<u64> = trace.related(0x10).unwrap().iter().copied().collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn test_empty_ancestor_before_next_header() {
        let text = "\
goroutine 9 [running]:
main.leaf()
\t/src/leaf.go:3
[originating from goroutine 5]:
goroutine 10 [select]:
main.other()
\t/src/other.go:4
";
        let err = parse(text, &Filters::none()).unwrap_err();
        match err {
            TraceError::Malformed {
                line_number, line, ..
            } => {
                assert_eq!(line_number, 4);
                assert_eq!(line, "[originating from goroutine 5]:");
            }
            other => panic!("Expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_goroutine_at_end_of_input() {
        let text = "goroutine 1 [running]:\nmain.main()\n\t/x.go:1\n\ngoroutine 2 [running]:\n";
        let err = parse(text, &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Malformed { line_number: 5, .. }));
    }

    #[test]
    fn test_zero_line_number_rejected() {
        let err = parse("goroutine 1 [running]:\nmain.main()\n\t/x.go:0\n", &Filters::none())
            .unwrap_err();
        match err {
            TraceError::ValueParse {
                line_number,
                fragment,
                ..
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(fragment, "0");
            }
            other => panic!("Expected value error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_suffix_without_duration_is_fatal() {
        // everything after the first comma is read as the wait duration
        let err = parse(
            "goroutine 1 [syscall, locked to thread]:\nmain.main()\n\t/x.go:1\n",
            &Filters::none(),
        )
        .unwrap_err();
        match err {
            TraceError::ValueParse { fragment, .. } => assert_eq!(fragment, "locked to thread"),
            other => panic!("Expected value error, got {:?}", other),
        }
    }

    #[test]
    fn test_hex_overflow() {
        let text = "goroutine 1 [running]:\nmain.f(0x1ffffffffffffffff)\n\t/x.go:1\n";
        let err = parse(text, &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::ValueParse { line_number: 2, .. }));
    }

    #[test]
    fn test_include_and_exclude_filters() {
        let filters = Filters::new(["waiter"], Vec::<String>::new());
        let trace = parse(TWO_THREADS, &filters).unwrap();
        assert_eq!(trace.goroutines.len(), 1);
        assert_eq!(trace.goroutines[0].id, 2);
        assert_eq!(trace.filtered_out, 1);

        let filters = Filters::new(Vec::<String>::new(), ["a.go"]);
        let trace = parse(TWO_THREADS, &filters).unwrap();
        // goroutine 2 only mentions a.go inside its ancestor block
        assert_eq!(trace.goroutines.len(), 1);
        assert_eq!(trace.goroutines[0].id, 2);
    }

    #[test]
    fn test_empty_input() {
        let trace = parse("", &Filters::none()).unwrap();
        assert!(trace.is_empty());
        let trace = parse("\n\n  \n", &Filters::none()).unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file("/definitely/not/here.txt", &Filters::none()).unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }
}

//! Line classifier for goroutine dumps
//!
//! Splits one raw line into a [`DumpLine`] without converting any values; the
//! parser owns conversion so that it can attach line numbers to failures.
//! Recognized productions:
//!
//! ```text
//! goroutine 18 [chan receive, 5 minutes]:        Header
//! main.worker(0xc000012345, 0x1)                  Signature
//! created by main.main in goroutine 1             Signature (spawn site)
//! 	/src/main.go:42 +0x1d                        Location
//! [originating from goroutine 1]:                 Ancestor
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(?:goroutine|thread) ([0-9]+) \[(.*?)(?:, (.*))?\]:\z")
        .expect("header pattern")
});

static SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A(created by )?((?:[a-zA-Z0-9._-]+/)?[a-zA-Z0-9/_-]+)[.](.*)\z")
        .expect("signature pattern")
});

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\t(.*):([0-9]+)(?: \+0x[0-9a-f]+)?\z").expect("location pattern")
});

static ANCESTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\[originating from (?:goroutine|thread) ([0-9]+)\]:\z")
        .expect("ancestor pattern")
});

static ARGUMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]*)\)\z").expect("arguments pattern"));

static HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]+").expect("hex pattern"));

/// One classified line of a dump. Fields borrow from the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpLine<'a> {
    Blank,
    Header {
        id: &'a str,
        status: &'a str,
        duration: Option<&'a str>,
    },
    Signature {
        created_by: bool,
        package: &'a str,
        /// Everything after the package separator, arguments included
        call: &'a str,
    },
    Location {
        file: &'a str,
        line: &'a str,
    },
    Ancestor {
        id: &'a str,
    },
    Unknown,
}

/// Classify a single line
pub fn classify(line: &str) -> DumpLine<'_> {
    if line.trim().is_empty() {
        return DumpLine::Blank;
    }

    if let Some(caps) = HEADER.captures(line) {
        return DumpLine::Header {
            id: caps.get(1).map_or("", |m| m.as_str()),
            status: caps.get(2).map_or("", |m| m.as_str()),
            duration: caps.get(3).map(|m| m.as_str()).filter(|d| !d.is_empty()),
        };
    }

    if let Some(caps) = SIGNATURE.captures(line) {
        return DumpLine::Signature {
            created_by: caps.get(1).is_some(),
            package: caps.get(2).map_or("", |m| m.as_str()),
            call: caps.get(3).map_or("", |m| m.as_str()),
        };
    }

    if let Some(caps) = ANCESTOR.captures(line) {
        return DumpLine::Ancestor {
            id: caps.get(1).map_or("", |m| m.as_str()),
        };
    }

    if let Some(loc) = location(line) {
        return loc;
    }

    DumpLine::Unknown
}

/// Match only the location production (used for the mandatory lookahead)
pub fn location(line: &str) -> Option<DumpLine<'_>> {
    LOCATION.captures(line).map(|caps| DumpLine::Location {
        file: caps.get(1).map_or("", |m| m.as_str()),
        line: caps.get(2).map_or("", |m| m.as_str()),
    })
}

/// Rewrite the runtime's ` minutes` unit into the short form the duration
/// parser understands
pub fn normalize_duration(duration: &str) -> String {
    duration.replace(" minutes", "m")
}

/// Split `call` into the display function name and the raw argument text
///
/// The trailing parenthesized list is removed from the name, as is any other
/// hexadecimal token, so pointer values never leak into the display string.
pub fn split_call(call: &str) -> (String, String) {
    let arguments_raw = ARGUMENTS
        .captures(call)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let without_args = ARGUMENTS.replace_all(call, "");
    let function = HEX.replace_all(&without_args, "").into_owned();
    (function, arguments_raw)
}

/// Every `0x...` token in `text`, in order, without the prefix
pub fn hex_tokens(text: &str) -> impl Iterator<Item = &str> {
    HEX.find_iter(text).map(|m| &m.as_str()[2..])
}

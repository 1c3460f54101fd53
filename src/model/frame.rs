//! A single call-stack entry

use std::fmt;

/// One frame of a goroutine's call stack
///
/// `function` is the display name with pointer arguments stripped; the pointer
/// values themselves live in `arguments`, in the order they appeared in the
/// signature line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub package: String,
    pub function: String,
    pub arguments_raw: String,
    pub arguments: Vec<u64>,
    pub file: String,
    pub line: u64,
    /// The signature line carried the `created by ` prefix
    pub created_by: bool,
}

impl Frame {
    /// Last path segment of the package (`github.com/a/b` -> `b`)
    pub fn package_base(&self) -> &str {
        self.package
            .rsplit_once('/')
            .map(|(_, base)| base)
            .unwrap_or(&self.package)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} at {}:{}",
            self.package, self.function, self.file, self.line
        )
    }
}

//! Display paths for captured source locations
//!
//! Dumps record file paths as they were on the machine that produced them.
//! [`PathMapper`] rewrites them for the local checkout (`--dir SRC=DEST`) and
//! abbreviates the home directory to `~`.

use std::path::Path;

/// Prefix remapping table plus home-directory abbreviation
#[derive(Debug, Clone, Default)]
pub struct PathMapper {
    /// (captured prefix, local prefix), longest captured prefix first
    prefixes: Vec<(String, String)>,
    home: Option<String>,
}

impl PathMapper {
    /// Build a mapper using the current user's home directory
    pub fn new(dirs: impl IntoIterator<Item = (String, String)>) -> Self {
        let home = home::home_dir().and_then(|h| h.to_str().map(str::to_string));
        Self::with_home(dirs, home)
    }

    pub fn with_home(
        dirs: impl IntoIterator<Item = (String, String)>,
        home: Option<String>,
    ) -> Self {
        let mut prefixes: Vec<(String, String)> =
            dirs.into_iter().filter(|(src, _)| !src.is_empty()).collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        PathMapper {
            prefixes,
            home: home.filter(|h| !h.is_empty() && h != "/"),
        }
    }

    /// The path to show for `file`
    pub fn display(&self, file: &str) -> String {
        let mapped = self
            .prefixes
            .iter()
            .find(|(src, _)| file.starts_with(src.as_str()))
            .map(|(src, dest)| join(dest, &file[src.len()..]))
            .unwrap_or_else(|| file.to_string());

        match &self.home {
            Some(home) => match strip_dir_prefix(&mapped, home) {
                Some(rest) => join("~", rest),
                None => mapped,
            },
            None => mapped,
        }
    }
}

/// `rest` of `path` after `dir`, only on a component boundary
fn strip_dir_prefix<'p>(path: &'p str, dir: &str) -> Option<&'p str> {
    let dir = dir.trim_end_matches('/');
    let rest = path.strip_prefix(dir)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn join(base: &str, rest: &str) -> String {
    let rest = rest.trim_start_matches('/');
    if base.is_empty() {
        return rest.to_string();
    }
    if rest.is_empty() {
        return base.to_string();
    }
    Path::new(base).join(rest).to_string_lossy().into_owned()
}

//! Configuration loading
//!
//! Settings come from two layers:
//! - `.gorou.toml` files, discovered from the working directory upward
//!   ([`FileConfig::discover`]); nearer files win for scalar keys, lists are
//!   concatenated and `dirs` tables merged
//! - command-line [`Overrides`], which win over every file
//!
//! ```toml
//! filters = ["github.com/acme"]
//! excludes = ["runtime.gopark"]
//! pkg = "acme"
//! group = "age"
//! ancestor-frames = 3
//!
//! [dirs]
//! "/go/src/github.com/acme" = "~/src/acme"
//! ```

use crate::grouping::GroupBy;
use crate::parser::Filters;
use crate::paths::PathMapper;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".gorou.toml";

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
    /// A `--dir` value without `=`
    InvalidMapping(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config file {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path.display(), message)
            }
            ConfigError::InvalidMapping(value) => {
                write!(f, "Invalid directory mapping {:?}, expected SRC=DEST", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Contents of one `.gorou.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub dirs: BTreeMap<String, String>,
    pub filters: Vec<String>,
    pub excludes: Vec<String>,
    pub pkg: Option<String>,
    pub group: Option<GroupBy>,
    pub ancestor_frames: Option<i64>,
}

impl FileConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Merge every `.gorou.toml` from `start` up to the filesystem root
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        let mut merged = FileConfig::default();
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                log::debug!("loading config {}", candidate.display());
                merged = merged.merge(Self::load(&candidate)?);
            }
        }
        Ok(merged)
    }

    /// Combine with a config from farther away; `self` wins on conflicts
    pub fn merge(mut self, farther: FileConfig) -> FileConfig {
        for (src, dest) in farther.dirs {
            self.dirs.entry(src).or_insert(dest);
        }
        self.filters.extend(farther.filters);
        self.excludes.extend(farther.excludes);
        self.pkg = self.pkg.or(farther.pkg);
        self.group = self.group.or(farther.group);
        self.ancestor_frames = self.ancestor_frames.or(farther.ancestor_frames);
        self
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dirs: Vec<(String, String)>,
    pub filters: Vec<String>,
    pub excludes: Vec<String>,
    pub pkg: Option<String>,
    pub group: Option<GroupBy>,
    pub ancestor_frames: Option<i64>,
}

/// Fully resolved settings for one session
#[derive(Debug, Clone)]
pub struct Settings {
    pub filters: Filters,
    pub focus_package: Option<String>,
    pub group_by: GroupBy,
    /// `None` shows every ancestor frame
    pub ancestor_frames: Option<usize>,
    pub paths: PathMapper,
}

impl Settings {
    pub fn resolve(file: FileConfig, cli: Overrides) -> Settings {
        let mut dirs = file.dirs;
        dirs.extend(cli.dirs);

        let include = file.filters.into_iter().chain(cli.filters);
        let exclude = file.excludes.into_iter().chain(cli.excludes);

        let ancestor_frames = cli
            .ancestor_frames
            .or(file.ancestor_frames)
            .and_then(|n| usize::try_from(n).ok());

        Settings {
            filters: Filters::new(include, exclude),
            focus_package: cli.pkg.or(file.pkg).filter(|p| !p.is_empty()),
            group_by: cli.group.or(file.group).unwrap_or_default(),
            ancestor_frames,
            paths: PathMapper::new(dirs),
        }
    }
}

/// Parse a `SRC=DEST` directory mapping
pub fn parse_dir_mapping(value: &str) -> Result<(String, String), ConfigError> {
    match value.split_once('=') {
        Some((src, dest)) if !src.is_empty() => Ok((src.to_string(), dest.to_string())),
        _ => Err(ConfigError::InvalidMapping(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FULL: &str = r#"
filters = ["acme"]
excludes = ["runtime.gopark"]
pkg = "acme"
group = "stack"
ancestor-frames = 3

[dirs]
"/go/src" = "/home/me/go/src"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = FileConfig::from_toml(FULL, Path::new(".gorou.toml")).unwrap();
        assert_eq!(config.filters, vec!["acme"]);
        assert_eq!(config.excludes, vec!["runtime.gopark"]);
        assert_eq!(config.pkg.as_deref(), Some("acme"));
        assert_eq!(config.group, Some(GroupBy::Stack));
        assert_eq!(config.ancestor_frames, Some(3));
        assert_eq!(config.dirs["/go/src"], "/home/me/go/src");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FileConfig::from_toml("colour = true", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_merge_nearer_wins() {
        let near = FileConfig {
            pkg: Some("near".to_string()),
            filters: vec!["a".to_string()],
            dirs: BTreeMap::from([("/x".to_string(), "/near".to_string())]),
            ..FileConfig::default()
        };
        let far = FileConfig {
            pkg: Some("far".to_string()),
            group: Some(GroupBy::Age),
            filters: vec!["b".to_string()],
            dirs: BTreeMap::from([
                ("/x".to_string(), "/far".to_string()),
                ("/y".to_string(), "/far-y".to_string()),
            ]),
            ..FileConfig::default()
        };
        let merged = near.merge(far);
        assert_eq!(merged.pkg.as_deref(), Some("near"));
        assert_eq!(merged.group, Some(GroupBy::Age));
        assert_eq!(merged.filters, vec!["a", "b"]);
        assert_eq!(merged.dirs["/x"], "/near");
        assert_eq!(merged.dirs["/y"], "/far-y");
    }

    #[test]
    fn test_discover_walks_upward() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("project").join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "pkg = \"outer\"\nfilters = [\"x\"]",
        )
        .unwrap();
        fs::write(
            root.path().join("project").join(CONFIG_FILE_NAME),
            "pkg = \"inner\"",
        )
        .unwrap();

        let config = FileConfig::discover(&nested).unwrap();
        assert_eq!(config.pkg.as_deref(), Some("inner"));
        assert_eq!(config.filters, vec!["x"]);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            pkg: Some("file".to_string()),
            group: Some(GroupBy::Stack),
            ancestor_frames: Some(2),
            filters: vec!["f".to_string()],
            ..FileConfig::default()
        };
        let cli = Overrides {
            pkg: Some("cli".to_string()),
            ancestor_frames: Some(-1),
            filters: vec!["g".to_string()],
            ..Overrides::default()
        };
        let settings = Settings::resolve(file, cli);
        assert_eq!(settings.focus_package.as_deref(), Some("cli"));
        assert_eq!(settings.group_by, GroupBy::Stack);
        assert_eq!(settings.ancestor_frames, None);
        assert_eq!(settings.filters.include(), ["f", "g"]);
    }

    #[test]
    fn test_dir_mapping() {
        assert_eq!(
            parse_dir_mapping("/go/src=/home/me/src").unwrap(),
            ("/go/src".to_string(), "/home/me/src".to_string())
        );
        assert!(parse_dir_mapping("/go/src").is_err());
        assert!(parse_dir_mapping("=/x").is_err());
    }
}

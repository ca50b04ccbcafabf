//! Run configuration.
//!
//! The organizer has no configuration file: a run is fully described by the
//! root folder and a handful of command-line switches. This module turns
//! those into a validated [`RunConfig`].

use std::fs;
use std::path::{Path, PathBuf};

/// What to do when a file with the same normalized name already exists at
/// the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Abort the run with an error.
    #[default]
    Fail,
    /// Replace the existing file.
    Overwrite,
}

/// Errors that can occur while validating the run configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The root folder does not exist.
    RootNotFound(PathBuf),
    /// The root path exists but is not a directory.
    RootNotDirectory(PathBuf),
    /// The root path could not be resolved.
    RootUnreadable { path: PathBuf, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::RootNotFound(path) => {
                write!(f, "Folder not found: {}", path.display())
            }
            ConfigError::RootNotDirectory(path) => {
                write!(f, "Not a folder: {}", path.display())
            }
            ConfigError::RootUnreadable { path, reason } => {
                write!(f, "Cannot access {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for a single organizer run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Folder to organize.
    pub root: PathBuf,
    /// Only print what would happen.
    pub dry_run: bool,
    pub collision: CollisionPolicy,
    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl RunConfig {
    /// Creates a configuration with default settings for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
            collision: CollisionPolicy::default(),
            report_path: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_report_path(mut self, report_path: Option<PathBuf>) -> Self {
        self.report_path = report_path;
        self
    }

    /// Checks that the root is an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RootNotFound` if nothing exists at the path and
    /// `ConfigError::RootNotDirectory` if it is a file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_root(&self.root)
    }
}

fn validate_root(root: &Path) -> Result<(), ConfigError> {
    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::RootNotDirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(ConfigError::RootUnreadable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

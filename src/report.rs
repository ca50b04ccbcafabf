//! Run reporting.
//!
//! Failures that the organizer deliberately tolerates (unreadable archives,
//! directories that could not be pruned, reserved folders that were skipped)
//! are collected here instead of being dropped, together with every move
//! that was performed.

use crate::file_category::Category;
use crate::file_organizer::{Operation, OrganizeError, OrganizeResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A non-fatal event observed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A folder named like an output category was not descended into.
    SkippedReservedDir { path: PathBuf },
    /// An archive could not be unpacked and was left in its folder.
    ArchiveUnreadable { path: PathBuf, reason: String },
    /// An archive disappeared before it could be unpacked.
    ArchiveVanished { path: PathBuf },
    /// A directory could not be removed while pruning.
    DirectoryKept { path: PathBuf, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedReservedDir { path } => {
                write!(f, "Skipped reserved folder {}", path.display())
            }
            Self::ArchiveUnreadable { path, reason } => {
                write!(f, "Could not unpack {}: {}", path.display(), reason)
            }
            Self::ArchiveVanished { path } => {
                write!(f, "Archive vanished before unpacking: {}", path.display())
            }
            Self::DirectoryKept { path, reason } => {
                write!(f, "Kept directory {}: {}", path.display(), reason)
            }
        }
    }
}

/// Everything that happened during one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// RFC 3339 timestamp of when the run started.
    pub timestamp: String,
    pub root: PathBuf,
    pub dry_run: bool,
    /// Moves in the order they were performed (planned moves for a dry run).
    pub operations: Vec<Operation>,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of scanned files per category.
    pub category_counts: BTreeMap<Category, usize>,
    pub known_extensions: BTreeSet<String>,
    pub unknown_extensions: BTreeSet<String>,
}

impl RunReport {
    /// Creates an empty report for a run rooted at `root`.
    pub fn new(root: PathBuf, dry_run: bool) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            dry_run,
            operations: Vec::new(),
            diagnostics: Vec::new(),
            category_counts: BTreeMap::new(),
            known_extensions: BTreeSet::new(),
            unknown_extensions: BTreeSet::new(),
        }
    }

    /// Total number of files the scan found.
    pub fn total_files(&self) -> usize {
        self.category_counts.values().sum()
    }

    /// Diagnostics about archives that were left unpacked.
    pub fn unreadable_archives(&self) -> impl Iterator<Item = &Path> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::ArchiveUnreadable { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// Writes the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            OrganizeError::ReportWriteFailed {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            }
        })?;

        fs::write(path, json).map_err(|e| OrganizeError::ReportWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_total_files_sums_categories() {
        let mut report = RunReport::new(PathBuf::from("/tmp/root"), false);
        report.category_counts.insert(Category::Image, 3);
        report.category_counts.insert(Category::Other, 2);

        assert_eq!(report.total_files(), 5);
    }

    #[test]
    fn test_unreadable_archives_filter() {
        let mut report = RunReport::new(PathBuf::from("/tmp/root"), false);
        report.diagnostics.push(Diagnostic::ArchiveVanished {
            path: PathBuf::from("gone.zip"),
        });
        report.diagnostics.push(Diagnostic::ArchiveUnreadable {
            path: PathBuf::from("bad.zip"),
            reason: "invalid header".to_string(),
        });

        let unreadable: Vec<_> = report.unreadable_archives().collect();
        assert_eq!(unreadable, vec![Path::new("bad.zip")]);
    }

    #[test]
    fn test_save_writes_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report_path = temp_dir.path().join("report.json");

        let mut report = RunReport::new(temp_dir.path().to_path_buf(), true);
        report.unknown_extensions.insert("XYZ".to_string());
        report.diagnostics.push(Diagnostic::DirectoryKept {
            path: PathBuf::from("keep"),
            reason: "not empty".to_string(),
        });
        report.save(&report_path).expect("Failed to save report");

        let content = fs::read_to_string(&report_path).expect("Failed to read report");
        let json: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["unknown_extensions"][0], "XYZ");
        assert_eq!(json["diagnostics"][0]["kind"], "directory_kept");
    }
}

//! Recursive directory scan.
//!
//! Walks the tree depth-first in directory-iteration order and sorts every
//! file into the list of its category. Folders named exactly like an output
//! category are recorded but never descended into, so output from an earlier
//! run is left alone.

use crate::file_category::{Category, Classification, classify, extension_of};
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything found by a single scan.
///
/// File paths are valid at scan time only; once a path has been handed to
/// the organizer it must not be used again.
#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    files: HashMap<Category, Vec<PathBuf>>,
    /// Subfolders that were descended into.
    pub folders: Vec<PathBuf>,
    /// Folders skipped because their name is a category folder name.
    pub skipped_dirs: Vec<PathBuf>,
    /// Extensions found in the table.
    pub known_extensions: BTreeSet<String>,
    /// Non-empty extensions missing from the table.
    pub unknown_extensions: BTreeSet<String>,
}

impl ScanResult {
    /// Files of one category, in discovery order.
    pub fn files(&self, category: Category) -> &[PathBuf] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of files across all categories.
    pub fn total_files(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }

    fn record_file(&mut self, path: PathBuf) {
        let extension = extension_of(&path);
        let classification = classify(&extension);

        match classification {
            Classification::Known(_) => {
                self.known_extensions.insert(extension);
            }
            Classification::Unknown => {
                self.unknown_extensions.insert(extension);
            }
            Classification::Missing => {}
        }

        self.files
            .entry(classification.category())
            .or_default()
            .push(path);
    }
}

/// Scans `root` recursively.
///
/// # Errors
///
/// Returns `OrganizeError::InvalidBasePath` if the root cannot be read and
/// `OrganizeError::ScanFailed` if a nested directory cannot be read.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::file_category::Category;
/// use clean_folder::scanner::scan;
/// use std::path::Path;
///
/// let result = scan(Path::new("/path/to/downloads"))?;
/// println!("{} images", result.files(Category::Image).len());
/// # Ok::<(), clean_folder::file_organizer::OrganizeError>(())
/// ```
pub fn scan(root: &Path) -> OrganizeResult<ScanResult> {
    let entries = fs::read_dir(root).map_err(|e| OrganizeError::InvalidBasePath {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut result = ScanResult::default();
    scan_entries(entries, root, &mut result)?;

    tracing::debug!(
        "Scanned {}: {} files, {} folders, {} skipped",
        root.display(),
        result.total_files(),
        result.folders.len(),
        result.skipped_dirs.len()
    );

    Ok(result)
}

fn scan_dir(dir: &Path, result: &mut ScanResult) -> OrganizeResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| OrganizeError::ScanFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;
    scan_entries(entries, dir, result)
}

fn scan_entries(entries: fs::ReadDir, dir: &Path, result: &mut ScanResult) -> OrganizeResult<()> {
    for entry in entries {
        let entry = entry.map_err(|e| OrganizeError::ScanFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| OrganizeError::ScanFailed {
            path: path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            if Category::is_reserved_dir_name(&entry.file_name().to_string_lossy()) {
                tracing::debug!("Skipping reserved folder {}", path.display());
                result.skipped_dirs.push(path);
            } else {
                result.folders.push(path.clone());
                scan_dir(&path, result)?;
            }
            continue;
        }

        result.record_file(path);
    }

    Ok(())
}

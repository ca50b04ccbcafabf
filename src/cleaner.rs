//! Removal of directories emptied by a run.
//!
//! Pruning is best-effort: a directory that cannot be removed (usually
//! because it still has files in it) is kept and noted as a diagnostic.

use crate::report::Diagnostic;
use std::fs;
use std::path::Path;

/// Removes every empty directory below `dir`, deepest first.
///
/// `dir` itself is not removed.
pub fn prune_empty(dir: &Path, diagnostics: &mut Vec<Diagnostic>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            diagnostics.push(Diagnostic::DirectoryKept {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            let path = entry.path();
            prune_empty(&path, diagnostics);
            try_remove(&path, diagnostics);
        }
    }
}

/// Prunes each top-level subdirectory of `root`, then tries to remove it.
///
/// Category folders are visited too, so empty folders left over inside
/// unpacked archives disappear as well. `root` itself is never removed.
pub fn clean_root(root: &Path, diagnostics: &mut Vec<Diagnostic>) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            diagnostics.push(Diagnostic::DirectoryKept {
                path: root.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            let folder = entry.path();
            prune_empty(&folder, diagnostics);
            try_remove(&folder, diagnostics);
        }
    }
}

fn try_remove(dir: &Path, diagnostics: &mut Vec<Diagnostic>) {
    match fs::remove_dir(dir) {
        Ok(()) => tracing::debug!("Removed empty folder {}", dir.display()),
        Err(e) => {
            tracing::debug!("Keeping {}: {}", dir.display(), e);
            diagnostics.push(Diagnostic::DirectoryKept {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
        }
    }
}

//! Command-line interface module for clean-folder.
//!
//! This module handles:
//! - Argument parsing
//! - Run orchestration (scan, move, unpack, prune)
//! - Dry-run planning
//! - Printing the run summary

use crate::cleaner;
use crate::config::{CollisionPolicy, RunConfig};
use crate::file_category::Category;
use crate::file_organizer::{ArchiveOutcome, FileOrganizer, OrganizeResult};
use crate::output::OutputFormatter;
use crate::report::{Diagnostic, RunReport};
use crate::scanner;
use clap::Parser;
use indicatif::ProgressBar;
use std::path::PathBuf;

/// Sort a folder into IMAGES, DOCUMENTS, AUDIO, VIDEO, ARCHIVE and OTHERS.
#[derive(Debug, Parser)]
#[command(name = "clean-folder", version, about)]
pub struct Cli {
    /// Folder to organize
    pub root: PathBuf,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Replace files that already exist at the destination instead of failing
    #[arg(long)]
    pub overwrite: bool,

    /// Write a JSON report of the run to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Log every move and skipped folder
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the run configuration from the parsed arguments.
    pub fn into_config(self) -> RunConfig {
        let collision = if self.overwrite {
            CollisionPolicy::Overwrite
        } else {
            CollisionPolicy::Fail
        };

        RunConfig::new(self.root)
            .with_dry_run(self.dry_run)
            .with_collision(collision)
            .with_report_path(self.report)
    }
}

/// Organizes the folder described by `config` and returns what happened.
///
/// The whole tree is scanned before anything moves. Files are then handled
/// one category at a time (images, audio, video, documents, others and
/// archives last), each in the order the scan found them. Finally, folders
/// left empty are removed. A dry run stops after planning.
///
/// The first hard failure aborts the run; files already moved stay moved.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::cli::organize;
/// use clean_folder::config::RunConfig;
///
/// let report = organize(&RunConfig::new("/path/to/downloads"), None)?;
/// println!("Moved {} files", report.operations.len());
/// # Ok::<(), clean_folder::file_organizer::OrganizeError>(())
/// ```
pub fn organize(config: &RunConfig, progress: Option<&ProgressBar>) -> OrganizeResult<RunReport> {
    config.validate()?;

    let scan_result = scanner::scan(&config.root)?;
    let organizer = FileOrganizer::new(&config.root, config.collision)?;

    let mut report = RunReport::new(config.root.clone(), config.dry_run);
    report.known_extensions = scan_result.known_extensions.clone();
    report.unknown_extensions = scan_result.unknown_extensions.clone();
    report.diagnostics.extend(
        scan_result
            .skipped_dirs
            .iter()
            .map(|path| Diagnostic::SkippedReservedDir { path: path.clone() }),
    );

    if let Some(pb) = progress {
        pb.set_length(scan_result.total_files() as u64);
    }

    for category in Category::ALL {
        let files = scan_result.files(category);
        if files.is_empty() {
            continue;
        }
        report.category_counts.insert(category, files.len());

        for path in files {
            if let Some(pb) = progress {
                pb.set_message(category.description());
            }

            let operation = match (config.dry_run, category) {
                (true, Category::Archive) => Some(organizer.plan_archive(path, category)?),
                (true, _) => Some(organizer.plan_file(path, category)?),
                (false, Category::Archive) => {
                    match organizer.handle_archive(path, category, &mut report.diagnostics)? {
                        ArchiveOutcome::Extracted(op) | ArchiveOutcome::Unreadable(op) => Some(op),
                        ArchiveOutcome::Vanished => None,
                    }
                }
                (false, _) => Some(organizer.handle_file(path, category)?),
            };
            report.operations.extend(operation);

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
    }

    if !config.dry_run {
        cleaner::clean_root(&config.root, &mut report.diagnostics);
    }

    if let Some(report_path) = &config.report_path {
        report.save(report_path)?;
    }

    Ok(report)
}

/// Runs the organizer and prints progress and a summary.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::cli::run_cli;
/// use clean_folder::config::RunConfig;
///
/// if let Err(e) = run_cli(&RunConfig::new("/path/to/downloads")) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(config: &RunConfig) -> OrganizeResult<RunReport> {
    if config.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            config.root.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", config.root.display()));
    }

    let pb = OutputFormatter::create_progress_bar(0);
    let result = organize(config, Some(&pb));
    pb.finish_and_clear();
    let report = result?;

    if report.total_files() == 0 {
        OutputFormatter::plain("No files found to organize.");
        return Ok(report);
    }

    if report.dry_run {
        OutputFormatter::header("Files would be organized as follows:");
        for op in &report.operations {
            OutputFormatter::plain(&format!(
                " - {}\n   → {}",
                op.original_path.display(),
                op.new_path.display()
            ));
        }
    }

    OutputFormatter::summary_table(&report.category_counts, report.total_files());
    OutputFormatter::extension_list("Known extensions", &report.known_extensions);
    OutputFormatter::extension_list("Unknown extensions", &report.unknown_extensions);

    print_diagnostics(&report);

    if report.dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    } else {
        OutputFormatter::success(&format!(
            "Organized {} of {} files.",
            report.operations.len(),
            report.total_files()
        ));
    }

    if let Some(report_path) = &config.report_path {
        OutputFormatter::plain(&format!("Report saved to {}", report_path.display()));
    }

    Ok(report)
}

fn print_diagnostics(report: &RunReport) {
    for diagnostic in &report.diagnostics {
        match diagnostic {
            Diagnostic::ArchiveUnreadable { .. } | Diagnostic::ArchiveVanished { .. } => {
                OutputFormatter::warning(&diagnostic.to_string());
            }
            Diagnostic::SkippedReservedDir { .. } => {
                OutputFormatter::plain(&diagnostic.to_string());
            }
            // Non-empty folders are expected; only the count is printed
            Diagnostic::DirectoryKept { .. } => {}
        }
    }

    if let Some(line) = unpacked_archives_line(report) {
        OutputFormatter::warning(&line);
    }
    if let Some(line) = kept_folders_line(report) {
        OutputFormatter::plain(&line);
    }
}

fn unpacked_archives_line(report: &RunReport) -> Option<String> {
    match report.unreadable_archives().count() {
        0 => None,
        count => Some(format!("{} archive(s) left unpacked in their ARCHIVE folder", count)),
    }
}

fn kept_folders_line(report: &RunReport) -> Option<String> {
    let count = report
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::DirectoryKept { .. }))
        .count();
    (count > 0).then(|| format!("Kept {} non-empty folder(s).", count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_positional_root() {
        let cli = Cli::try_parse_from(["clean-folder", "/tmp/mess"]).expect("Failed to parse");
        let config = cli.into_config();

        assert_eq!(config.root, PathBuf::from("/tmp/mess"));
        assert!(!config.dry_run);
        assert_eq!(config.collision, CollisionPolicy::Fail);
        assert!(config.report_path.is_none());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "clean-folder",
            "/tmp/mess",
            "--dry-run",
            "--overwrite",
            "--report",
            "out.json",
            "-v",
        ])
        .expect("Failed to parse");
        assert!(cli.verbose);

        let config = cli.into_config();
        assert!(config.dry_run);
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
        assert_eq!(config.report_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_cli_requires_root() {
        assert!(Cli::try_parse_from(["clean-folder"]).is_err());
    }

    #[test]
    fn test_organize_counts_categories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.png"), "x").expect("Failed to write test file");
        fs::write(temp_dir.path().join("b.png"), "x").expect("Failed to write test file");
        fs::write(temp_dir.path().join("c.xyz"), "x").expect("Failed to write test file");

        let report =
            organize(&RunConfig::new(temp_dir.path()), None).expect("Failed to organize");

        assert_eq!(report.category_counts.get(&Category::Image), Some(&2));
        assert_eq!(report.category_counts.get(&Category::Other), Some(&1));
        assert_eq!(report.operations.len(), 3);
        assert!(report.unknown_extensions.contains("XYZ"));
    }

    #[test]
    fn test_organize_progress_bar_tracks_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.mp4"), "x").expect("Failed to write test file");
        fs::write(temp_dir.path().join("b.ogg"), "x").expect("Failed to write test file");

        let pb = ProgressBar::hidden();
        organize(&RunConfig::new(temp_dir.path()), Some(&pb)).expect("Failed to organize");

        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(2));
    }

    #[test]
    fn test_footer_lines_report_kept_folders_and_unpacked_archives() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("keep")).expect("Failed to create dir");
        fs::write(temp_dir.path().join("keep/notes.txt"), "x").expect("Failed to write test file");
        fs::write(temp_dir.path().join("broken.zip"), "not a zip").expect("Failed to write test file");

        let report =
            organize(&RunConfig::new(temp_dir.path()), None).expect("Failed to organize");

        assert_eq!(
            unpacked_archives_line(&report).as_deref(),
            Some("1 archive(s) left unpacked in their ARCHIVE folder")
        );
        // Both category folders hold files, so the root's subfolders are kept
        let kept = kept_folders_line(&report).expect("Expected a kept-folders line");
        assert!(kept.starts_with("Kept "));
    }

    #[test]
    fn test_footer_lines_absent_for_clean_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = RunReport::new(temp_dir.path().to_path_buf(), false);

        assert!(unpacked_archives_line(&report).is_none());
        assert!(kept_folders_line(&report).is_none());
    }
}

//! Output formatting and styling module.
//!
//! All user-facing output goes through [`OutputFormatter`] so colors and
//! layout stay consistent. Internal details are logged with `tracing`.

use crate::file_category::Category;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet};

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// OutputFormatter::success("Folder organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for the move phase.
    ///
    /// The bar draws to stderr and stays hidden when stderr is not a
    /// terminal.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a table of file counts per category.
    ///
    /// Categories with no files are left out.
    pub fn summary_table(category_counts: &BTreeMap<Category, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let rows: Vec<_> = category_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .collect();

        let width = rows
            .iter()
            .map(|(category, _)| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural(**count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }

    /// Prints a labelled, comma-separated list of extensions.
    pub fn extension_list(label: &str, extensions: &BTreeSet<String>) {
        if extensions.is_empty() {
            return;
        }
        let joined = extensions.iter().cloned().collect::<Vec<_>>().join(", ");
        println!("{}: {}", label.bold(), joined);
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

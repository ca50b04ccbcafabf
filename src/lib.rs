//! clean-folder - sort a messy directory tree into category folders
//!
//! This library scans a folder recursively, classifies files by extension,
//! moves them into `IMAGES`, `DOCUMENTS`, `AUDIO`, `VIDEO`, `ARCHIVE` and
//! `OTHERS` folders under ASCII-safe transliterated names, unpacks archives
//! into folders of their own and finally prunes directories left empty.

pub mod archive;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod report;
pub mod scanner;
pub mod transliterate;

pub use config::{CollisionPolicy, ConfigError, RunConfig};
pub use file_category::{Category, Classification};
pub use file_organizer::{ArchiveOutcome, FileOrganizer, Operation, OrganizeError};
pub use report::{Diagnostic, RunReport};
pub use scanner::{ScanResult, scan};
pub use transliterate::normalize;

pub use cli::{organize, run_cli};

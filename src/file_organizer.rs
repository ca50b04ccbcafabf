/// Moving scanned files into their category folders.
///
/// Regular files are moved under their normalized name. Archives get a
/// folder of their own inside the archive category and are unpacked there.
use crate::archive::{self, ExtractError};
use crate::config::{CollisionPolicy, ConfigError};
use crate::file_category::Category;
use crate::report::Diagnostic;
use crate::transliterate::{archive_dir_name, normalize};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Represents a single move performed (or planned) during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// The path of the file when it was scanned.
    pub original_path: PathBuf,
    /// Where the file ended up. For an unpacked archive this is the folder
    /// holding its contents.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: Category,
}

/// What happened to an archive handed to [`FileOrganizer::handle_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Contents were unpacked and the archive file deleted.
    Extracted(Operation),
    /// The archive was moved into its folder but could not be unpacked.
    Unreadable(Operation),
    /// The archive disappeared before it could be handled.
    Vanished,
}

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The run configuration was rejected.
    Config(ConfigError),
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A directory could not be read while scanning.
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// A file with the same name already exists at the destination.
    DestinationExists { source: PathBuf, destination: PathBuf },
    /// An unpacked archive could not be deleted.
    ArchiveCleanupFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the run report.
    ReportWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{}", e),
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationExists {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot move {}: {} already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::ArchiveCleanupFailed { path, source } => {
                write!(
                    f,
                    "Failed to remove unpacked archive {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReportWriteFailed { path, source } => {
                write!(f, "Failed to write report {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

impl From<ConfigError> for OrganizeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category folders directly under a root directory.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    root: PathBuf,
    collision: CollisionPolicy,
}

impl FileOrganizer {
    /// Creates an organizer for `root`.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidBasePath` if the root does not exist.
    pub fn new(root: &Path, collision: CollisionPolicy) -> OrganizeResult<Self> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: root.to_path_buf(),
                source: std::io::Error::new(ErrorKind::NotFound, "base path does not exist"),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            collision,
        })
    }

    /// Path of the output folder for `category`.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Moves a file into its category folder under its normalized name.
    ///
    /// The category folder is created if needed. Whether an existing file at
    /// the destination is an error depends on the collision policy.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clean_folder::config::CollisionPolicy;
    /// use clean_folder::file_category::Category;
    /// use clean_folder::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new(Path::new("/path/to/root"), CollisionPolicy::Fail)?;
    /// let op = organizer.handle_file(Path::new("/path/to/root/фото.jpg"), Category::Image)?;
    /// assert!(op.new_path.ends_with("IMAGES/foto.jpg"));
    /// # Ok::<(), clean_folder::file_organizer::OrganizeError>(())
    /// ```
    pub fn handle_file(&self, path: &Path, category: Category) -> OrganizeResult<Operation> {
        let category_dir = self.ensure_dir(&self.category_dir(category))?;
        let destination = category_dir.join(normalize(&file_name_of(path)?));

        self.check_destination(path, &destination)?;
        fs::rename(path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
            source: path.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;

        tracing::debug!("Moved {} -> {}", path.display(), destination.display());

        Ok(Operation {
            original_path: path.to_path_buf(),
            new_path: destination,
            category,
        })
    }

    /// Moves an archive into a folder of its own and unpacks it there.
    ///
    /// The folder is named after the archive with its archive suffixes
    /// removed and the rest normalized. The archive keeps its original name
    /// inside that folder, byte for byte. A damaged or unsupported archive stays there
    /// unpacked; an archive that vanished has its folder removed again.
    /// Both cases are recorded in `diagnostics` and are not errors.
    pub fn handle_archive(
        &self,
        path: &Path,
        category: Category,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> OrganizeResult<ArchiveOutcome> {
        let raw_name = raw_file_name_of(path)?;
        let category_dir = self.ensure_dir(&self.category_dir(category))?;
        let archive_dir = category_dir.join(archive_dir_name(&raw_name.to_string_lossy()));

        // Two archives sharing a folder would overwrite each other's contents
        self.check_destination(path, &archive_dir)?;
        let archive_dir = self.ensure_dir(&archive_dir)?;
        let destination = archive_dir.join(raw_name);

        self.check_destination(path, &destination)?;
        if let Err(e) = fs::rename(path, &destination) {
            if e.kind() == ErrorKind::NotFound {
                return Ok(self.vanished(path, &archive_dir, diagnostics));
            }
            return Err(OrganizeError::FileMoveFailure {
                source: path.to_path_buf(),
                destination,
                source_error: e,
            });
        }

        match archive::extract(&destination, &archive_dir) {
            Ok(()) => {
                fs::remove_file(&destination).map_err(|e| {
                    OrganizeError::ArchiveCleanupFailed {
                        path: destination.clone(),
                        source: e,
                    }
                })?;
                tracing::debug!("Unpacked {} into {}", path.display(), archive_dir.display());

                Ok(ArchiveOutcome::Extracted(Operation {
                    original_path: path.to_path_buf(),
                    new_path: archive_dir,
                    category,
                }))
            }
            Err(ExtractError::NotFound(_)) => Ok(self.vanished(path, &archive_dir, diagnostics)),
            Err(e) => {
                tracing::debug!("Leaving archive in place: {}", e);
                diagnostics.push(Diagnostic::ArchiveUnreadable {
                    path: destination.clone(),
                    reason: e.to_string(),
                });

                Ok(ArchiveOutcome::Unreadable(Operation {
                    original_path: path.to_path_buf(),
                    new_path: destination,
                    category,
                }))
            }
        }
    }

    /// Computes where a regular file would go without touching the disk.
    pub fn plan_file(&self, path: &Path, category: Category) -> OrganizeResult<Operation> {
        Ok(Operation {
            original_path: path.to_path_buf(),
            new_path: self
                .category_dir(category)
                .join(normalize(&file_name_of(path)?)),
            category,
        })
    }

    /// Computes the folder an archive would be unpacked into.
    pub fn plan_archive(&self, path: &Path, category: Category) -> OrganizeResult<Operation> {
        Ok(Operation {
            original_path: path.to_path_buf(),
            new_path: self
                .category_dir(category)
                .join(archive_dir_name(&file_name_of(path)?)),
            category,
        })
    }

    fn vanished(
        &self,
        path: &Path,
        archive_dir: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ArchiveOutcome {
        tracing::debug!("Archive vanished before unpacking: {}", path.display());
        diagnostics.push(Diagnostic::ArchiveVanished {
            path: path.to_path_buf(),
        });
        if let Err(e) = fs::remove_dir(archive_dir) {
            diagnostics.push(Diagnostic::DirectoryKept {
                path: archive_dir.to_path_buf(),
                reason: e.to_string(),
            });
        }
        ArchiveOutcome::Vanished
    }

    fn ensure_dir(&self, dir: &Path) -> OrganizeResult<PathBuf> {
        match fs::create_dir(dir) {
            Ok(()) => Ok(dir.to_path_buf()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => {
                Ok(dir.to_path_buf())
            }
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }

    fn check_destination(&self, source: &Path, destination: &Path) -> OrganizeResult<()> {
        if self.collision == CollisionPolicy::Fail
            && destination.symlink_metadata().is_ok()
            && source != destination
        {
            return Err(OrganizeError::DestinationExists {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn file_name_of(path: &Path) -> OrganizeResult<String> {
    raw_file_name_of(path).map(|name| name.to_string_lossy().into_owned())
}

fn raw_file_name_of(path: &Path) -> OrganizeResult<&OsStr> {
    path.file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            source: path.to_path_buf(),
            destination: PathBuf::new(),
            source_error: std::io::Error::new(
                ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn organizer(temp_dir: &TempDir) -> FileOrganizer {
        FileOrganizer::new(temp_dir.path(), CollisionPolicy::Fail)
            .expect("Failed to create organizer")
    }

    fn write_zip(path: &Path, name: &str, content: &str) {
        let file = File::create(path).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
        writer.finish().expect("Failed to finish zip");
    }

    #[test]
    fn test_handle_file_creates_directory_and_normalizes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("Світлина 1.jpg");
        fs::write(&file_path, "img").expect("Failed to write test file");

        let op = organizer(&temp_dir)
            .handle_file(&file_path, Category::Image)
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(op.new_path, temp_dir.path().join("IMAGES").join("Svitlyna_1.jpg"));
        assert!(op.new_path.exists());
        assert_eq!(op.category, Category::Image);
    }

    #[test]
    fn test_handle_file_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("DOCUMENTS")).expect("Failed to create dir");
        let file_path = temp_dir.path().join("notes.txt");
        fs::write(&file_path, "text").expect("Failed to write test file");

        organizer(&temp_dir)
            .handle_file(&file_path, Category::Document)
            .expect("Failed to move file");

        assert!(temp_dir.path().join("DOCUMENTS/notes.txt").exists());
    }

    #[test]
    fn test_collision_fails_by_default() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let docs = temp_dir.path().join("DOCUMENTS");
        fs::create_dir(&docs).expect("Failed to create dir");
        fs::write(docs.join("a.txt"), "old").expect("Failed to write test file");
        let file_path = temp_dir.path().join("a.txt");
        fs::write(&file_path, "new").expect("Failed to write test file");

        let result = organizer(&temp_dir).handle_file(&file_path, Category::Document);

        assert!(matches!(result, Err(OrganizeError::DestinationExists { .. })));
        assert!(file_path.exists());
        assert_eq!(fs::read_to_string(docs.join("a.txt")).unwrap(), "old");
    }

    #[test]
    fn test_collision_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let docs = temp_dir.path().join("DOCUMENTS");
        fs::create_dir(&docs).expect("Failed to create dir");
        fs::write(docs.join("a.txt"), "old").expect("Failed to write test file");
        let file_path = temp_dir.path().join("a.txt");
        fs::write(&file_path, "new").expect("Failed to write test file");

        FileOrganizer::new(temp_dir.path(), CollisionPolicy::Overwrite)
            .expect("Failed to create organizer")
            .handle_file(&file_path, Category::Document)
            .expect("Overwrite should succeed");

        assert_eq!(fs::read_to_string(docs.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_handle_archive_extracts_and_removes_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive_path = temp_dir.path().join("a.zip");
        write_zip(&archive_path, "x.txt", "hello");

        let mut diagnostics = Vec::new();
        let outcome = organizer(&temp_dir)
            .handle_archive(&archive_path, Category::Archive, &mut diagnostics)
            .expect("Failed to handle archive");

        let archive_dir = temp_dir.path().join("ARCHIVE").join("a");
        assert!(matches!(outcome, ArchiveOutcome::Extracted(ref op) if op.new_path == archive_dir));
        assert!(archive_dir.join("x.txt").exists());
        assert!(!archive_dir.join("a.zip").exists());
        assert!(!archive_path.exists());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_handle_archive_keeps_corrupt_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive_path = temp_dir.path().join("a.zip");
        fs::write(&archive_path, b"corrupt bytes").expect("Failed to write test file");

        let mut diagnostics = Vec::new();
        let outcome = organizer(&temp_dir)
            .handle_archive(&archive_path, Category::Archive, &mut diagnostics)
            .expect("Corrupt archive should not be an error");

        assert!(matches!(outcome, ArchiveOutcome::Unreadable(_)));
        assert!(temp_dir.path().join("ARCHIVE/a/a.zip").exists());
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::ArchiveUnreadable { .. }]
        ));
    }

    #[test]
    fn test_handle_archive_vanished_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive_path = temp_dir.path().join("gone.zip");

        let mut diagnostics = Vec::new();
        let outcome = organizer(&temp_dir)
            .handle_archive(&archive_path, Category::Archive, &mut diagnostics)
            .expect("Vanished archive should not be an error");

        assert_eq!(outcome, ArchiveOutcome::Vanished);
        assert!(!temp_dir.path().join("ARCHIVE/gone").exists());
        assert!(temp_dir.path().join("ARCHIVE").is_dir());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::ArchiveVanished {
                path: archive_path.clone()
            }]
        );
    }

    #[test]
    fn test_plan_does_not_touch_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("пісня.mp3");
        fs::write(&file_path, "mp3").expect("Failed to write test file");

        let org = organizer(&temp_dir);
        let op = org
            .plan_file(&file_path, Category::Audio)
            .expect("Failed to plan");
        let archive_op = org
            .plan_archive(&temp_dir.path().join("b.tar.gz"), Category::Archive)
            .expect("Failed to plan");

        assert_eq!(op.new_path, temp_dir.path().join("AUDIO/pisnja.mp3"));
        assert_eq!(archive_op.new_path, temp_dir.path().join("ARCHIVE/b"));
        assert!(file_path.exists());
        assert!(!temp_dir.path().join("AUDIO").exists());
    }

    #[test]
    fn test_invalid_base_path() {
        let result = FileOrganizer::new(Path::new("/non/existent/path"), CollisionPolicy::Fail);
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_archive_folder_collision_fails_by_default() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let existing = temp_dir.path().join("ARCHIVE").join("a");
        fs::create_dir_all(&existing).expect("Failed to create dir");
        fs::write(existing.join("x.txt"), "first").expect("Failed to write test file");
        let archive_path = temp_dir.path().join("a.zip");
        write_zip(&archive_path, "x.txt", "second");

        let mut diagnostics = Vec::new();
        let result =
            organizer(&temp_dir).handle_archive(&archive_path, Category::Archive, &mut diagnostics);

        assert!(matches!(
            result,
            Err(OrganizeError::DestinationExists { ref destination, .. }) if destination == &existing
        ));
        assert!(archive_path.exists());
        assert_eq!(fs::read_to_string(existing.join("x.txt")).unwrap(), "first");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_archive_keeps_raw_file_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // "пол" in cp1251, not valid UTF-8
        let raw_name = OsStr::from_bytes(b"\xef\xee\xeb.zip");
        let archive_path = temp_dir.path().join(raw_name);
        fs::write(&archive_path, b"corrupt bytes").expect("Failed to write test file");

        let mut diagnostics = Vec::new();
        let outcome = organizer(&temp_dir)
            .handle_archive(&archive_path, Category::Archive, &mut diagnostics)
            .expect("Corrupt archive should not be an error");

        let kept = temp_dir.path().join("ARCHIVE").join("___").join(raw_name);
        assert!(matches!(outcome, ArchiveOutcome::Unreadable(ref op) if op.new_path == kept));
        assert!(kept.exists());
    }
}

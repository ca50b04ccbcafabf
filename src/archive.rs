//! Archive unpacking.
//!
//! The format is chosen from the file name, the way a user would guess it:
//! `.zip`, `.tar`, `.tar.gz` / `.tgz`, and single-file `.gz`.

use flate2::read::GzDecoder;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Archive formats that can be unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    /// A single gzip-compressed file.
    Gzip,
}

impl ArchiveFormat {
    /// Detects the format from the file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::archive::ArchiveFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(ArchiveFormat::detect(Path::new("a.ZIP")), Some(ArchiveFormat::Zip));
    /// assert_eq!(ArchiveFormat::detect(Path::new("a.tar.gz")), Some(ArchiveFormat::TarGz));
    /// assert_eq!(ArchiveFormat::detect(Path::new("a.rar")), None);
    /// ```
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();

        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else if name.ends_with(".gz") {
            Some(Self::Gzip)
        } else {
            None
        }
    }
}

/// Errors that can occur while unpacking an archive.
#[derive(Debug)]
pub enum ExtractError {
    /// The file name does not map to a known archive format.
    Unsupported(PathBuf),
    /// The archive could not be read.
    Corrupt { path: PathBuf, reason: String },
    /// The archive file does not exist.
    NotFound(PathBuf),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(path) => {
                write!(f, "Unknown archive format: {}", path.display())
            }
            Self::Corrupt { path, reason } => {
                write!(f, "Unreadable archive {}: {}", path.display(), reason)
            }
            Self::NotFound(path) => write!(f, "Archive not found: {}", path.display()),
        }
    }
}

impl std::error::Error for ExtractError {}

impl ExtractError {
    fn corrupt(path: &Path, reason: impl fmt::Display) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Unpacks the archive at `archive_path` into `destination`.
///
/// `destination` must already exist. Partially written contents are left in
/// place when the archive turns out to be damaged halfway through.
pub fn extract(archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let format = ArchiveFormat::detect(archive_path)
        .ok_or_else(|| ExtractError::Unsupported(archive_path.to_path_buf()))?;

    let file = File::open(archive_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExtractError::NotFound(archive_path.to_path_buf()),
        _ => ExtractError::corrupt(archive_path, e),
    })?;

    tracing::debug!(
        "Unpacking {} as {:?} into {}",
        archive_path.display(),
        format,
        destination.display()
    );

    match format {
        ArchiveFormat::Zip => extract_zip(file, archive_path, destination),
        ArchiveFormat::Tar => Archive::new(file)
            .unpack(destination)
            .map_err(|e| ExtractError::corrupt(archive_path, e)),
        ArchiveFormat::TarGz => Archive::new(GzDecoder::new(file))
            .unpack(destination)
            .map_err(|e| ExtractError::corrupt(archive_path, e)),
        ArchiveFormat::Gzip => extract_gzip(file, archive_path, destination),
    }
}

fn extract_zip(file: File, archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let mut archive =
        ZipArchive::new(file).map_err(|e| ExtractError::corrupt(archive_path, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::corrupt(archive_path, e))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            ExtractError::corrupt(
                archive_path,
                format!("entry escapes the target folder: {}", entry.name()),
            )
        })?;
        let outpath = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| ExtractError::corrupt(archive_path, e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::corrupt(archive_path, e))?;
        }
        let mut outfile =
            File::create(&outpath).map_err(|e| ExtractError::corrupt(archive_path, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| ExtractError::corrupt(archive_path, e))?;
    }

    Ok(())
}

fn extract_gzip(file: File, archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    // `notes.txt.gz` unpacks to `notes.txt`
    let output_name = archive_path
        .file_stem()
        .ok_or_else(|| ExtractError::corrupt(archive_path, "file has no name component"))?;
    let outpath = destination.join(output_name);

    let mut decoder = GzDecoder::new(file);
    let mut outfile =
        File::create(&outpath).map_err(|e| ExtractError::corrupt(archive_path, e))?;
    if let Err(e) = io::copy(&mut decoder, &mut outfile) {
        drop(outfile);
        let _ = fs::remove_file(&outpath);
        return Err(ExtractError::corrupt(archive_path, e));
    }

    Ok(())
}

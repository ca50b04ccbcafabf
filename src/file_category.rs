/// File categorization by extension.
///
/// This module maps an uppercased file extension to one of the fixed output
/// categories. The table is compiled in and never changes during a run.
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::{Category, Classification, classify};
///
/// assert_eq!(classify("JPEG"), Classification::Known(Category::Image));
/// assert_eq!(classify("XYZ"), Classification::Unknown);
/// assert_eq!(classify(""), Classification::Missing);
/// ```
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Represents an output category.
///
/// Every scanned file lands in exactly one category; anything the table
/// does not know about goes to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// Image files (JPEG, PNG, SVG)
    Image,
    /// Document files (PDF, DOCX, TXT, etc.)
    Document,
    /// Audio files (MP3, OGG, WAV, AMR)
    Audio,
    /// Video files (MP4, AVI, MKV, MOV)
    Video,
    /// Archive files (ZIP, TAR, GZ)
    Archive,
    /// Unknown or extensionless files
    Other,
}

impl Category {
    /// Categories in the order the dispatcher processes them.
    ///
    /// Archives come last so that extracted contents never get picked up by
    /// an earlier pass.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Audio,
        Category::Video,
        Category::Document,
        Category::Other,
        Category::Archive,
    ];

    /// Returns the output directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "IMAGES");
    /// assert_eq!(Category::Archive.dir_name(), "ARCHIVE");
    /// assert_eq!(Category::Other.dir_name(), "OTHERS");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "IMAGES",
            Category::Document => "DOCUMENTS",
            Category::Audio => "AUDIO",
            Category::Video => "VIDEO",
            Category::Archive => "ARCHIVE",
            Category::Other => "OTHERS",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Images",
            Category::Document => "Documents",
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Archive => "Archives",
            Category::Other => "Others",
        }
    }

    /// Returns true if `name` is exactly one of the output directory names.
    ///
    /// The match is on the bare folder name and is case-sensitive, so a
    /// folder called `IMAGES` anywhere in the tree counts as reserved.
    pub fn is_reserved_dir_name(name: &str) -> bool {
        Self::ALL.iter().any(|c| c.dir_name() == name)
    }
}

/// Result of looking up an extension in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The extension is in the table.
    Known(Category),
    /// A non-empty extension the table does not contain.
    Unknown,
    /// The file has no extension at all.
    Missing,
}

impl Classification {
    /// The category a file with this classification is routed to.
    pub fn category(&self) -> Category {
        match self {
            Classification::Known(category) => *category,
            Classification::Unknown | Classification::Missing => Category::Other,
        }
    }
}

static EXTENSION_TABLE: LazyLock<HashMap<&'static str, Category>> = LazyLock::new(|| {
    let mut table = HashMap::new();

    for ext in ["JPEG", "PNG", "JPG", "SVG"] {
        table.insert(ext, Category::Image);
    }
    for ext in ["DOC", "PDF", "TXT", "DOCX", "PPTX", "XLSX"] {
        table.insert(ext, Category::Document);
    }
    for ext in ["ZIP", "GZ", "TAR"] {
        table.insert(ext, Category::Archive);
    }
    for ext in ["OGG", "WAV", "AMR", "MP3"] {
        table.insert(ext, Category::Audio);
    }
    for ext in ["MP4", "AVI", "MKV", "MOV"] {
        table.insert(ext, Category::Video);
    }

    table
});

/// Returns the last suffix of a file name, uppercased, without the dot.
///
/// Returns an empty string when the name has no extension. Leading-dot
/// names such as `.bashrc` have no extension.
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("photo.jpeg")), "JPEG");
/// assert_eq!(extension_of(Path::new("backup.tar.gz")), "GZ");
/// assert_eq!(extension_of(Path::new("Makefile")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Looks up an uppercased extension in the fixed table.
pub fn classify(ext: &str) -> Classification {
    if ext.is_empty() {
        return Classification::Missing;
    }

    match EXTENSION_TABLE.get(ext) {
        Some(category) => Classification::Known(*category),
        None => Classification::Unknown,
    }
}

//! Entity records returned by the repository ports.
//!
//! These are the storage-side shapes the scraper engine reads: the scene or
//! gallery being re-scraped, and the performer/studio/tag/movie records the
//! auto-tag scraper matches against. They are plain data; loading and
//! persistence belong to the storage backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single file belonging to a scene or gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: i64,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl MediaFile {
    /// File name without its extension, if the path has one.
    pub fn basename(&self) -> Option<String> {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
    }
}

/// A scene record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: i64,
    pub title: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub date: Option<String>,
    pub urls: Vec<String>,
    pub files: Vec<MediaFile>,
}

impl Scene {
    /// Title if set, otherwise the basename of the first file.
    pub fn display_name(&self) -> Option<String> {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.files.first().and_then(MediaFile::basename))
    }
}

/// A gallery record. Galleries are either file-based (zip or loose images
/// tracked as [`MediaFile`]s) or folder-based.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    pub id: i64,
    pub title: Option<String>,
    pub details: Option<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub date: Option<String>,
    pub urls: Vec<String>,
    /// Set for folder-based galleries.
    pub folder_path: Option<PathBuf>,
    pub files: Vec<MediaFile>,
}

/// A performer record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: i64,
    pub name: String,
    pub aliases: Vec<String>,
}

/// A studio record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Studio {
    pub id: i64,
    pub name: String,
    pub aliases: Vec<String>,
}

/// A tag record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub aliases: Vec<String>,
}

/// A movie record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
}

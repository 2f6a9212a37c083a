//! Storage source abstraction and the filesystem-backed implementation

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::IndexUnavailable;

/// One raw row from a storage source, before validation.
///
/// Every column is optional: sources surface unreadable columns as `None`
/// for the affected row instead of failing the whole query.
#[derive(Debug, Clone, Default)]
pub struct MediaRow {
    /// Full path to the media entry
    pub path: Option<PathBuf>,
    /// Insertion timestamp (Unix seconds)
    pub inserted_at: Option<i64>,
    /// Album/bucket display name
    pub bucket: Option<String>,
    /// Playback duration in milliseconds
    pub duration_ms: Option<u64>,
    /// Raw content-type string
    pub content_type: Option<String>,
}

/// Which record kinds a source query should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFilter {
    /// Include image records (animated images are image records with a gif content type)
    pub images: bool,
    /// Include video records
    pub videos: bool,
}

impl SourceFilter {
    /// Whether a content-type string passes this filter
    pub fn accepts(&self, content_type: &str) -> bool {
        let ct = content_type.to_lowercase();
        (self.images && ct.starts_with("image/")) || (self.videos && ct.starts_with("video/"))
    }
}

/// A queryable media storage source.
///
/// Contract: rows are ordered by `inserted_at` descending; a row with
/// unreadable columns is returned with those fields as `None` (or skipped),
/// never turned into a query failure. Only a source that cannot be queried
/// at all returns `IndexUnavailable`.
pub trait MediaSource {
    /// Query all rows matching the filter, newest first
    fn query_rows(&self, filter: &SourceFilter) -> Result<Vec<MediaRow>, IndexUnavailable>;
}

/// Filesystem-backed source: synthesizes rows from a directory tree.
///
/// Content type is guessed from the file extension, the bucket is the
/// parent directory name, and the insertion time is the file's modification
/// time. Files without a recognized media extension are omitted. Durations
/// are never available from this source.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source over the given directory tree
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a file extension to a content-type string
    fn content_type_for(ext: &str) -> Option<&'static str> {
        match ext {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "bmp" => Some("image/bmp"),
            "tiff" | "tif" => Some("image/tiff"),
            "mp4" => Some("video/mp4"),
            "m4v" => Some("video/x-m4v"),
            "mkv" => Some("video/x-matroska"),
            "webm" => Some("video/webm"),
            "mov" => Some("video/quicktime"),
            "avi" => Some("video/x-msvideo"),
            _ => None,
        }
    }

    /// Build a row for one file, if it is recognizable media
    fn row_for(path: &Path, filter: &SourceFilter) -> Option<MediaRow> {
        let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();
        let content_type = Self::content_type_for(&ext)?;
        if !filter.accepts(content_type) {
            return None;
        }

        let bucket = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|s| s.to_string());

        let inserted_at = std::fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64);

        Some(MediaRow {
            path: Some(path.to_path_buf()),
            inserted_at,
            bucket,
            duration_ms: None,
            content_type: Some(content_type.to_string()),
        })
    }
}

impl MediaSource for DirectorySource {
    fn query_rows(&self, filter: &SourceFilter) -> Result<Vec<MediaRow>, IndexUnavailable> {
        if !self.root.exists() {
            return Err(IndexUnavailable::at_path(
                self.root.clone(),
                "scan root does not exist",
            ));
        }

        let mut rows = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable entries do not abort the query
                    log::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(row) = Self::row_for(entry.path(), filter) {
                rows.push(row);
            }
        }

        rows.sort_by(|a, b| b.inserted_at.cmp(&a.inserted_at));
        Ok(rows)
    }
}

//! Core data models for the media catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reserved group name aggregating every item of a view's kind
pub const ALL_GROUP: &str = "All";

/// Media kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// The combined view across all recognized kinds
    All,
    /// Still images (jpeg, png, webp, etc.)
    Image,
    /// Video files (mp4, webm, etc.)
    Video,
    /// Animated images (gif)
    #[serde(rename = "gif")]
    AnimatedImage,
    /// Unknown or unsupported content type
    Unrecognized,
}

impl MediaKind {
    /// Classify a raw content-type string.
    ///
    /// Substring matching only, case-insensitive; no MIME grammar parsing.
    /// Always returns a value.
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.to_lowercase();
        if ct.contains("video") {
            MediaKind::Video
        } else if ct.contains("image") {
            if ct.contains("gif") {
                MediaKind::AnimatedImage
            } else {
                MediaKind::Image
            }
        } else {
            MediaKind::Unrecognized
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::All => "all",
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::AnimatedImage => "gif",
            MediaKind::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw storage record as emitted by the scanner, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Full path to the media entry
    pub path: PathBuf,
    /// Album/bucket name the entry belongs to
    pub group: String,
    /// Raw content-type string from the source
    pub content_type: String,
    /// Playback duration in milliseconds (0 when the source has none)
    pub duration_ms: u64,
    /// Insertion timestamp (Unix seconds)
    pub inserted_at: i64,
}

/// A single classified catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Full path to the media entry; `None` marks a placeholder item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Formatted playback duration ("00:00" for still images)
    pub duration: String,
    /// Classified media kind
    pub kind: MediaKind,
    /// Album name the item belongs to
    pub group: String,
}

impl MediaItem {
    /// Create a new item
    pub fn new(path: PathBuf, duration: String, kind: MediaKind, group: String) -> Self {
        Self {
            path: Some(path),
            duration,
            kind,
            group,
        }
    }

    /// Create a placeholder item for a group with nothing to show
    pub fn placeholder(group: impl Into<String>) -> Self {
        Self {
            path: None,
            duration: "00:00".to_string(),
            kind: MediaKind::Unrecognized,
            group: group.into(),
        }
    }

    /// Whether this is a placeholder (no backing path)
    pub fn is_placeholder(&self) -> bool {
        self.path.is_none()
    }
}

/// Per-album summary, derived on demand from a view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Path of the group's first (newest) item; `None` for an empty group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Group name
    pub name: String,
    /// Number of items in the group
    pub count: usize,
}

impl GroupSummary {
    /// Summarize one group's item list
    pub fn from_items(name: &str, items: &[MediaItem]) -> Self {
        match items.first() {
            Some(first) => Self {
                path: first.path.clone(),
                name: name.to_string(),
                count: items.len(),
            },
            None => Self::placeholder(name),
        }
    }

    /// Summary for an empty group
    pub fn placeholder(name: &str) -> Self {
        Self {
            path: None,
            name: name.to_string(),
            count: 0,
        }
    }
}

/// Ordered mapping from group name to that group's items.
///
/// Keys iterate lexicographically; the reserved `"All"` group is always
/// present, even when empty. Items within a group keep the scanner's
/// emission order (insertion time descending) and are never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogView {
    groups: BTreeMap<String, Vec<MediaItem>>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    /// Create an empty view with the `"All"` group seeded
    pub fn new() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(ALL_GROUP.to_string(), Vec::new());
        Self { groups }
    }

    /// Append an item under its own group (created lazily) and under `"All"`
    pub fn append(&mut self, item: MediaItem) {
        self.groups
            .entry(item.group.clone())
            .or_default()
            .push(item.clone());
        self.groups
            .entry(ALL_GROUP.to_string())
            .or_default()
            .push(item);
    }

    /// Get a group's items, if the group exists
    pub fn items(&self, group: &str) -> Option<&[MediaItem]> {
        self.groups.get(group).map(|v| v.as_slice())
    }

    /// Iterate groups in lexicographic key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MediaItem])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// One summary per group, in key order
    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .map(|(name, items)| GroupSummary::from_items(name, items))
            .collect()
    }

    /// Number of groups (including `"All"`)
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of items in the `"All"` group
    pub fn total_items(&self) -> usize {
        self.groups.get(ALL_GROUP).map(|v| v.len()).unwrap_or(0)
    }
}

/// The four catalog views at one point in time, replaced as a unit.
///
/// Queries always run against exactly one snapshot; a reload builds a whole
/// new snapshot rather than mutating an installed one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Combined view across all kinds
    pub all: CatalogView,
    /// Still images
    pub image: CatalogView,
    /// Videos
    pub video: CatalogView,
    /// Animated images
    pub gif: CatalogView,
}

impl Snapshot {
    /// Create a snapshot of four empty, `"All"`-seeded views
    pub fn new() -> Self {
        Self {
            all: CatalogView::new(),
            image: CatalogView::new(),
            video: CatalogView::new(),
            gif: CatalogView::new(),
        }
    }

    /// The view for a kind; `Unrecognized` has no view of its own
    pub fn view(&self, kind: MediaKind) -> Option<&CatalogView> {
        match kind {
            MediaKind::All => Some(&self.all),
            MediaKind::Image => Some(&self.image),
            MediaKind::Video => Some(&self.video),
            MediaKind::AnimatedImage => Some(&self.gif),
            MediaKind::Unrecognized => None,
        }
    }
}

//! On-device media catalog engine
//!
//! This library scans a media storage source, classifies entries by kind,
//! groups them into albums, and answers read-only queries against an
//! atomically replaced point-in-time snapshot.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod duration;
pub mod error;
pub mod models;
pub mod scanner;
pub mod source;
pub mod store;

pub use aggregate::aggregate;
pub use catalog::MediaCatalog;
pub use config::CatalogConfig;
pub use duration::format_duration;
pub use error::IndexUnavailable;
pub use models::{
    CatalogView, GroupSummary, MediaItem, MediaKind, RawRecord, Snapshot, ALL_GROUP,
};
pub use scanner::scan;
pub use source::{DirectorySource, MediaRow, MediaSource, SourceFilter};
pub use store::{MediaEntry, MediaStore};

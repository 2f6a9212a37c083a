//! The catalog service: snapshot ownership, reload orchestration, queries

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::aggregate::aggregate;
use crate::config::CatalogConfig;
use crate::error::IndexUnavailable;
use crate::models::{GroupSummary, MediaItem, MediaKind, Snapshot};
use crate::scanner::scan;
use crate::source::MediaSource;

/// The media catalog engine.
///
/// Owns the current snapshot and the storage source handle. Handles are
/// cheap to clone and share one underlying catalog. The catalog starts
/// unready: queries return empty results until the first successful
/// reload installs a snapshot.
///
/// Queries are synchronous and safe from any thread, including while a
/// reload is in flight; each query reads exactly one installed snapshot.
#[derive(Clone)]
pub struct MediaCatalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    source: Arc<dyn MediaSource + Send + Sync>,
    config: CatalogConfig,
    /// The installed snapshot; `None` until the first successful reload.
    /// The lock is held only for the pointer clone or swap, never across
    /// a scan.
    snapshot: Mutex<Option<Arc<Snapshot>>>,
    /// Serializes reloads so at most one scan is in flight
    reload_lock: Mutex<()>,
}

impl MediaCatalog {
    /// Create an unready catalog over a storage source
    pub fn new(source: Arc<dyn MediaSource + Send + Sync>, config: CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                source,
                config,
                snapshot: Mutex::new(None),
                reload_lock: Mutex::new(()),
            }),
        }
    }

    /// Trigger one reload on a background worker thread.
    ///
    /// Idempotent: every call re-scans. A failed background reload is
    /// logged and leaves any previously installed snapshot in place.
    /// The returned handle may be joined to wait for the initial load,
    /// or dropped for fire-and-forget use.
    pub fn setup(&self) -> thread::JoinHandle<()> {
        let catalog = self.clone();
        thread::spawn(move || {
            if let Err(e) = catalog.reload() {
                log::warn!("background reload failed: {}", e);
            }
        })
    }

    /// Re-scan the source and atomically install a new snapshot.
    ///
    /// Concurrent calls serialize: at most one scan runs at a time. On
    /// failure the previous snapshot stays installed and the error is
    /// returned to this caller.
    pub fn reload(&self) -> Result<(), IndexUnavailable> {
        let _in_flight = lock(&self.inner.reload_lock);

        let records = scan(self.inner.source.as_ref(), &self.inner.config)?;
        let snapshot = aggregate(&records);
        log::info!(
            "reload complete: {} records, {} groups",
            records.len(),
            snapshot.all.group_count()
        );

        *lock(&self.inner.snapshot) = Some(Arc::new(snapshot));
        Ok(())
    }

    /// Whether a snapshot has been installed
    pub fn is_ready(&self) -> bool {
        lock(&self.inner.snapshot).is_some()
    }

    /// The items of one group in the view for `kind`.
    ///
    /// Returns a defensive copy; callers may mutate it freely. Empty when
    /// the group is absent, the kind has no view, or the catalog is unready.
    pub fn query_items(&self, kind: MediaKind, group: &str) -> Vec<MediaItem> {
        let Some(snapshot) = self.current_snapshot() else {
            return Vec::new();
        };
        snapshot
            .view(kind)
            .and_then(|view| view.items(group))
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }

    /// One summary per group of the view for `kind`, in key order.
    ///
    /// Empty groups get a placeholder summary (no path, count 0). Empty
    /// when the kind has no view or the catalog is unready.
    pub fn group_summaries(&self, kind: MediaKind) -> Vec<GroupSummary> {
        let Some(snapshot) = self.current_snapshot() else {
            return Vec::new();
        };
        snapshot
            .view(kind)
            .map(|view| view.summaries())
            .unwrap_or_default()
    }

    /// Clone the currently installed snapshot pointer
    fn current_snapshot(&self) -> Option<Arc<Snapshot>> {
        lock(&self.inner.snapshot).clone()
    }
}

/// Lock a mutex, tolerating poisoning (a panicked writer never held a
/// half-written snapshot: the swap is a single pointer store)
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ALL_GROUP;
    use crate::source::{MediaRow, SourceFilter};
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn row(path: &str, bucket: &str, ct: &str, inserted_at: i64) -> MediaRow {
        MediaRow {
            path: Some(PathBuf::from(path)),
            inserted_at: Some(inserted_at),
            bucket: Some(bucket.to_string()),
            duration_ms: None,
            content_type: Some(ct.to_string()),
        }
    }

    /// Source whose row set can be swapped between reloads
    struct SwappableSource {
        rows: Mutex<Result<Vec<MediaRow>, String>>,
    }

    impl SwappableSource {
        fn new(rows: Vec<MediaRow>) -> Self {
            Self {
                rows: Mutex::new(Ok(rows)),
            }
        }

        fn set(&self, rows: Vec<MediaRow>) {
            *self.rows.lock().unwrap() = Ok(rows);
        }

        fn fail(&self, message: &str) {
            *self.rows.lock().unwrap() = Err(message.to_string());
        }
    }

    impl MediaSource for SwappableSource {
        fn query_rows(&self, _filter: &SourceFilter) -> Result<Vec<MediaRow>, IndexUnavailable> {
            match &*self.rows.lock().unwrap() {
                Ok(rows) => Ok(rows.clone()),
                Err(message) => Err(IndexUnavailable::new(message.clone())),
            }
        }
    }

    fn sample_rows() -> Vec<MediaRow> {
        vec![
            row("/m/Camera/v.mp4", "Camera", "video/mp4", 40),
            row("/m/Camera/i.jpg", "Camera", "image/jpeg", 30),
            row("/m/Memes/g.gif", "Memes", "image/gif", 20),
            row("/m/Screens/s.png", "Screens", "image/png", 10),
        ]
    }

    fn catalog_with(rows: Vec<MediaRow>) -> (Arc<SwappableSource>, MediaCatalog) {
        let source = Arc::new(SwappableSource::new(rows));
        let catalog = MediaCatalog::new(source.clone(), CatalogConfig::default());
        (source, catalog)
    }

    #[test]
    fn test_queries_before_setup_are_empty() {
        let (_, catalog) = catalog_with(sample_rows());
        assert!(!catalog.is_ready());
        for kind in [
            MediaKind::All,
            MediaKind::Image,
            MediaKind::Video,
            MediaKind::AnimatedImage,
            MediaKind::Unrecognized,
        ] {
            assert!(catalog.query_items(kind, ALL_GROUP).is_empty());
            assert!(catalog.query_items(kind, "Camera").is_empty());
            assert!(catalog.group_summaries(kind).is_empty());
        }
    }

    #[test]
    fn test_setup_installs_snapshot() {
        let (_, catalog) = catalog_with(sample_rows());
        catalog.setup().join().unwrap();
        assert!(catalog.is_ready());
        assert_eq!(catalog.query_items(MediaKind::All, ALL_GROUP).len(), 4);
        // Unrecognized has no view of its own
        assert!(catalog.query_items(MediaKind::Unrecognized, ALL_GROUP).is_empty());
        assert!(catalog.query_items(MediaKind::Image, "NoSuchAlbum").is_empty());
    }

    #[test]
    fn test_all_summary_counts_other_groups() {
        let (_, catalog) = catalog_with(sample_rows());
        catalog.reload().unwrap();

        for kind in [MediaKind::All, MediaKind::Image, MediaKind::Video] {
            let summaries = catalog.group_summaries(kind);
            let all = summaries
                .iter()
                .find(|s| s.name == ALL_GROUP)
                .expect("All group present");
            let rest: usize = summaries
                .iter()
                .filter(|s| s.name != ALL_GROUP)
                .map(|s| s.count)
                .sum();
            assert_eq!(all.count, rest);
        }
    }

    #[test]
    fn test_per_kind_items_appear_in_combined_view() {
        let (_, catalog) = catalog_with(sample_rows());
        catalog.reload().unwrap();

        for kind in [MediaKind::Image, MediaKind::Video, MediaKind::AnimatedImage] {
            for summary in catalog.group_summaries(kind) {
                for item in catalog.query_items(kind, &summary.name) {
                    let combined = catalog.query_items(MediaKind::All, &summary.name);
                    assert!(
                        combined.iter().any(|c| c.path == item.path),
                        "item {:?} missing from combined view",
                        item.path
                    );
                }
            }
        }
    }

    #[test]
    fn test_query_items_returns_defensive_copy() {
        let (_, catalog) = catalog_with(sample_rows());
        catalog.reload().unwrap();

        let mut first = catalog.query_items(MediaKind::Image, "Camera");
        assert_eq!(first.len(), 1);
        first.clear();
        first.push(MediaItem::placeholder("Camera"));

        let second = catalog.query_items(MediaKind::Image, "Camera");
        assert_eq!(second.len(), 1);
        assert!(!second[0].is_placeholder());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let (source, catalog) = catalog_with(sample_rows());
        catalog.reload().unwrap();
        let before = catalog.query_items(MediaKind::All, ALL_GROUP);

        source.fail("storage gone");
        let err = catalog.reload().unwrap_err();
        assert!(err.message.contains("storage gone"));
        assert!(catalog.is_ready());
        assert_eq!(catalog.query_items(MediaKind::All, ALL_GROUP), before);
    }

    #[test]
    fn test_failed_first_reload_stays_unready() {
        let (source, catalog) = catalog_with(Vec::new());
        source.fail("no permission");
        assert!(catalog.reload().is_err());
        assert!(!catalog.is_ready());
        assert!(catalog.group_summaries(MediaKind::All).is_empty());
    }

    #[test]
    fn test_reload_is_idempotent_for_unchanged_source() {
        let (_, catalog) = catalog_with(sample_rows());
        catalog.reload().unwrap();
        let first = catalog.group_summaries(MediaKind::All);
        catalog.reload().unwrap();
        let second = catalog.group_summaries(MediaKind::All);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_source_yields_seeded_all_group() {
        let (_, catalog) = catalog_with(Vec::new());
        catalog.reload().unwrap();
        assert!(catalog.is_ready());

        let summaries = catalog.group_summaries(MediaKind::Image);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, ALL_GROUP);
        assert_eq!(summaries[0].count, 0);
        assert!(summaries[0].path.is_none());
    }

    #[test]
    fn test_concurrent_queries_never_observe_mixed_snapshots() {
        let set_a = vec![
            row("/a/1.jpg", "A", "image/jpeg", 3),
            row("/a/2.jpg", "A", "image/jpeg", 2),
        ];
        let set_b = vec![
            row("/b/1.mp4", "B", "video/mp4", 3),
            row("/b/2.mp4", "B", "video/mp4", 2),
            row("/b/3.mp4", "B", "video/mp4", 1),
        ];
        let paths_of = |items: &[MediaItem]| -> BTreeSet<PathBuf> {
            items.iter().filter_map(|i| i.path.clone()).collect()
        };
        let expect_a: BTreeSet<PathBuf> =
            set_a.iter().map(|r| r.path.clone().unwrap()).collect();
        let expect_b: BTreeSet<PathBuf> =
            set_b.iter().map(|r| r.path.clone().unwrap()).collect();

        let (source, catalog) = catalog_with(set_a.clone());
        catalog.reload().unwrap();

        let stop = Arc::new(AtomicBool::new(false));
        let writer = {
            let catalog = catalog.clone();
            let source = Arc::clone(&source);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut use_b = true;
                while !stop.load(Ordering::Relaxed) {
                    source.set(if use_b { set_b.clone() } else { set_a.clone() });
                    catalog.reload().unwrap();
                    use_b = !use_b;
                }
            })
        };

        let deadline = std::time::Instant::now() + Duration::from_millis(200);
        while std::time::Instant::now() < deadline {
            let observed = paths_of(&catalog.query_items(MediaKind::All, ALL_GROUP));
            assert!(
                observed == expect_a || observed == expect_b,
                "observed a mixed snapshot: {:?}",
                observed
            );
        }
        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }
}

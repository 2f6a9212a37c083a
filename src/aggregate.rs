//! Aggregator: builds the four catalog views from scanned records

use crate::duration::format_duration;
use crate::models::{MediaItem, MediaKind, RawRecord, Snapshot};

/// Build a snapshot from records in scanner order.
///
/// Each record is classified and appended, in order, under its group and
/// under `"All"` in both its kind-specific view and the combined view
/// (dual bucketing). Unrecognized records have no view of their own and
/// land only in the combined view. Item order within a group is exactly
/// the scanner's emission order.
pub fn aggregate(records: &[RawRecord]) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for record in records {
        let kind = MediaKind::from_content_type(&record.content_type);
        let item = MediaItem::new(
            record.path.clone(),
            format_duration(record.duration_ms),
            kind,
            record.group.clone(),
        );

        match kind {
            MediaKind::Image => snapshot.image.append(item.clone()),
            MediaKind::Video => snapshot.video.append(item.clone()),
            MediaKind::AnimatedImage => snapshot.gif.append(item.clone()),
            // Classification never yields All; the combined view is fed below
            MediaKind::Unrecognized | MediaKind::All => {}
        }
        snapshot.all.append(item);
    }

    snapshot
}

//! Scanner: turns raw source rows into validated, ordered records

use crate::config::CatalogConfig;
use crate::error::IndexUnavailable;
use crate::models::RawRecord;
use crate::source::{MediaRow, MediaSource};

/// Query the source once and return validated records, newest first.
///
/// Row validation is best-effort: rows missing a path, bucket or content
/// type are skipped and logged, never fatal. A missing duration is 0 ms.
/// Only a failed source query aborts the scan.
pub fn scan(
    source: &dyn MediaSource,
    config: &CatalogConfig,
) -> Result<Vec<RawRecord>, IndexUnavailable> {
    let rows = source.query_rows(&config.source_filter())?;
    let total = rows.len();

    let mut records: Vec<RawRecord> = rows.into_iter().filter_map(validate_row).collect();
    let skipped = total - records.len();
    if skipped > 0 {
        log::warn!("scan skipped {} of {} rows", skipped, total);
    }

    // The source contract already orders newest-first; the stable re-sort
    // keeps that order for ties and corrects a misbehaving source.
    records.sort_by(|a, b| b.inserted_at.cmp(&a.inserted_at));
    Ok(records)
}

/// Validate one row, returning `None` when a required field is missing
fn validate_row(row: MediaRow) -> Option<RawRecord> {
    let path = match row.path {
        Some(path) => path,
        None => {
            log::warn!("skipping row with no path");
            return None;
        }
    };
    let group = match row.bucket {
        Some(ref bucket) if !bucket.is_empty() => bucket.clone(),
        _ => {
            log::warn!("skipping row with no bucket: {}", path.display());
            return None;
        }
    };
    let content_type = match row.content_type {
        Some(ref ct) if !ct.is_empty() => ct.clone(),
        _ => {
            log::warn!("skipping row with no content type: {}", path.display());
            return None;
        }
    };

    Some(RawRecord {
        path,
        group,
        content_type,
        duration_ms: row.duration_ms.unwrap_or(0),
        inserted_at: row.inserted_at.unwrap_or(0),
    })
}

//! SQLite-backed media index source

use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::IndexUnavailable;
use crate::source::{MediaRow, MediaSource, SourceFilter};

/// One entry to insert into the store
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Full path to the media file
    pub path: String,
    /// Album/bucket display name
    pub bucket: Option<String>,
    /// Content-type string (also determines the kind column)
    pub content_type: String,
    /// Playback duration in milliseconds, when known
    pub duration_ms: Option<u64>,
    /// Insertion timestamp (Unix seconds)
    pub inserted_at: i64,
}

/// SQLite media index.
///
/// Plays the role of the platform media database: a table of media rows
/// with a kind column filterable to image/video and an insertion-time
/// ordering. Rows with NULL columns come back with `None` fields; a bad
/// row never aborts a query.
///
/// The connection sits behind a mutex so a store can be shared with the
/// catalog's background reload worker.
pub struct MediaStore {
    conn: Mutex<Connection>,
}

impl MediaStore {
    /// Open or create a store
    pub fn open(path: &Path) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Lock the connection, tolerating poisoning (SQLite state stays valid)
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialize the schema
    fn init_schema(&self) -> SqliteResult<()> {
        self.conn().execute_batch(
            "
            CREATE TABLE IF NOT EXISTS media (
                path TEXT PRIMARY KEY,
                inserted_at INTEGER NOT NULL,
                bucket TEXT,
                media_kind TEXT NOT NULL,
                duration_ms INTEGER,
                content_type TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_media_inserted_at ON media(inserted_at);
            CREATE INDEX IF NOT EXISTS idx_media_kind ON media(media_kind);
            ",
        )?;
        Ok(())
    }

    /// Kind column value for a content type ('image', 'video' or 'other')
    fn kind_column(content_type: &str) -> &'static str {
        let ct = content_type.to_lowercase();
        if ct.starts_with("video/") {
            "video"
        } else if ct.starts_with("image/") {
            "image"
        } else {
            "other"
        }
    }

    /// Insert or replace one entry
    pub fn insert(&self, entry: &MediaEntry) -> SqliteResult<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO media
             (path, inserted_at, bucket, media_kind, duration_ms, content_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.path,
                entry.inserted_at,
                entry.bucket,
                Self::kind_column(&entry.content_type),
                entry.duration_ms.map(|d| d as i64),
                entry.content_type,
            ],
        )?;
        Ok(())
    }

    /// Batch insert entries in one transaction
    pub fn insert_batch(&self, entries: &[MediaEntry]) -> SqliteResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO media
                 (path, inserted_at, bucket, media_kind, duration_ms, content_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.path,
                    entry.inserted_at,
                    entry.bucket,
                    Self::kind_column(&entry.content_type),
                    entry.duration_ms.map(|d| d as i64),
                    entry.content_type,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete an entry by path
    pub fn delete(&self, path: &str) -> SqliteResult<bool> {
        let n = self
            .conn()
            .execute("DELETE FROM media WHERE path = ?1", params![path])?;
        Ok(n > 0)
    }

    /// Get the number of stored rows
    pub fn row_count(&self) -> SqliteResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl MediaSource for MediaStore {
    fn query_rows(&self, filter: &SourceFilter) -> Result<Vec<MediaRow>, IndexUnavailable> {
        let sql = match (filter.images, filter.videos) {
            (true, true) => {
                "SELECT path, inserted_at, bucket, duration_ms, content_type
                 FROM media WHERE media_kind IN ('image', 'video')
                 ORDER BY inserted_at DESC"
            }
            (true, false) => {
                "SELECT path, inserted_at, bucket, duration_ms, content_type
                 FROM media WHERE media_kind = 'image'
                 ORDER BY inserted_at DESC"
            }
            (false, true) => {
                "SELECT path, inserted_at, bucket, duration_ms, content_type
                 FROM media WHERE media_kind = 'video'
                 ORDER BY inserted_at DESC"
            }
            (false, false) => return Ok(Vec::new()),
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(sql).map_err(IndexUnavailable::from)?;
        let mapped = stmt
            .query_map([], |row| {
                Ok(MediaRow {
                    path: row
                        .get::<_, Option<String>>(0)?
                        .map(std::path::PathBuf::from),
                    inserted_at: row.get(1)?,
                    bucket: row.get(2)?,
                    duration_ms: row.get::<_, Option<i64>>(3)?.map(|d| d.max(0) as u64),
                    content_type: row.get(4)?,
                })
            })
            .map_err(IndexUnavailable::from)?;

        let mut rows = Vec::new();
        for row in mapped {
            match row {
                Ok(row) => rows.push(row),
                // A malformed row is dropped, not fatal
                Err(e) => log::warn!("skipping unreadable media row: {}", e),
            }
        }
        Ok(rows)
    }
}

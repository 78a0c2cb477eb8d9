//! `src/model/file_record.rs`
//! ============================================================
//! Immutable metadata for one listed file.
//!
//! A record is built once by the enumerator when an entry is visited and
//! is never mutated afterwards; a newer listing simply replaces it.

// ------------------------------------------------------------
// Standard-library imports
// ------------------------------------------------------------

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

// ------------------------------------------------------------
// Third-party crate imports
// ------------------------------------------------------------

use bytesize::ByteSize;
use chrono::{DateTime, Local, TimeZone};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Display format for modification timestamps, e.g. `07 Mar, 2024 14:05`.
pub const DATE_FORMAT: &str = "%d %b, %Y %H:%M";

// ------------------------------------------------------------
// FileRecord
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name without its parent directories.
    pub name: CompactString,

    /// Last modification time in epoch milliseconds.
    pub modified_at: i64,

    /// Byte length.
    pub size: u64,

    /// Absolute path; doubles as the favorite identifier.
    pub path: String,
}

impl FileRecord {
    pub fn new(
        name: impl Into<CompactString>,
        modified_at: i64,
        size: u64,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            modified_at,
            size,
            path: path.into(),
        }
    }

    /// Builds a record from an already-fetched `stat` result.
    pub fn from_meta(path: &Path, meta: &Metadata) -> Self {
        let name: CompactString = path
            .file_name()
            .map(OsStr::to_string_lossy)
            .map_or_else(CompactString::default, |n| CompactString::new(n));
        let modified = meta.modified().unwrap_or(UNIX_EPOCH);

        Self {
            name,
            modified_at: epoch_millis(modified),
            size: meta.len(),
            path: path.to_string_lossy().into_owned(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Case-insensitive substring match against the name. Empty query matches.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }

    /// Human-readable size string.
    #[inline]
    #[must_use]
    pub fn human_size(&self) -> String {
        ByteSize::b(self.size).to_string()
    }

    /// Modification time in local time, `dd MMM, yyyy HH:mm`.
    #[must_use]
    pub fn formatted_modified(&self) -> String {
        self.format_modified(DATE_FORMAT)
    }

    #[must_use]
    pub fn format_modified(&self, fmt: &str) -> String {
        let dt: DateTime<Local> = Local
            .timestamp_millis_opt(self.modified_at)
            .single()
            .unwrap_or_else(|| -> DateTime<Local> { Local::now() });

        dt.format(fmt).to_string()
    }
}

fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        // Pre-epoch timestamps come back negative.
        Err(e) => i64::try_from(e.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}

//! ``src/fs/enumerator.rs``
//!
//! # `FileEnumerator`: Recursive File Listing
//!
//! Walks a directory tree and returns one [`FileRecord`] per non-directory
//! entry, descending into every sub-directory that is not hidden. Results
//! from nested directories are part of the output. No ordering is imposed
//! beyond the order the OS yields entries in.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, HiddenPolicy};
use crate::error::AppError;
use crate::model::file_record::FileRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileEnumerator {
    hidden: HiddenPolicy,
    follow_links: bool,
}

impl FileEnumerator {
    pub const fn new(hidden: HiddenPolicy, follow_links: bool) -> Self {
        Self {
            hidden,
            follow_links,
        }
    }

    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.hidden, config.follow_links)
    }

    /// Lists every file below `dir`.
    ///
    /// Fails with [`AppError::NoFilesFound`] when the top-level directory
    /// cannot be read or is empty. Unreadable nested entries are skipped.
    pub fn list(&self, dir: &Path) -> Result<Vec<FileRecord>, AppError> {
        let start_time: Instant = Instant::now();

        Self::ensure_listable(dir)?;

        let mut records: Vec<FileRecord> = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e: &DirEntry| !self.should_prune(e));

        for entry_result in walker {
            let entry: DirEntry = match entry_result {
                Ok(e) => e,

                Err(e) => {
                    debug!("Skipping unreadable entry under {:?}: {}", dir, e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            match entry.metadata() {
                Ok(meta) => records.push(FileRecord::from_meta(entry.path(), &meta)),

                Err(e) => {
                    debug!("Failed to read metadata for {:?}: {}", entry.path(), e);
                }
            }
        }

        let duration: Duration = start_time.elapsed();
        info!(
            marker = "PERF_DIRECTORY_SCAN",
            operation_type = "enumerate_files",
            duration_us = duration.as_micros() as u64,
            files = records.len(),
            "Listed {} files under {} in {:?}",
            records.len(),
            dir.display(),
            duration
        );

        Ok(records)
    }

    /// Runs [`Self::list`] on the blocking pool so a deep tree never stalls
    /// the runtime's worker threads.
    pub async fn list_async(&self, dir: PathBuf) -> Result<Vec<FileRecord>, AppError> {
        let enumerator: Self = *self;

        tokio::task::spawn_blocking(move || enumerator.list(&dir))
            .await
            .map_err(|e| AppError::task_failed("enumerate_files", e.to_string()))?
    }

    // Permission failure, missing path and an empty directory look the same.
    fn ensure_listable(dir: &Path) -> Result<(), AppError> {
        match fs::read_dir(dir) {
            Ok(mut read_dir) => {
                if read_dir.next().is_none() {
                    debug!("Directory {:?} is empty", dir);
                    return Err(AppError::no_files_found(dir));
                }
                Ok(())
            }

            Err(e) => {
                debug!("Cannot list {:?}: {}", dir, e);
                Err(AppError::no_files_found(dir))
            }
        }
    }

    fn should_prune(&self, entry: &DirEntry) -> bool {
        // The root itself is never pruned, even when its own name is dotted.
        if entry.depth() == 0 || !is_hidden(entry) {
            return false;
        }

        match self.hidden {
            HiddenPolicy::SkipAll => true,
            HiddenPolicy::DirectoriesOnly => entry.file_type().is_dir(),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn names(records: &[FileRecord]) -> BTreeSet<String> {
        records.iter().map(|r| r.name.to_string()).collect()
    }

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt", b"a");
        touch(dir.path(), "b.pdf", b"bb");
        touch(dir.path(), ".secret", b"x");
        touch(dir.path(), "nested/c.txt", b"ccc");
        touch(dir.path(), "nested/deeper/d.jpg", b"dddd");
        touch(dir.path(), ".cache/e.txt", b"e");
        dir
    }

    #[test]
    fn test_nested_files_are_included() {
        let dir = fixture();
        let records = FileEnumerator::default().list(dir.path()).unwrap();

        assert_eq!(
            names(&records),
            ["a.txt", "b.pdf", "c.txt", "d.jpg"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_directories_only_policy_keeps_hidden_files() {
        let dir = fixture();
        let records = FileEnumerator::new(HiddenPolicy::DirectoriesOnly, false)
            .list(dir.path())
            .unwrap();

        let found = names(&records);
        assert!(found.contains(".secret"));
        assert!(!found.contains("e.txt"));
        // The pruned directory is not itself a record.
        assert!(!found.contains(".cache"));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_record_fields_match_disk() {
        let dir = fixture();
        let records = FileEnumerator::default().list(dir.path()).unwrap();
        let d = records.iter().find(|r| r.name == "d.jpg").unwrap();

        assert_eq!(d.size, 4);
        assert_eq!(
            d.as_path(),
            dir.path().join("nested").join("deeper").join("d.jpg")
        );
    }

    #[test]
    fn test_missing_directory_is_no_files_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = FileEnumerator::default().list(&missing).unwrap_err();
        assert!(err.is_listing_failure());
    }

    #[test]
    fn test_empty_directory_is_no_files_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileEnumerator::default().list(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::NoFilesFound { .. }));
    }

    #[test]
    fn test_file_as_root_is_no_files_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "plain.txt", b"x");

        let err = FileEnumerator::default()
            .list(&dir.path().join("plain.txt"))
            .unwrap_err();
        assert!(err.is_listing_failure());
    }

    #[test]
    fn test_only_empty_subdirectories_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/inner")).unwrap();

        let records = FileEnumerator::default().list(dir.path()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_hidden_root_is_still_walked() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), ".root/visible.txt", b"v");

        let records = FileEnumerator::default()
            .list(&dir.path().join(".root"))
            .unwrap();
        assert_eq!(names(&records), BTreeSet::from(["visible.txt".to_string()]));
    }

    #[tokio::test]
    async fn test_list_async_matches_sync() {
        let dir = fixture();
        let enumerator = FileEnumerator::default();

        let sync = enumerator.list(dir.path()).unwrap();
        let from_pool = enumerator.list_async(dir.path().to_path_buf()).await.unwrap();

        assert_eq!(names(&sync), names(&from_pool));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_kept_and_searchable() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"report-\xff.txt"));
        // Some filesystems reject invalid UTF-8 names outright.
        if fs::write(&path, b"r").is_err() {
            return;
        }

        let records = FileEnumerator::default().list(dir.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].name.is_empty());
        assert!(records[0].name.starts_with("report-"));
        assert!(records[0].matches("report"));
    }
}

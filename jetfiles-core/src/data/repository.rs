//! `FileRepository`: one contract over file listing and favorites.
//!
//! The state holder only ever talks to this trait, so tests and demos can
//! swap the disk-backed implementation for the doubles in
//! [`crate::data::fake`].

use std::path::Path;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::Config;
use crate::data::favorites::{FavoriteSet, FavoritesStore};
use crate::error::AppError;
use crate::fs::enumerator::FileEnumerator;
use crate::model::file_record::FileRecord;

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Lists every file under `dir`.
    async fn fetch_files(&self, dir: &Path) -> Result<Vec<FileRecord>, AppError>;

    /// Latest favorites first, then every change.
    fn observe_favorites(&self) -> BoxStream<'static, FavoriteSet>;

    /// Flips whether `id` is a favorite.
    async fn toggle_favorite(&self, id: &str);
}

/// Disk-backed repository: walks the real filesystem and keeps favorites in memory.
#[derive(Debug, Default)]
pub struct LocalFileRepository {
    enumerator: FileEnumerator,
    favorites: FavoritesStore,
}

impl LocalFileRepository {
    pub fn new(enumerator: FileEnumerator) -> Self {
        Self {
            enumerator,
            favorites: FavoritesStore::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(FileEnumerator::from_config(config))
    }

    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }
}

#[async_trait]
impl FileRepository for LocalFileRepository {
    async fn fetch_files(&self, dir: &Path) -> Result<Vec<FileRecord>, AppError> {
        self.enumerator.list_async(dir.to_path_buf()).await
    }

    fn observe_favorites(&self) -> BoxStream<'static, FavoriteSet> {
        self.favorites.observe()
    }

    async fn toggle_favorite(&self, id: &str) {
        self.favorites.toggle(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_local_repository_lists_and_toggles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), b"1").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("two.txt"), b"22").unwrap();

        let repo = LocalFileRepository::default();
        let files = repo.fetch_files(dir.path()).await.unwrap();
        assert_eq!(files.len(), 2);

        let mut favorites = repo.observe_favorites();
        assert!(favorites.next().await.unwrap().is_empty());

        repo.toggle_favorite(&files[0].path).await;
        assert!(favorites.next().await.unwrap().contains(&files[0].path));
        assert!(repo.favorites().contains(&files[0].path));
    }

    #[tokio::test]
    async fn test_local_repository_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalFileRepository::default();

        let err = repo.fetch_files(&dir.path().join("nope")).await.unwrap_err();
        assert!(err.is_listing_failure());
    }
}

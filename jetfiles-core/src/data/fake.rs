//! Deterministic [`FileRepository`] doubles.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::data::favorites::{FavoriteSet, FavoritesStore};
use crate::data::repository::FileRepository;
use crate::error::AppError;
use crate::model::file_record::FileRecord;

/// Always fails to list, never reports favorites and ignores toggles.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingFakeFileRepository;

#[async_trait]
impl FileRepository for BlockingFakeFileRepository {
    async fn fetch_files(&self, dir: &Path) -> Result<Vec<FileRecord>, AppError> {
        Err(AppError::no_files_found(dir))
    }

    fn observe_favorites(&self) -> BoxStream<'static, FavoriteSet> {
        stream::empty().boxed()
    }

    async fn toggle_favorite(&self, _id: &str) {}
}

/// Serves a fixed listing regardless of the directory asked for, with
/// working in-memory favorites.
#[derive(Debug)]
pub struct StaticFileRepository {
    files: Result<Vec<FileRecord>, AppError>,
    favorites: FavoritesStore,
    delay: Option<Duration>,
}

impl StaticFileRepository {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files: Ok(files),
            favorites: FavoritesStore::new(),
            delay: None,
        }
    }

    /// Every fetch fails with `err`.
    pub fn failing(err: AppError) -> Self {
        Self {
            files: Err(err),
            favorites: FavoritesStore::new(),
            delay: None,
        }
    }

    /// Builds records named `names` under `/fake`, one byte each.
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            names
                .into_iter()
                .map(|name| FileRecord::new(name, 0, 1, format!("/fake/{name}")))
                .collect(),
        )
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }
}

#[async_trait]
impl FileRepository for StaticFileRepository {
    async fn fetch_files(&self, _dir: &Path) -> Result<Vec<FileRecord>, AppError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.files.clone()
    }

    fn observe_favorites(&self) -> BoxStream<'static, FavoriteSet> {
        self.favorites.observe()
    }

    async fn toggle_favorite(&self, id: &str) {
        self.favorites.toggle(id);
    }
}

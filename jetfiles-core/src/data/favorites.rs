//! In-memory favorites, keyed by absolute path.
//!
//! The set lives behind a `watch` channel: observers always start from the
//! latest value and then see every change. Nothing is persisted, so the set
//! is empty again after a restart.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;
use tracing::debug;

/// Immutable snapshot handed to observers.
pub type FavoriteSet = Arc<HashSet<String>>;

#[derive(Debug)]
pub struct FavoritesStore {
    tx: watch::Sender<FavoriteSet>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::with_favorites(std::iter::empty::<String>())
    }

    pub fn with_favorites<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let initial: HashSet<String> = ids.into_iter().map(Into::into).collect();
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Current snapshot.
    pub fn current(&self) -> FavoriteSet {
        self.tx.borrow().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tx.borrow().contains(id)
    }

    /// Raw receiver, for callers that want `changed()`/`wait_for` directly.
    pub fn subscribe(&self) -> watch::Receiver<FavoriteSet> {
        self.tx.subscribe()
    }

    /// Stream that yields the current set first, then one item per change.
    /// It ends only when the store is dropped.
    pub fn observe(&self) -> BoxStream<'static, FavoriteSet> {
        stream::unfold((self.subscribe(), true), |(mut rx, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }

            let snapshot: FavoriteSet = rx.borrow_and_update().clone();
            Some((snapshot, (rx, false)))
        })
        .boxed()
    }

    /// Flips membership of `id`. Returns `true` if it is a favorite afterwards.
    pub fn toggle(&self, id: &str) -> bool {
        let mut now_favorite = false;

        self.tx.send_modify(|set: &mut FavoriteSet| {
            let mut next: HashSet<String> = (**set).clone();
            now_favorite = next.insert(id.to_owned());
            if !now_favorite {
                next.remove(id);
            }
            *set = Arc::new(next);
        });

        debug!(id, now_favorite, "Favorite toggled");
        now_favorite
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

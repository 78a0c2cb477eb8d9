//! `HomeStateHolder`: owns the home screen state and mediates every intent.
//!
//! All mutations go through [`Shared::update`], which holds the state lock
//! for the whole mutate-then-publish step, so observers never see a
//! half-applied change and derived snapshots are published in mutation order.
//!
//! Fetches run as detached tasks and are not cancelled by later refreshes.
//! When two overlap, whichever completes last decides the listing. A fetch
//! completion only touches the listing, the loading flag and the error
//! queue; favorites and search text are left as they are.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::data::repository::FileRepository;
use crate::model::home_state::{ErrorKind, HomeState, HomeUiState};

struct Shared {
    repository: Arc<dyn FileRepository>,
    root_dir: PathBuf,
    state: Mutex<HomeState>,
    ui_tx: watch::Sender<HomeUiState>,
}

impl Shared {
    fn update<R>(&self, mutate: impl FnOnce(&mut HomeState) -> R) -> R {
        let mut state = self.state.lock();
        let out = mutate(&mut *state);
        self.ui_tx.send_replace(state.to_ui_state());
        out
    }
}

pub struct HomeStateHolder {
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl HomeStateHolder {
    /// Creates the holder, subscribes to favorites and starts the first refresh.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(repository: Arc<dyn FileRepository>, root_dir: impl Into<PathBuf>) -> Self {
        let initial = HomeState::loading();
        let (ui_tx, _ui_rx) = watch::channel(initial.to_ui_state());

        let shared = Arc::new(Shared {
            repository,
            root_dir: root_dir.into(),
            state: Mutex::new(initial),
            ui_tx,
        });

        let holder = Self {
            shared,
            cancel: CancellationToken::new(),
        };

        holder.spawn_favorites_observer();
        holder.refresh();
        holder
    }

    /// Receiver of derived UI state. Starts at the latest value.
    ///
    /// Drop any `borrow()` guard before calling an intent on the same thread;
    /// publishing waits for outstanding borrows.
    pub fn subscribe(&self) -> watch::Receiver<HomeUiState> {
        self.shared.ui_tx.subscribe()
    }

    /// Current derived UI state.
    pub fn snapshot(&self) -> HomeUiState {
        self.shared.ui_tx.borrow().clone()
    }

    /// Re-lists the root directory. The outcome only shows up in the UI state.
    pub fn refresh(&self) {
        self.shared.update(HomeState::begin_loading);

        let shared = Arc::clone(&self.shared);
        info!(root = %shared.root_dir.display(), "Refreshing files");

        tokio::spawn(async move {
            let result = shared.repository.fetch_files(&shared.root_dir).await;

            match result {
                Ok(files) => {
                    let shown = shared.update(|state: &mut HomeState| {
                        state.apply_loaded(&files);
                        state.files.as_ref().map_or(0, |f| f.len())
                    });
                    debug!(fetched = files.len(), shown, "Refresh completed");
                }

                Err(e) => {
                    warn!("Failed to load files from {:?}: {}", shared.root_dir, e);
                    let message = shared.update(|state: &mut HomeState| {
                        state.apply_failed(ErrorKind::LoadFailed)
                    });
                    debug!(error_id = message.id, "Queued load error");
                }
            }
        });
    }

    /// Flips the favorite flag for `id`; the new set arrives via the favorites stream.
    pub fn toggle_favorite(&self, id: impl Into<String>) {
        let id: String = id.into();
        let repository = Arc::clone(&self.shared.repository);

        debug!(id = %id, "Toggling favorite");
        tokio::spawn(async move {
            repository.toggle_favorite(&id).await;
        });
    }

    /// The UI finished presenting the error with `error_id`.
    pub fn error_shown(&self, error_id: u64) {
        let removed = self
            .shared
            .update(|state: &mut HomeState| state.acknowledge_error(error_id));

        if !removed {
            debug!(error_id, "Acknowledged an error that was not queued");
        }
    }

    /// Stores the new search text and re-lists with it.
    pub fn search_text_changed(&self, text: &str) {
        self.shared
            .update(|state: &mut HomeState| state.set_search_input(text));
        self.refresh();
    }

    /// Stops the favorites subscription. In-flight fetches still complete.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn spawn_favorites_observer(&self) {
        let shared = Arc::clone(&self.shared);
        let cancel = self.cancel.clone();
        let mut favorites = shared.repository.observe_favorites();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,

                    next = favorites.next() => match next {
                        Some(set) => {
                            debug!(count = set.len(), "Favorites changed");
                            shared.update(|state: &mut HomeState| state.set_favorites(set));
                        }
                        None => break,
                    },
                }
            }

            debug!("Favorites subscription closed");
        });
    }
}

impl Drop for HomeStateHolder {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for HomeStateHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeStateHolder")
            .field("root_dir", &self.shared.root_dir)
            .field("state", &*self.shared.state.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fake::{BlockingFakeFileRepository, StaticFileRepository};
    use std::time::Duration;

    async fn settle(
        rx: &mut watch::Receiver<HomeUiState>,
        pred: impl FnMut(&HomeUiState) -> bool,
    ) -> HomeUiState {
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
            .await
            .expect("timed out waiting for state")
            .expect("holder dropped")
            .clone()
    }

    #[tokio::test]
    async fn test_starts_loading_with_no_files() {
        let repo = Arc::new(
            StaticFileRepository::with_names(["a.txt"]).with_delay(Duration::from_millis(50)),
        );
        let holder = HomeStateHolder::new(repo, "/fake");

        let ui = holder.snapshot();
        assert!(!ui.has_files());
        assert!(ui.is_loading());
    }

    #[tokio::test]
    async fn test_initial_refresh_lists_files() {
        let repo = Arc::new(StaticFileRepository::with_names(["b.txt", "a.txt"]));
        let holder = HomeStateHolder::new(repo, "/fake");
        let mut rx = holder.subscribe();

        let ui = settle(&mut rx, |s| s.has_files() && !s.is_loading()).await;
        let names: Vec<&str> = ui.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b.txt", "a.txt"]);
        assert!(ui.error_messages().is_empty());
    }

    #[tokio::test]
    async fn test_failure_queues_error_then_acknowledge_clears_it() {
        let holder = HomeStateHolder::new(Arc::new(BlockingFakeFileRepository), "/fake");
        let mut rx = holder.subscribe();

        let ui = settle(&mut rx, |s| !s.is_loading() && !s.error_messages().is_empty()).await;
        assert!(!ui.has_files());
        let error = *ui.head_error().unwrap();
        assert_eq!(error.kind, ErrorKind::LoadFailed);

        holder.error_shown(error.id);
        assert!(holder.snapshot().error_messages().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_favorite_reaches_ui_state() {
        let repo = Arc::new(StaticFileRepository::with_names(["a.txt"]));
        let holder = HomeStateHolder::new(repo, "/fake");
        let mut rx = holder.subscribe();
        settle(&mut rx, |s| s.has_files()).await;

        holder.toggle_favorite("/fake/a.txt");
        settle(&mut rx, |s| s.is_favorite("/fake/a.txt")).await;

        holder.toggle_favorite("/fake/a.txt");
        let ui = settle(&mut rx, |s| !s.is_favorite("/fake/a.txt")).await;
        assert!(ui.has_files());
    }

    #[tokio::test]
    async fn test_shutdown_stops_favorites_updates() {
        let repo = Arc::new(StaticFileRepository::with_names(["a.txt"]));
        let holder = HomeStateHolder::new(Arc::clone(&repo) as Arc<dyn FileRepository>, "/fake");
        let mut rx = holder.subscribe();
        settle(&mut rx, |s| s.has_files()).await;

        holder.shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;
        repo.favorites().toggle("/fake/a.txt");
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!holder.snapshot().is_favorite("/fake/a.txt"));
    }

    #[tokio::test]
    async fn test_intent_after_dropping_borrow_publishes() {
        let repo = Arc::new(StaticFileRepository::with_names(["a.txt"]));
        let holder = HomeStateHolder::new(repo, "/fake");
        let mut rx = holder.subscribe();
        settle(&mut rx, |s| s.has_files() && !s.is_loading()).await;

        {
            let current = rx.borrow_and_update();
            assert_eq!(current.search_input(), "");
        }

        holder.search_text_changed("zzz");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow().search_input(), "zzz");
    }
}

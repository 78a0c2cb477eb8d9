//! Home screen state: the authoritative record and its render-ready projection.
//!
//! [`HomeState`] is owned and mutated only by the state holder. Observers
//! receive [`HomeUiState`], which is recomputed from it after every change.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use serde::Serialize;

use crate::data::favorites::FavoriteSet;
use crate::model::file_record::FileRecord;

/// What went wrong, as far as the screen cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LoadFailed,
}

impl ErrorKind {
    pub const fn message(self) -> &'static str {
        match self {
            Self::LoadFailed => "Can't load files",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One pending notification. Removed by id once the UI has shown it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorMessage {
    pub id: u64,
    pub kind: ErrorKind,
}

impl ErrorMessage {
    /// New message with a random id.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().as_u64_pair().0,
            kind,
        }
    }
}

/// Keeps the records whose name contains `query`, ignoring case, in their
/// original order.
pub fn filter_files(files: &[FileRecord], query: &str) -> Vec<FileRecord> {
    files.iter().filter(|f| f.matches(query)).cloned().collect()
}

// ------------------------------------------------------------
// Authoritative state
// ------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    /// `None` until a listing has succeeded once.
    pub files: Option<Arc<[FileRecord]>>,
    pub favorites: FavoriteSet,
    pub is_loading: bool,
    pub error_messages: Vec<ErrorMessage>,
    pub search_input: CompactString,
}

impl HomeState {
    /// Initial state of a freshly created holder, which refreshes immediately.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
    }

    /// A fetch finished: keep the matches for the current search text.
    pub fn apply_loaded(&mut self, fetched: &[FileRecord]) {
        self.files = Some(filter_files(fetched, &self.search_input).into());
        self.is_loading = false;
    }

    /// A fetch failed: queue an error and leave any earlier listing alone.
    pub fn apply_failed(&mut self, kind: ErrorKind) -> ErrorMessage {
        let message = ErrorMessage::new(kind);
        self.error_messages.push(message);
        self.is_loading = false;
        message
    }

    /// Drops the message with `id`. Returns whether one was queued.
    pub fn acknowledge_error(&mut self, id: u64) -> bool {
        let before = self.error_messages.len();
        self.error_messages.retain(|m| m.id != id);
        before != self.error_messages.len()
    }

    pub fn set_favorites(&mut self, favorites: FavoriteSet) {
        self.favorites = favorites;
    }

    pub fn set_search_input(&mut self, text: &str) {
        self.search_input = CompactString::new(text);
    }

    /// Pure projection into the variant the UI renders.
    pub fn to_ui_state(&self) -> HomeUiState {
        match &self.files {
            None => HomeUiState::NoFiles {
                is_loading: self.is_loading,
                error_messages: self.error_messages.clone(),
                search_input: self.search_input.clone(),
            },

            Some(files) => HomeUiState::HasFiles {
                files: Arc::clone(files),
                favorites: Arc::clone(&self.favorites),
                is_loading: self.is_loading,
                error_messages: self.error_messages.clone(),
                search_input: self.search_input.clone(),
            },
        }
    }
}

// ------------------------------------------------------------
// Derived, read-only state
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum HomeUiState {
    /// Nothing listed yet: still loading, or every attempt so far failed.
    NoFiles {
        is_loading: bool,
        error_messages: Vec<ErrorMessage>,
        search_input: CompactString,
    },

    /// A listing is available, possibly empty after filtering.
    HasFiles {
        files: Arc<[FileRecord]>,
        favorites: FavoriteSet,
        is_loading: bool,
        error_messages: Vec<ErrorMessage>,
        search_input: CompactString,
    },
}

impl HomeUiState {
    pub const fn is_loading(&self) -> bool {
        match self {
            Self::NoFiles { is_loading, .. } | Self::HasFiles { is_loading, .. } => *is_loading,
        }
    }

    pub fn error_messages(&self) -> &[ErrorMessage] {
        match self {
            Self::NoFiles { error_messages, .. } | Self::HasFiles { error_messages, .. } => {
                error_messages.as_slice()
            }
        }
    }

    pub fn search_input(&self) -> &str {
        match self {
            Self::NoFiles { search_input, .. } | Self::HasFiles { search_input, .. } => {
                search_input.as_str()
            }
        }
    }

    /// The listed files, empty for `NoFiles`.
    pub fn files(&self) -> &[FileRecord] {
        match self {
            Self::NoFiles { .. } => &[],
            Self::HasFiles { files, .. } => &**files,
        }
    }

    pub const fn has_files(&self) -> bool {
        matches!(self, Self::HasFiles { .. })
    }

    /// The only error the UI presents at a time.
    pub fn head_error(&self) -> Option<&ErrorMessage> {
        self.error_messages().first()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        match self {
            Self::NoFiles { .. } => false,
            Self::HasFiles { favorites, .. } => favorites.contains(id),
        }
    }

    /// Resolves a listed file so the host can open it.
    pub fn file_at(&self, path: &str) -> Option<&FileRecord> {
        self.files().iter().find(|f| f.path == path)
    }
}

//! Plain-text and JSON rendering of [`HomeUiState`].
//!
//! Each row mirrors a file card: favorite marker, name, modification date
//! and size. Only the head of the error queue is shown.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::home_state::HomeUiState;

const FAVORITE_MARK: char = '★';
const PLAIN_MARK: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub name: String,
    pub path: String,
    pub modified: String,
    pub size: String,
    pub favorite: bool,
}

/// Serializable, render-ready view of the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListView {
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
    /// `None` while nothing has ever been listed.
    pub files: Option<Vec<FileRow>>,
}

impl FileListView {
    pub fn from_state(state: &HomeUiState) -> Self {
        let files = state.has_files().then(|| {
            state
                .files()
                .iter()
                .map(|f| FileRow {
                    name: f.name.to_string(),
                    path: f.path.clone(),
                    modified: f.formatted_modified(),
                    size: f.human_size(),
                    favorite: state.is_favorite(f.id()),
                })
                .collect()
        });

        Self {
            search: state.search_input().to_string(),
            loading: state.is_loading(),
            error: state.head_error().map(|e| e.kind.to_string()),
            files,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if !self.search.is_empty() {
            let _ = writeln!(out, "Search: {}", self.search);
        }

        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {error}");
        }

        match &self.files {
            None if self.loading => out.push_str("Loading...\n"),
            None => out.push_str("No files\n"),
            Some(rows) if rows.is_empty() => out.push_str("No matching files\n"),
            Some(rows) => {
                let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
                for row in rows {
                    let mark = if row.favorite { FAVORITE_MARK } else { PLAIN_MARK };
                    let _ = writeln!(
                        out,
                        "{mark} {:<width$}  {}  {:>10}",
                        row.name, row.modified, row.size
                    );
                }
            }
        }

        out
    }
}

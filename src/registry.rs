//! Navigation shortcuts: folder history, folder bookmarks and the cached
//! favorite-file set.

mod bookmarks;
mod favorites;
mod history;

pub use bookmarks::Bookmarks;
pub use favorites::FavoriteRegistry;
pub use history::{HISTORY_CAPACITY, History};

use tracing::warn;

use crate::store::KeyValueStore;

const HISTORY_KEY: &str = "history";
const BOOKMARKS_KEY: &str = "bookmarks";

/// History and bookmarks, written through to a [`KeyValueStore`] on every
/// change.
pub struct PathRegistry {
    history: History,
    bookmarks: Bookmarks,
    store: Box<dyn KeyValueStore>,
}

impl PathRegistry {
    /// Load both lists from `store`. Unreadable lists start empty.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let history = store.load_list(HISTORY_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load folder history");
            Vec::new()
        });
        let bookmarks = store.load_list(BOOKMARKS_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load bookmarks");
            Vec::new()
        });

        Self {
            history: History::from_entries(history),
            bookmarks: bookmarks.into_iter().collect(),
            store,
        }
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    /// Record that `folder` was opened.
    pub fn visit(&mut self, folder: &str) {
        self.history.add(folder);
        self.persist(HISTORY_KEY, self.history.entries().to_vec());
    }

    pub fn add_bookmark(&mut self, folder: &str) {
        if self.bookmarks.add(folder) {
            self.persist(BOOKMARKS_KEY, self.bookmarks.to_vec());
        }
    }

    pub fn remove_bookmark(&mut self, folder: &str) {
        if self.bookmarks.remove(folder) {
            self.persist(BOOKMARKS_KEY, self.bookmarks.to_vec());
        }
    }

    // The in-memory change stands even when the write fails.
    fn persist(&self, key: &str, values: Vec<String>) {
        if let Err(e) = self.store.save_list(key, &values) {
            warn!(key, error = %e, "failed to persist list");
        }
    }
}

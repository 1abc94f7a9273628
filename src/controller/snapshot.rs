use crate::playback::PlaybackState;

/// Which files the list shows, before the search query applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    All,
    Favorites,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::Favorites,
            Self::Favorites => Self::All,
        }
    }
}

/// One visible row.
#[derive(Debug, Clone, PartialEq)]
pub struct FileView {
    pub path: String,
    pub name: String,
    pub duration_seconds: Option<f64>,
    pub selected: bool,
    /// Shown as playing. False for everything while a play request is pending.
    pub playing: bool,
    /// A toggle for this file is waiting on the backend.
    pub pending: bool,
    pub favorite: bool,
}

/// Read-only copy of the controller state for presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub folder: Option<String>,
    pub query: String,
    pub view: ViewMode,
    /// Visible files, in listing order.
    pub files: Vec<FileView>,
    /// Size of the whole listing.
    pub total: usize,
    pub selected: usize,
    pub playback: PlaybackState,
    pub now_playing: Option<String>,
    pub history: Vec<String>,
    pub bookmarks: Vec<String>,
    pub last_copy_target: Option<String>,
}

impl Snapshot {
    pub fn is_bookmarked(&self, folder: &str) -> bool {
        self.bookmarks.iter().any(|b| b == folder)
    }
}

use crate::audio::PlaybackEvent;

use super::snapshot::{Snapshot, ViewMode};

/// Everything the presentation layer can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    OpenFolder(String),
    /// Open the destination of the last successful copy, if any.
    OpenLastCopyTarget,
    SetQuery(String),
    SetView(ViewMode),
    ToggleSelected(String),
    /// Add every currently visible file to the selection.
    SelectVisible,
    ClearSelection,
    TogglePlayback(String),
    Rename { path: String, new_name: String },
    RenameSelected { prefix: String, suffix: String },
    CopySelected { destination: String },
    ToggleFavorite(String),
    RefreshFavorites,
    AddBookmark(String),
    RemoveBookmark(String),
    /// A notification from the backend.
    Event(PlaybackEvent),
}

/// What a command produced besides the new state.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Loaded { count: usize },
    Renamed { path: String },
    BatchRenamed { renamed: usize, failed: usize },
    Copied { count: usize, destination: String },
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub snapshot: Snapshot,
    pub report: Option<Report>,
}

use std::fmt;

use crate::backend::BackendError;

use super::inflight::OpKind;

/// The user-facing name of a backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenFolder,
    Play,
    Stop,
    Rename,
    Copy,
    LoadFavorites,
    AddFavorite,
    RemoveFavorite,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenFolder => "opening the folder",
            Self::Play => "playing",
            Self::Stop => "stopping",
            Self::Rename => "renaming",
            Self::Copy => "copying",
            Self::LoadFavorites => "loading favorites",
            Self::AddFavorite => "adding the favorite",
            Self::RemoveFavorite => "removing the favorite",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// A backend request was rejected. State is as it was before the attempt.
    #[error("{action} failed: {source}")]
    Backend {
        action: Action,
        #[source]
        source: BackendError,
    },
    /// The same operation on the same target has not resolved yet.
    #[error("{kind} already in progress for {target}")]
    Busy { kind: OpKind, target: String },
    #[error("{0} is not in the open folder")]
    UnknownFile(String),
    #[error("no files are selected")]
    NothingSelected,
}

impl ControlError {
    /// Busy rejections are expected during normal use and need no dialog.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}

//! The backend command surface.
//!
//! Everything that touches the filesystem or the audio device goes through
//! [`Backend`]. Each method is one request; the controller awaits it and
//! reconciles the result against its current state.
//!
//! Contract: `play` replaces whatever is playing (last request wins), so no
//! stop is sent before a play. A backend that cannot honour this needs an
//! explicit stop-before-play in its own `play`.

mod local;

#[cfg(test)]
pub(crate) mod fake;

pub use local::LocalBackend;

use crate::audio::PlayError;
use crate::library::AudioFile;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("directory {0} is not readable")]
    Unreadable(String),
    #[error("cannot play {path}: {source}")]
    Playback {
        path: String,
        #[source]
        source: PlayError,
    },
    #[error("audio output: {0}")]
    Audio(#[source] PlayError),
    #[error("{0} already exists")]
    NameCollision(String),
    #[error("invalid path {0}")]
    InvalidPath(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Rejected(String),
}

/// Requests the controller can make. All of them may suspend.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Ordered audio files directly in `directory`.
    async fn list_audio_files(&self, directory: &str) -> Result<Vec<AudioFile>, BackendError>;
    /// Start `path`, replacing any current playback.
    async fn play(&self, path: &str) -> Result<(), BackendError>;
    /// Stop playback. Succeeds when nothing is playing.
    async fn stop(&self) -> Result<(), BackendError>;
    /// Rename the file at `old_path` to the file name `new_name`; returns the
    /// resulting path, which may differ from a naive join.
    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, BackendError>;
    /// Copy every path into `destination`, all or nothing from our side.
    async fn copy(&self, paths: &[String], destination: &str) -> Result<(), BackendError>;
    async fn list_favorites(&self) -> Result<Vec<String>, BackendError>;
    async fn add_favorite(&self, path: &str) -> Result<(), BackendError>;
    /// Removing a path that is not a favorite succeeds.
    async fn remove_favorite(&self, path: &str) -> Result<(), BackendError>;
}

//! Commands, events and errors shared with the audio thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("cannot open file: {0}")]
    Open(#[source] std::io::Error),
    #[error("unsupported or corrupt audio: {0}")]
    Decode(#[source] rodio::decoder::DecoderError),
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("audio thread is not running")]
    Disconnected,
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace whatever is playing with `path`. The outcome is sent on `reply`.
    Play {
        path: PathBuf,
        id: String,
        reply: Sender<Result<(), PlayError>>,
    },
    /// Stop playback immediately. Stopping while idle is fine.
    Stop,
    /// The file behind `old` was renamed; completion reports `new` from now on.
    Rename { old: String, new: String },
    /// Stop and leave the thread loop.
    Quit,
}

/// Notifications emitted by the audio thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback of this path ran to its end.
    Finished(String),
}

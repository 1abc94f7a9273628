//! Audio output for the local backend.
//!
//! A dedicated thread owns the output stream and at most one sink. Commands
//! arrive over a channel; natural end of playback is reported back as a
//! [`PlaybackEvent`].

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{PlayError, PlaybackEvent};

#[cfg(test)]
mod tests;

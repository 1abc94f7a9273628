use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlayError, PlaybackEvent};

/// Handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Completion events arrive on the returned receiver.
    pub fn spawn() -> (Self, Receiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<PlaybackEvent>();

        let handle = spawn_audio_thread(rx, event_tx);

        let player = Self {
            tx,
            join: Mutex::new(Some(handle)),
        };
        (player, event_rx)
    }

    /// Start playing `path`, replacing the current sound. `id` is the identity
    /// reported back in [`PlaybackEvent::Finished`].
    pub fn play(&self, path: &Path, id: &str) -> Result<(), PlayError> {
        let (reply, outcome) = mpsc::channel();
        self.tx
            .send(AudioCmd::Play {
                path: path.to_path_buf(),
                id: id.to_string(),
                reply,
            })
            .map_err(|_| PlayError::Disconnected)?;
        outcome.recv().map_err(|_| PlayError::Disconnected)?
    }

    pub fn stop(&self) -> Result<(), PlayError> {
        self.tx
            .send(AudioCmd::Stop)
            .map_err(|_| PlayError::Disconnected)
    }

    /// Carry the playing sound's identity over to its new path.
    pub fn rename(&self, old: &str, new: &str) -> Result<(), PlayError> {
        self.tx
            .send(AudioCmd::Rename {
                old: old.to_string(),
                new: new.to_string(),
            })
            .map_err(|_| PlayError::Disconnected)
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

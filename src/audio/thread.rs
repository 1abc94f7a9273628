use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::create_sink;
use super::types::{AudioCmd, PlayError, PlaybackEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The one sink the thread owns, plus the identity it reports on completion.
#[derive(Default)]
pub(super) struct Slot {
    sink: Option<Sink>,
    current: Option<String>,
}

impl Slot {
    /// Replace whatever is playing. Last play request wins.
    pub(super) fn start(&mut self, sink: Sink, id: String) {
        self.stop();
        debug!(path = %id, "playback started");
        self.sink = Some(sink);
        self.current = Some(id);
    }

    pub(super) fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.current = None;
    }

    /// Report the playing sound under its new identity once it finishes.
    pub(super) fn rename(&mut self, old: &str, new: String) {
        if self.current.as_deref() == Some(old) {
            debug!(old, new = %new, "playing file renamed");
            self.current = Some(new);
        }
    }

    /// If the sink ran dry, release it and return the identity that finished.
    pub(super) fn take_finished(&mut self) -> Option<String> {
        let drained = self.sink.as_ref().is_some_and(|s| s.empty());
        if !drained {
            return None;
        }
        self.sink = None;
        self.current.take()
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<PlaybackEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Ok(stream)
            }
            Err(e) => {
                error!(error = %e, "failed to open audio output");
                Err(e.to_string())
            }
        };

        let mut slot = Slot::default();

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Play { path, id, reply }) => {
                    let result = match &stream {
                        Ok(stream) => create_sink(stream, &path),
                        Err(msg) => Err(PlayError::NoDevice(msg.clone())),
                    };
                    let result = result.map(|new_sink| slot.start(new_sink, id));
                    if reply.send(result).is_err() {
                        warn!("play requester went away before the reply");
                    }
                }
                Ok(AudioCmd::Stop) => slot.stop(),
                Ok(AudioCmd::Rename { old, new }) => slot.rename(&old, new),
                Ok(AudioCmd::Quit) => {
                    slot.stop();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(id) = slot.take_finished() {
                        debug!(path = %id, "playback finished");
                        if events.send(PlaybackEvent::Finished(id)).is_err() {
                            // Nobody listens anymore; keep serving commands.
                            debug!("playback event receiver dropped");
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

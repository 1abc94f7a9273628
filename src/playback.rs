//! Single-active-playback state machine.
//!
//! [`PlaybackController`] does no I/O. A toggle is split in two:
//! [`PlaybackController::begin_toggle`] decides which backend request to
//! make and hands out a [`Ticket`]; [`PlaybackController::finish`] applies
//! the outcome once the request resolved. Between the two, completion events
//! and renames may arrive; the ticket follows renames, and stale outcomes
//! are dropped by comparing issue order.

use std::collections::BTreeMap;

use tracing::debug;

/// What is playing right now, as far as the backend confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(String),
}

impl PlaybackState {
    pub fn playing(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Playing(path) => Some(path),
        }
    }

    pub fn is_playing(&self, path: &str) -> bool {
        self.playing() == Some(path)
    }
}

/// The backend request a toggle turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRequest {
    Play,
    Stop,
}

/// Identifies one in-flight toggle. Tickets are issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Pending {
    path: String,
    request: ToggleRequest,
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    pending: BTreeMap<Ticket, Pending>,
    next_ticket: u64,
    // Newest ticket whose outcome changed `state`.
    applied: Option<Ticket>,
}

impl PlaybackController {
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Start a toggle on `path`.
    ///
    /// Returns `None` while an earlier toggle on the same path is unresolved.
    pub fn begin_toggle(&mut self, path: &str) -> Option<(Ticket, ToggleRequest)> {
        if self.is_pending(path) {
            debug!(path, "toggle ignored, previous toggle still in flight");
            return None;
        }

        let request = if self.state.is_playing(path) {
            ToggleRequest::Stop
        } else {
            ToggleRequest::Play
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(
            ticket,
            Pending {
                path: path.to_string(),
                request,
            },
        );
        Some((ticket, request))
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// A failed request changes nothing. A successful one is applied unless a
    /// later-issued request already was. Returns the path the ticket ended
    /// up referring to.
    pub fn finish(&mut self, ticket: Ticket, succeeded: bool) -> Option<String> {
        let Pending { path, request } = self.pending.remove(&ticket)?;

        if !succeeded {
            return Some(path);
        }
        if self.applied.is_some_and(|newest| newest > ticket) {
            debug!(path = %path, ?request, "stale toggle outcome dropped");
            return Some(path);
        }

        self.applied = Some(ticket);
        self.state = match request {
            ToggleRequest::Play => PlaybackState::Playing(path.clone()),
            // The backend has one output; a stop silences it whatever it played.
            ToggleRequest::Stop => PlaybackState::Idle,
        };
        debug!(state = ?self.state, "playback state changed");
        Some(path)
    }

    /// Backend reported that `path` played to its end.
    ///
    /// Only acts when `path` is what we believe is playing. Returns whether
    /// the state changed.
    pub fn on_finished(&mut self, path: &str) -> bool {
        if self.state.is_playing(path) {
            self.state = PlaybackState::Idle;
            true
        } else {
            false
        }
    }

    /// Follow a confirmed rename in the state and in pending toggles.
    pub fn remap(&mut self, old: &str, new: &str) {
        if self.state.is_playing(old) {
            self.state = PlaybackState::Playing(new.to_string());
        }
        for pending in self.pending.values_mut() {
            if pending.path == old {
                pending.path = new.to_string();
            }
        }
    }

    pub fn is_pending(&self, path: &str) -> bool {
        self.pending.values().any(|p| p.path == path)
    }

    /// The path to present as playing.
    ///
    /// While a play request is in flight nothing is shown as playing: the
    /// backend is about to replace the current sound.
    pub fn displayed(&self) -> Option<&str> {
        let play_pending = self
            .pending
            .values()
            .any(|p| p.request == ToggleRequest::Play);
        if play_pending {
            None
        } else {
            self.state.playing()
        }
    }
}

//! The controller: one explicit state object for the open folder, the
//! selection, playback, search and the navigation registries.
//!
//! All mutation goes through [`Controller`] methods or
//! [`Controller::dispatch`]. The presentation layer only ever reads
//! [`Snapshot`]s.

mod command;
mod error;
mod inflight;
mod model;
mod snapshot;

pub use command::{Command, Outcome, Report};
pub use error::{Action, ControlError};
pub use inflight::OpKind;
pub use model::Controller;
pub use snapshot::{FileView, Snapshot, ViewMode};

#[cfg(test)]
mod tests;

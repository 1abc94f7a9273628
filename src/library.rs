//! Library module: the open folder's listing and the selection over it.
//!
//! `model` holds the [`AudioFile`] record, `listing` the in-memory
//! [`AudioLibrary`] (listing, selection set and rename remapping) and `scan`
//! the directory walk used by the local backend.

mod listing;
mod model;
mod scan;

pub use listing::AudioLibrary;
pub use model::AudioFile;
pub use scan::scan;

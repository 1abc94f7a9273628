//! Terminal-side state: the latest controller snapshot, the cursor and the
//! current input mode.

mod model;

pub use model::*;

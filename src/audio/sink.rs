//! Open and decode a file into a playing `rodio` sink.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use super::types::PlayError;

/// Create a `Sink` on `handle` that is already playing `path`.
pub(super) fn create_sink(handle: &OutputStream, path: &Path) -> Result<Sink, PlayError> {
    let file = File::open(path).map_err(PlayError::Open)?;
    let source = Decoder::new(BufReader::new(file)).map_err(PlayError::Decode)?;

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.play();
    Ok(sink)
}

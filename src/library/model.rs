/// One audio file in the open folder.
///
/// `path` is the identity key. It changes on rename and is always the value
/// the backend reported, never one built on this side.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub path: String,
    pub name: String,
    pub duration_seconds: Option<f64>,
}

impl AudioFile {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            duration_seconds: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds.max(0.0));
        self
    }
}

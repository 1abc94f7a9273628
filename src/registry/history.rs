/// Number of folders kept in the history.
pub const HISTORY_CAPACITY: usize = 10;

/// Recently opened folders, most recent first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    /// Rebuild from persisted entries, dropping duplicates and overflow.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut history = Self::default();
        for entry in entries.into_iter().rev() {
            history.add(&entry);
        }
        history
    }

    /// Move `path` to the front, then cap the list.
    pub fn add(&mut self, path: &str) {
        self.entries.retain(|p| p != path);
        self.entries.insert(0, path.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }
}

use std::collections::BTreeSet;

/// Bookmarked folders. Adding and removing are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bookmarks {
    paths: BTreeSet<String>,
}

impl Bookmarks {
    /// Returns true if `path` was not bookmarked before.
    pub fn add(&mut self, path: &str) -> bool {
        self.paths.insert(path.to_string())
    }

    /// Returns true if `path` was bookmarked before.
    pub fn remove(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.paths.iter().cloned().collect()
    }
}

impl FromIterator<String> for Bookmarks {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

use std::collections::BTreeSet;

/// Local mirror of the backend's favorite files.
///
/// Only ever changed after the backend confirmed the matching mutation, so
/// it never holds something the backend refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteRegistry {
    paths: BTreeSet<String>,
}

impl FavoriteRegistry {
    /// Replace the cache with the backend's authoritative list.
    pub fn replace(&mut self, paths: Vec<String>) {
        self.paths = paths.into_iter().collect();
    }

    pub fn insert(&mut self, path: &str) {
        self.paths.insert(path.to_string());
    }

    pub fn remove(&mut self, path: &str) {
        self.paths.remove(path);
    }

    /// Follow a confirmed rename.
    pub fn remap(&mut self, old: &str, new: &str) {
        if self.paths.remove(old) {
            self.paths.insert(new.to_string());
        }
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
}

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use super::model::AudioFile;

/// The listing of the open folder plus the set of selected paths.
///
/// Every lookup goes through `path`. Positions in a filtered view never
/// index into `files`.
#[derive(Debug, Default)]
pub struct AudioLibrary {
    folder: Option<String>,
    files: Vec<AudioFile>,
    selected: BTreeSet<String>,
}

impl AudioLibrary {
    /// Replace the listing wholesale with the result of a folder load.
    ///
    /// The selection is left alone: paths selected in a previous folder stay
    /// selected until cleared.
    pub fn replace(&mut self, folder: String, files: Vec<AudioFile>) {
        let mut seen: HashSet<String> = HashSet::with_capacity(files.len());
        let mut unique = Vec::with_capacity(files.len());
        for file in files {
            if seen.insert(file.path.clone()) {
                unique.push(file);
            } else {
                warn!(path = %file.path, "duplicate path in listing, keeping first");
            }
        }

        debug!(folder = %folder, count = unique.len(), "listing replaced");
        self.folder = Some(folder);
        self.files = unique;
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn files(&self) -> &[AudioFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&AudioFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.contains(path)
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Copy of the selected paths, taken at call time.
    pub fn selected_paths(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    /// Flip selection of `path`. Returns whether it is selected afterward.
    ///
    /// A path outside the listing can only be deselected.
    pub fn toggle_selected(&mut self, path: &str) -> bool {
        if self.selected.remove(path) {
            return false;
        }
        if !self.contains(path) {
            return false;
        }
        self.selected.insert(path.to_string());
        true
    }

    /// Add every listed path in `paths` to the selection.
    pub fn select_all<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for path in paths {
            if self.contains(path) {
                self.selected.insert(path.to_string());
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Apply a rename the backend confirmed: `old` is now `new` with display
    /// name `name`.
    ///
    /// The listing entry (if still present) and the selection are updated in
    /// one step. Returns true if the listing held `old`.
    pub fn apply_rename(&mut self, old: &str, new: &str, name: &str) -> bool {
        if old != new {
            // The backend may have replaced a file that already had this path.
            self.files.retain(|f| f.path != new);
        }

        let found = match self.files.iter_mut().find(|f| f.path == old) {
            Some(file) => {
                file.path = new.to_string();
                file.name = name.to_string();
                true
            }
            None => false,
        };

        if self.selected.remove(old) {
            self.selected.insert(new.to_string());
        }

        found
    }
}

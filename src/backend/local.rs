use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};

use crate::audio::{AudioPlayer, PlaybackEvent};
use crate::config::LibrarySettings;
use crate::library::{AudioFile, scan};
use crate::store::{KeyValueStore, TomlFileStore};

use super::{Backend, BackendError};

const FAVORITES_FILE: &str = "favorites.toml";
const FAVORITES_KEY: &str = "files";

/// Backend working on the local filesystem and the default audio device.
pub struct LocalBackend {
    player: AudioPlayer,
    library: LibrarySettings,
    favorites: FavoriteFile,
}

impl LocalBackend {
    /// Start the audio thread. Completion events arrive on the returned receiver.
    pub fn new(library: LibrarySettings, data_dir: &Path) -> (Self, Receiver<PlaybackEvent>) {
        let (player, events) = AudioPlayer::spawn();
        let backend = Self {
            player,
            library,
            favorites: FavoriteFile::new(data_dir.join(FAVORITES_FILE)),
        };
        (backend, events)
    }

    /// Stop playback and join the audio thread.
    pub fn shutdown(&self) {
        self.player.shutdown();
    }
}

impl Backend for LocalBackend {
    async fn list_audio_files(&self, directory: &str) -> Result<Vec<AudioFile>, BackendError> {
        list_directory(Path::new(directory), &self.library)
    }

    async fn play(&self, path: &str) -> Result<(), BackendError> {
        self.player
            .play(Path::new(path), path)
            .map_err(|source| BackendError::Playback {
                path: path.to_string(),
                source,
            })
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.player.stop().map_err(BackendError::Audio)
    }

    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, BackendError> {
        let new_path = rename_file(Path::new(old_path), new_name)?;
        let new_path = new_path.to_string_lossy().into_owned();

        // Favorites follow the file. The rename already happened, so a failure
        // here only costs the favorite flag.
        if let Err(e) = self.favorites.remap(old_path, &new_path) {
            warn!(error = %e, old = old_path, new = %new_path, "failed to move favorite");
        }
        if let Err(e) = self.player.rename(old_path, &new_path) {
            warn!(error = %e, old = old_path, new = %new_path, "failed to retarget playback");
        }
        Ok(new_path)
    }

    async fn copy(&self, paths: &[String], destination: &str) -> Result<(), BackendError> {
        copy_files(paths, Path::new(destination))
    }

    async fn list_favorites(&self) -> Result<Vec<String>, BackendError> {
        self.favorites.list()
    }

    async fn add_favorite(&self, path: &str) -> Result<(), BackendError> {
        if !Path::new(path).is_file() {
            return Err(BackendError::InvalidPath(path.to_string()));
        }
        self.favorites.add(path)
    }

    async fn remove_favorite(&self, path: &str) -> Result<(), BackendError> {
        self.favorites.remove(path)
    }
}

fn list_directory(dir: &Path, settings: &LibrarySettings) -> Result<Vec<AudioFile>, BackendError> {
    if !dir.is_dir() {
        return Err(BackendError::Unreadable(dir.display().to_string()));
    }
    // Fail early on permission problems instead of returning an empty listing.
    fs::read_dir(dir).map_err(|source| BackendError::Io {
        context: format!("reading {}", dir.display()),
        source,
    })?;

    let files = scan(dir, settings);
    debug!(dir = %dir.display(), count = files.len(), "listed audio files");
    Ok(files)
}

fn rename_file(old: &Path, new_name: &str) -> Result<PathBuf, BackendError> {
    let new_name = new_name.trim();
    if new_name.is_empty()
        || new_name == "."
        || new_name == ".."
        || new_name.contains(['/', '\\'])
    {
        return Err(BackendError::InvalidPath(new_name.to_string()));
    }
    let parent = old
        .parent()
        .ok_or_else(|| BackendError::InvalidPath(old.display().to_string()))?;
    let new_path = parent.join(new_name);

    if new_path != old && new_path.exists() && !same_file(old, &new_path) {
        return Err(BackendError::NameCollision(new_path.display().to_string()));
    }

    fs::rename(old, &new_path).map_err(|source| BackendError::Io {
        context: format!("renaming {}", old.display()),
        source,
    })?;
    info!(from = %old.display(), to = %new_path.display(), "renamed");
    Ok(new_path)
}

// Case-only renames on case-insensitive filesystems see the target as existing.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn copy_files(paths: &[String], destination: &Path) -> Result<(), BackendError> {
    fs::create_dir_all(destination).map_err(|source| BackendError::Io {
        context: format!("creating {}", destination.display()),
        source,
    })?;

    for path in paths {
        let src = Path::new(path);
        let file_name = src
            .file_name()
            .ok_or_else(|| BackendError::InvalidPath(path.clone()))?;
        let dest = destination.join(file_name);

        fs::copy(src, &dest).map_err(|source| BackendError::Io {
            context: format!("copying {path}"),
            source,
        })?;
    }
    info!(count = paths.len(), dest = %destination.display(), "copied files");
    Ok(())
}

/// The authoritative favorite set, kept in a TOML file.
struct FavoriteFile {
    store: TomlFileStore,
}

impl FavoriteFile {
    fn new(path: PathBuf) -> Self {
        Self {
            store: TomlFileStore::new(path),
        }
    }

    fn list(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.store.load_list(FAVORITES_KEY)?)
    }

    fn add(&self, path: &str) -> Result<(), BackendError> {
        let mut paths = self.list()?;
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
            self.store.save_list(FAVORITES_KEY, &paths)?;
        }
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), BackendError> {
        let mut paths = self.list()?;
        let before = paths.len();
        paths.retain(|p| p != path);
        if paths.len() != before {
            self.store.save_list(FAVORITES_KEY, &paths)?;
        }
        Ok(())
    }

    fn remap(&self, old: &str, new: &str) -> Result<(), BackendError> {
        let mut paths = self.list()?;
        let Some(pos) = paths.iter().position(|p| p == old) else {
            return Ok(());
        };
        paths[pos] = new.to_string();
        self.store.save_list(FAVORITES_KEY, &paths)?;
        Ok(())
    }
}

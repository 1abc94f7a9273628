use std::cell::RefCell;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::audio::PlaybackEvent;
use crate::backend::{Backend, BackendError};
use crate::batch::{BatchReport, batch_name};
use crate::library::{AudioFile, AudioLibrary};
use crate::playback::{PlaybackController, ToggleRequest};
use crate::registry::{FavoriteRegistry, PathRegistry};
use crate::search::SearchMatcher;
use crate::store::KeyValueStore;

use super::command::{Command, Outcome, Report};
use super::error::{Action, ControlError};
use super::inflight::{InFlight, OpKind};
use super::snapshot::{FileView, Snapshot, ViewMode};

struct PadState {
    library: AudioLibrary,
    matcher: SearchMatcher,
    view: ViewMode,
    playback: PlaybackController,
    favorites: FavoriteRegistry,
    paths: PathRegistry,
    last_copy_target: Option<String>,
}

impl PadState {
    fn is_visible(&self, file: &AudioFile) -> bool {
        let in_view = match self.view {
            ViewMode::All => true,
            ViewMode::Favorites => self.favorites.contains(&file.path),
        };
        in_view && self.matcher.matches(&file.name)
    }

    fn visible(&self) -> impl Iterator<Item = &AudioFile> {
        self.library.files().iter().filter(|f| self.is_visible(f))
    }
}

/// Owns all client-side state and talks to the backend.
///
/// Methods take `&self`: several requests may be awaited at once on one
/// thread. State is never borrowed across an `.await`, and every resolution
/// checks identities against the state as it is *then*.
pub struct Controller<B> {
    backend: B,
    state: RefCell<PadState>,
    in_flight: InFlight,
}

fn backend_error(action: Action, source: BackendError) -> ControlError {
    error!(%action, error = %source, "backend request failed");
    ControlError::Backend { action, source }
}

impl<B: Backend> Controller<B> {
    /// Create a controller with history and bookmarks loaded from `store`.
    pub fn new(backend: B, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            state: RefCell::new(PadState {
                library: AudioLibrary::default(),
                matcher: SearchMatcher::default(),
                view: ViewMode::default(),
                playback: PlaybackController::default(),
                favorites: FavoriteRegistry::default(),
                paths: PathRegistry::load(store),
                last_copy_target: None,
            }),
            in_flight: InFlight::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply `command` and return the resulting state.
    pub async fn dispatch(&self, command: Command) -> Result<Outcome, ControlError> {
        let report = match command {
            Command::OpenFolder(folder) => {
                let count = self.open_folder(&folder).await?;
                Some(Report::Loaded { count })
            }
            Command::OpenLastCopyTarget => {
                let target = self.state.borrow().last_copy_target.clone();
                match target {
                    Some(folder) => {
                        let count = self.open_folder(&folder).await?;
                        Some(Report::Loaded { count })
                    }
                    None => None,
                }
            }
            Command::SetQuery(query) => {
                self.set_query(&query);
                None
            }
            Command::SetView(view) => {
                self.state.borrow_mut().view = view;
                None
            }
            Command::ToggleSelected(path) => {
                self.state.borrow_mut().library.toggle_selected(&path);
                None
            }
            Command::SelectVisible => {
                self.select_visible();
                None
            }
            Command::ClearSelection => {
                self.state.borrow_mut().library.clear_selection();
                None
            }
            Command::TogglePlayback(path) => {
                self.toggle(&path).await?;
                None
            }
            Command::Rename { path, new_name } => {
                let path = self.rename(&path, &new_name).await?;
                Some(Report::Renamed { path })
            }
            Command::RenameSelected { prefix, suffix } => {
                let BatchReport { renamed, failed } = self.rename_selected(&prefix, &suffix).await;
                Some(Report::BatchRenamed { renamed, failed })
            }
            Command::CopySelected { destination } => {
                let count = self.copy_selected(&destination).await?;
                Some(Report::Copied { count, destination })
            }
            Command::ToggleFavorite(path) => {
                self.toggle_favorite(&path).await?;
                None
            }
            Command::RefreshFavorites => {
                self.refresh_favorites().await?;
                None
            }
            Command::AddBookmark(folder) => {
                self.state.borrow_mut().paths.add_bookmark(&folder);
                None
            }
            Command::RemoveBookmark(folder) => {
                self.state.borrow_mut().paths.remove_bookmark(&folder);
                None
            }
            Command::Event(event) => {
                self.handle_event(event);
                None
            }
        };

        Ok(Outcome {
            snapshot: self.snapshot(),
            report,
        })
    }

    /// Load the listing of `folder`, replacing the current one on success.
    ///
    /// On failure the previous listing stays. Selection and playback are not
    /// touched either way.
    pub async fn open_folder(&self, folder: &str) -> Result<usize, ControlError> {
        let _guard = self.in_flight.claim(OpKind::Load, folder)?;

        let files = self
            .backend
            .list_audio_files(folder)
            .await
            .map_err(|e| backend_error(Action::OpenFolder, e))?;
        let count = files.len();

        {
            let mut st = self.state.borrow_mut();
            st.library.replace(folder.to_string(), files);
            st.paths.visit(folder);
        }
        info!(folder, count, "folder opened");

        if let Err(e) = self.refresh_favorites().await {
            warn!(error = %e, "keeping previous favorites");
        }
        Ok(count)
    }

    /// Recompile the matcher if the query text changed.
    pub fn set_query(&self, query: &str) {
        let mut st = self.state.borrow_mut();
        if st.matcher.query() != query {
            st.matcher = SearchMatcher::compile(query);
        }
    }

    pub fn select_visible(&self) {
        let mut st = self.state.borrow_mut();
        let visible: Vec<String> = st.visible().map(|f| f.path.clone()).collect();
        st.library.select_all(visible.iter().map(String::as_str));
    }

    /// Play `path`, or stop it if it is what is playing.
    pub async fn toggle(&self, path: &str) -> Result<(), ControlError> {
        let (ticket, request) = {
            let mut st = self.state.borrow_mut();
            if !st.library.contains(path) && !st.playback.state().is_playing(path) {
                return Err(ControlError::UnknownFile(path.to_string()));
            }
            st.playback
                .begin_toggle(path)
                .ok_or_else(|| ControlError::Busy {
                    kind: OpKind::Playback,
                    target: path.to_string(),
                })?
        };

        let (action, result) = match request {
            ToggleRequest::Play => (Action::Play, self.backend.play(path).await),
            ToggleRequest::Stop => (Action::Stop, self.backend.stop().await),
        };

        self.state
            .borrow_mut()
            .playback
            .finish(ticket, result.is_ok());
        result.map_err(|e| backend_error(action, e))
    }

    /// Apply a backend notification.
    pub fn handle_event(&self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Finished(path) => {
                if self.state.borrow_mut().playback.on_finished(&path) {
                    debug!(path = %path, "playback finished");
                } else {
                    debug!(path = %path, "stale completion event ignored");
                }
            }
        }
    }

    /// Rename the file at `path` to `new_name`.
    ///
    /// On success the listing entry, the selection, playback and favorites
    /// all move to the path the backend returned.
    pub async fn rename(&self, path: &str, new_name: &str) -> Result<String, ControlError> {
        if !self.state.borrow().library.contains(path) {
            return Err(ControlError::UnknownFile(path.to_string()));
        }
        let _guard = self.in_flight.claim(OpKind::Rename, path)?;

        let new_path = self
            .backend
            .rename(path, new_name)
            .await
            .map_err(|e| backend_error(Action::Rename, e))?;

        let name = Path::new(&new_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| new_name.to_string());

        let mut st = self.state.borrow_mut();
        if !st.library.apply_rename(path, &new_path, &name) {
            debug!(old = path, "renamed file left the listing while in flight");
        }
        st.playback.remap(path, &new_path);
        st.favorites.remap(path, &new_path);
        info!(old = path, new = %new_path, "renamed");
        Ok(new_path)
    }

    /// Rename every selected file to `prefix + base + suffix + .ext`, one at a
    /// time. Failures are logged and counted; the rest carry on.
    pub async fn rename_selected(&self, prefix: &str, suffix: &str) -> BatchReport {
        let mut report = BatchReport::default();

        let targets: Vec<(String, Option<String>)> = {
            let st = self.state.borrow();
            st.library
                .selected_paths()
                .into_iter()
                .map(|path| {
                    let name = st.library.get(&path).map(|f| f.name.clone());
                    (path, name)
                })
                .collect()
        };

        for (path, name) in targets {
            let Some(name) = name else {
                warn!(path = %path, "selected file is not in the open folder, skipped");
                report.failed += 1;
                continue;
            };
            let new_name = batch_name(prefix, &name, suffix);
            match self.rename(&path, &new_name).await {
                Ok(_) => report.renamed += 1,
                Err(e) => {
                    warn!(path = %path, new_name = %new_name, error = %e, "batch rename item failed");
                    report.failed += 1;
                }
            }
        }

        info!(renamed = report.renamed, failed = report.failed, "batch rename done");
        report
    }

    /// Copy the selection into `destination`. Returns how many were copied.
    pub async fn copy_selected(&self, destination: &str) -> Result<usize, ControlError> {
        let paths = self.state.borrow().library.selected_paths();
        if paths.is_empty() {
            return Err(ControlError::NothingSelected);
        }
        let _guard = self.in_flight.claim(OpKind::Copy, destination)?;

        self.backend
            .copy(&paths, destination)
            .await
            .map_err(|e| backend_error(Action::Copy, e))?;

        self.state.borrow_mut().last_copy_target = Some(destination.to_string());
        info!(count = paths.len(), destination, "copied selection");
        Ok(paths.len())
    }

    /// Replace the favorite cache with the backend's list.
    pub async fn refresh_favorites(&self) -> Result<(), ControlError> {
        let paths = self
            .backend
            .list_favorites()
            .await
            .map_err(|e| backend_error(Action::LoadFavorites, e))?;
        self.state.borrow_mut().favorites.replace(paths);
        Ok(())
    }

    pub async fn add_favorite(&self, path: &str) -> Result<(), ControlError> {
        let _guard = self.in_flight.claim(OpKind::Favorite, path)?;
        self.backend
            .add_favorite(path)
            .await
            .map_err(|e| backend_error(Action::AddFavorite, e))?;
        self.state.borrow_mut().favorites.insert(path);
        Ok(())
    }

    pub async fn remove_favorite(&self, path: &str) -> Result<(), ControlError> {
        let _guard = self.in_flight.claim(OpKind::Favorite, path)?;
        self.backend
            .remove_favorite(path)
            .await
            .map_err(|e| backend_error(Action::RemoveFavorite, e))?;
        self.state.borrow_mut().favorites.remove(path);
        Ok(())
    }

    pub async fn toggle_favorite(&self, path: &str) -> Result<(), ControlError> {
        let is_favorite = self.state.borrow().favorites.contains(path);
        if is_favorite {
            self.remove_favorite(path).await
        } else {
            self.add_favorite(path).await
        }
    }

    /// Most recently opened folder, if any.
    pub fn last_folder(&self) -> Option<String> {
        self.state.borrow().paths.history().first().cloned()
    }

    pub fn snapshot(&self) -> Snapshot {
        let st = self.state.borrow();
        let now_playing = st.playback.displayed().map(str::to_string);

        let files = st
            .visible()
            .map(|f| FileView {
                path: f.path.clone(),
                name: f.name.clone(),
                duration_seconds: f.duration_seconds,
                selected: st.library.is_selected(&f.path),
                playing: now_playing.as_deref() == Some(f.path.as_str()),
                pending: st.playback.is_pending(&f.path),
                favorite: st.favorites.contains(&f.path),
            })
            .collect();

        Snapshot {
            folder: st.library.folder().map(str::to_string),
            query: st.matcher.query().to_string(),
            view: st.view,
            files,
            total: st.library.len(),
            selected: st.library.selection().len(),
            playback: st.playback.state().clone(),
            now_playing,
            history: st.paths.history().to_vec(),
            bookmarks: st.paths.bookmarks().to_vec(),
            last_copy_target: st.last_copy_target.clone(),
        }
    }

    #[cfg(test)]
    pub(super) fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}

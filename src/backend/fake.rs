//! In-memory backend for controller tests.
//!
//! Records every request, can be told to fail an operation, and can hold an
//! operation pending behind a [`Gate`] so tests can interleave events and
//! commands while a request is in flight.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use tokio::sync::watch;

use crate::library::AudioFile;

use super::{Backend, BackendError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Play,
    Stop,
    Rename,
    Copy,
    ListFavorites,
    AddFavorite,
    RemoveFavorite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(String),
    Play(String),
    Stop,
    Rename(String, String),
    Copy(Vec<String>, String),
    ListFavorites,
    AddFavorite(String),
    RemoveFavorite(String),
}

/// Holds calls of one operation pending until opened.
#[derive(Clone)]
pub struct Gate(Rc<watch::Sender<bool>>);

impl Default for Gate {
    fn default() -> Self {
        Self(Rc::new(watch::channel(false).0))
    }
}

impl Gate {
    pub fn open(&self) {
        self.0.send_replace(true);
    }

    async fn wait(&self) {
        let mut rx = self.0.subscribe();
        // The sender lives as long as this gate, so waiting cannot fail.
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[derive(Default)]
pub struct FakeBackend {
    folders: RefCell<HashMap<String, Vec<AudioFile>>>,
    favorites: RefCell<BTreeSet<String>>,
    calls: RefCell<Vec<Call>>,
    failing: RefCell<HashSet<Op>>,
    gates: RefCell<HashMap<Op, Gate>>,
}

impl FakeBackend {
    /// Register a folder whose listing holds `names`.
    pub fn with_folder(self, folder: &str, names: &[&str]) -> Self {
        let files = names
            .iter()
            .map(|n| AudioFile::new(format!("{folder}/{n}"), *n))
            .collect();
        self.folders.borrow_mut().insert(folder.to_string(), files);
        self
    }

    pub fn with_favorites(self, paths: &[&str]) -> Self {
        self.favorites
            .borrow_mut()
            .extend(paths.iter().map(|p| p.to_string()));
        self
    }

    pub fn fail(&self, op: Op) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn succeed(&self, op: Op) {
        self.failing.borrow_mut().remove(&op);
    }

    /// Hold every later call of `op` until the returned gate opens.
    pub fn hold(&self, op: Op) -> Gate {
        let gate = Gate::default();
        self.gates.borrow_mut().insert(op, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn favorites(&self) -> Vec<String> {
        self.favorites.borrow().iter().cloned().collect()
    }

    async fn enter(&self, op: Op, call: Call) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(call);
        let gate = self.gates.borrow().get(&op).cloned();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        if self.failing.borrow().contains(&op) {
            return Err(BackendError::Rejected(format!("{op:?} refused")));
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    async fn list_audio_files(&self, directory: &str) -> Result<Vec<AudioFile>, BackendError> {
        self.enter(Op::List, Call::List(directory.to_string()))
            .await?;
        self.folders
            .borrow()
            .get(directory)
            .cloned()
            .ok_or_else(|| BackendError::Unreadable(directory.to_string()))
    }

    async fn play(&self, path: &str) -> Result<(), BackendError> {
        self.enter(Op::Play, Call::Play(path.to_string())).await
    }

    async fn stop(&self) -> Result<(), BackendError> {
        self.enter(Op::Stop, Call::Stop).await
    }

    /// Joins the new name onto the old parent and, like some real backends,
    /// keeps the old extension when the new name has none.
    async fn rename(&self, old_path: &str, new_name: &str) -> Result<String, BackendError> {
        self.enter(
            Op::Rename,
            Call::Rename(old_path.to_string(), new_name.to_string()),
        )
        .await?;

        let (parent, old_name) = old_path.rsplit_once('/').unwrap_or(("", old_path));
        let mut new_path = format!("{parent}/{new_name}");
        if !new_name.contains('.') {
            if let Some((_, ext)) = old_name.rsplit_once('.') {
                new_path = format!("{new_path}.{ext}");
            }
        }

        let mut favorites = self.favorites.borrow_mut();
        if favorites.remove(old_path) {
            favorites.insert(new_path.clone());
        }
        Ok(new_path)
    }

    async fn copy(&self, paths: &[String], destination: &str) -> Result<(), BackendError> {
        self.enter(
            Op::Copy,
            Call::Copy(paths.to_vec(), destination.to_string()),
        )
        .await
    }

    async fn list_favorites(&self) -> Result<Vec<String>, BackendError> {
        self.enter(Op::ListFavorites, Call::ListFavorites).await?;
        Ok(self.favorites())
    }

    async fn add_favorite(&self, path: &str) -> Result<(), BackendError> {
        self.enter(Op::AddFavorite, Call::AddFavorite(path.to_string()))
            .await?;
        self.favorites.borrow_mut().insert(path.to_string());
        Ok(())
    }

    async fn remove_favorite(&self, path: &str) -> Result<(), BackendError> {
        self.enter(Op::RemoveFavorite, Call::RemoveFavorite(path.to_string()))
            .await?;
        self.favorites.borrow_mut().remove(path);
        Ok(())
    }
}

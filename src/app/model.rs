//! Presentation state: the latest controller snapshot plus what only the
//! terminal cares about (cursor, input mode, status message).
//!
//! Nothing here mutates pad state. Key handlers turn user input into
//! controller commands and feed the resulting snapshot back through
//! [`App::apply`].

use crate::controller::{FileView, Outcome, Report, Snapshot};

/// What a text prompt is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    OpenFolder,
    Rename { path: String },
    BatchPrefix,
    BatchSuffix { prefix: String },
    CopyDestination,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Search => " search (/re/flags, glob or text) ",
            Self::OpenFolder => " open folder ",
            Self::Rename { .. } => " rename ",
            Self::BatchPrefix => " batch rename: prefix ",
            Self::BatchSuffix { .. } => " batch rename: suffix ",
            Self::CopyDestination => " copy selection to ",
        }
    }
}

/// How a prompt or picker was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Chosen(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// One entry of the places overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub path: String,
    pub bookmarked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Prompt(Prompt),
    Places { cursor: usize },
    /// Blocking message; any key dismisses it.
    Notice(String),
}

#[derive(Debug, Default)]
pub struct App {
    pub snapshot: Snapshot,
    pub mode: Mode,
    /// One-line feedback shown in the status box.
    pub message: Option<String>,
    cursor: usize,
    // Path under the cursor, so the cursor follows its file across renames
    // and filter changes.
    cursor_path: Option<String>,
}

impl App {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut app = Self::default();
        app.replace_snapshot(snapshot);
        app
    }

    /// Take a command result: new snapshot plus a report line, if any.
    pub fn apply(&mut self, outcome: Outcome) {
        if let Some(report) = &outcome.report {
            self.message = Some(describe(report));
        }
        self.replace_snapshot(outcome.snapshot);
    }

    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        let files = &self.snapshot.files;

        let found = self
            .cursor_path
            .as_deref()
            .and_then(|p| files.iter().position(|f| f.path == p));
        self.cursor = match found {
            Some(pos) => pos,
            None => self.cursor.min(files.len().saturating_sub(1)),
        };
        self.sync_cursor_path();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The file under the cursor.
    pub fn current(&self) -> Option<&FileView> {
        self.snapshot.files.get(self.cursor)
    }

    pub fn current_path(&self) -> Option<String> {
        self.current().map(|f| f.path.clone())
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.snapshot.files.len() {
            self.cursor += 1;
        }
        self.sync_cursor_path();
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.sync_cursor_path();
    }

    pub fn first(&mut self) {
        self.cursor = 0;
        self.sync_cursor_path();
    }

    pub fn last(&mut self) {
        self.cursor = self.snapshot.files.len().saturating_sub(1);
        self.sync_cursor_path();
    }

    fn sync_cursor_path(&mut self) {
        self.cursor_path = self.current().map(|f| f.path.clone());
    }

    pub fn begin_prompt(&mut self, kind: PromptKind, initial: impl Into<String>) {
        self.mode = Mode::Prompt(Prompt {
            kind,
            input: initial.into(),
        });
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        match &self.mode {
            Mode::Prompt(p) => Some(p),
            _ => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Mode::Prompt(p) = &mut self.mode {
            p.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Mode::Prompt(p) = &mut self.mode {
            p.input.pop();
        }
    }

    /// Close the prompt. Returns its kind and how it ended.
    pub fn finish_prompt(&mut self, confirmed: bool) -> Option<(PromptKind, PickOutcome)> {
        let Mode::Prompt(prompt) = std::mem::take(&mut self.mode) else {
            return None;
        };
        let outcome = if confirmed {
            PickOutcome::Chosen(prompt.input)
        } else {
            PickOutcome::Cancelled
        };
        Some((prompt.kind, outcome))
    }

    /// Bookmarks first, then history entries not already bookmarked.
    pub fn places(&self) -> Vec<Place> {
        let mut places: Vec<Place> = self
            .snapshot
            .bookmarks
            .iter()
            .map(|b| Place {
                path: b.clone(),
                bookmarked: true,
            })
            .collect();
        for h in &self.snapshot.history {
            if !self.snapshot.is_bookmarked(h) {
                places.push(Place {
                    path: h.clone(),
                    bookmarked: false,
                });
            }
        }
        places
    }

    pub fn open_places(&mut self) {
        self.mode = Mode::Places { cursor: 0 };
    }

    pub fn move_places(&mut self, down: bool) {
        let len = self.places().len();
        if let Mode::Places { cursor } = &mut self.mode {
            *cursor = if down {
                (*cursor + 1).min(len.saturating_sub(1))
            } else {
                cursor.saturating_sub(1)
            };
        }
    }

    /// Close the places overlay.
    pub fn finish_places(&mut self, confirmed: bool) -> PickOutcome {
        let Mode::Places { cursor } = std::mem::take(&mut self.mode) else {
            return PickOutcome::Cancelled;
        };
        match self.places().into_iter().nth(cursor) {
            Some(place) if confirmed => PickOutcome::Chosen(place.path),
            _ => PickOutcome::Cancelled,
        }
    }

    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.mode = Mode::Notice(text.into());
    }

    pub fn dismiss_notice(&mut self) {
        if matches!(self.mode, Mode::Notice(_)) {
            self.mode = Mode::Normal;
        }
    }
}

fn describe(report: &Report) -> String {
    match report {
        Report::Loaded { count } => format!("{count} files"),
        Report::Renamed { path } => format!("renamed to {path}"),
        Report::BatchRenamed { renamed, failed: 0 } => format!("renamed {renamed} files"),
        Report::BatchRenamed { renamed, failed } => {
            format!("renamed {renamed} files, {failed} failed (see log)")
        }
        Report::Copied { count, destination } => format!("copied {count} files to {destination}"),
    }
}

use std::sync::mpsc;
use std::time::Duration;

use async_io::block_on;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::{App, Mode, PickOutcome, PromptKind};
use crate::audio::PlaybackEvent;
use crate::backend::Backend;
use crate::config;
use crate::controller::{Command, Controller};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains backend notifications, draws, and
/// handles one key per iteration. Returns `Ok(())` when shutdown is requested.
pub fn run<B: Backend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &Controller<B>,
    events: &mpsc::Receiver<PlaybackEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(event) = events.try_recv() {
            dispatch(controller, app, Command::Event(event));
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, controller, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Run one command to completion and show its result.
///
/// Busy rejections only produce a status message; other failures open the
/// notice popup.
pub fn dispatch<B: Backend>(controller: &Controller<B>, app: &mut App, command: Command) {
    match block_on(controller.dispatch(command)) {
        Ok(outcome) => app.apply(outcome),
        Err(e) if e.is_busy() => {
            debug!(error = %e, "request ignored");
            app.message = Some(e.to_string());
        }
        Err(e) => {
            app.replace_snapshot(controller.snapshot());
            app.show_notice(e.to_string());
        }
    }
}

/// Returns `true` when the app should quit.
fn handle_key_event<B: Backend>(
    key: KeyEvent,
    app: &mut App,
    controller: &Controller<B>,
    state: &mut EventLoopState,
) -> bool {
    match app.mode {
        Mode::Notice(_) => {
            app.dismiss_notice();
            false
        }
        Mode::Prompt(_) => {
            handle_prompt_key(key, app, controller);
            false
        }
        Mode::Places { .. } => {
            handle_places_key(key, app, controller);
            false
        }
        Mode::Normal => handle_normal_key(key, app, controller, state),
    }
}

fn handle_prompt_key<B: Backend>(key: KeyEvent, app: &mut App, controller: &Controller<B>) {
    let searching = app
        .prompt()
        .is_some_and(|p| p.kind == PromptKind::Search);

    match key.code {
        KeyCode::Esc => {
            if let Some((kind, PickOutcome::Cancelled)) = app.finish_prompt(false) {
                if kind == PromptKind::Search {
                    dispatch(controller, app, Command::SetQuery(String::new()));
                }
            }
        }
        KeyCode::Enter => {
            if let Some((kind, PickOutcome::Chosen(input))) = app.finish_prompt(true) {
                submit_prompt(kind, input, app, controller);
            }
        }
        KeyCode::Backspace => {
            app.pop_char();
            if searching {
                live_search(app, controller);
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            app.push_char(c);
            if searching {
                live_search(app, controller);
            }
        }
        _ => {}
    }
}

fn live_search<B: Backend>(app: &mut App, controller: &Controller<B>) {
    if let Some(query) = app.prompt().map(|p| p.input.clone()) {
        dispatch(controller, app, Command::SetQuery(query));
    }
}

fn submit_prompt<B: Backend>(kind: PromptKind, input: String, app: &mut App, controller: &Controller<B>) {
    let trimmed = input.trim().to_string();
    let command = match kind {
        PromptKind::Search => Command::SetQuery(input),
        PromptKind::BatchPrefix => {
            app.begin_prompt(PromptKind::BatchSuffix { prefix: input }, "");
            return;
        }
        PromptKind::BatchSuffix { prefix } => Command::RenameSelected {
            prefix,
            suffix: input,
        },
        _ if trimmed.is_empty() => return,
        PromptKind::OpenFolder => Command::OpenFolder(trimmed),
        PromptKind::Rename { path } => Command::Rename {
            path,
            new_name: trimmed,
        },
        PromptKind::CopyDestination => Command::CopySelected {
            destination: trimmed,
        },
    };
    dispatch(controller, app, command);
}

fn handle_places_key<B: Backend>(key: KeyEvent, app: &mut App, controller: &Controller<B>) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_places(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_places(false),
        KeyCode::Enter => {
            if let PickOutcome::Chosen(folder) = app.finish_places(true) {
                dispatch(controller, app, Command::OpenFolder(folder));
            }
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('p') => {
            app.finish_places(false);
        }
        _ => {}
    }
}

fn handle_normal_key<B: Backend>(
    key: KeyEvent,
    app: &mut App,
    controller: &Controller<B>,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(path) = app.current_path() {
                dispatch(controller, app, Command::TogglePlayback(path));
            }
        }
        KeyCode::Char('x') => {
            if let Some(path) = app.current_path() {
                dispatch(controller, app, Command::ToggleSelected(path));
            }
        }
        KeyCode::Char('a') => dispatch(controller, app, Command::SelectVisible),
        KeyCode::Char('c') => dispatch(controller, app, Command::ClearSelection),
        KeyCode::Char('/') => {
            let query = app.snapshot.query.clone();
            app.begin_prompt(PromptKind::Search, query);
        }
        KeyCode::Char('o') => {
            let folder = app.snapshot.folder.clone().unwrap_or_default();
            app.begin_prompt(PromptKind::OpenFolder, folder);
        }
        KeyCode::Char('r') => {
            if let Some(file) = app.current() {
                let (path, name) = (file.path.clone(), file.name.clone());
                app.begin_prompt(PromptKind::Rename { path }, name);
            }
        }
        KeyCode::Char('R') => {
            if app.snapshot.selected == 0 {
                app.message = Some("nothing selected".to_string());
            } else {
                app.begin_prompt(PromptKind::BatchPrefix, "");
            }
        }
        KeyCode::Char('y') => {
            let target = app.snapshot.last_copy_target.clone().unwrap_or_default();
            app.begin_prompt(PromptKind::CopyDestination, target);
        }
        KeyCode::Char('t') => dispatch(controller, app, Command::OpenLastCopyTarget),
        KeyCode::Char('f') => {
            if let Some(path) = app.current_path() {
                dispatch(controller, app, Command::ToggleFavorite(path));
            }
        }
        KeyCode::Char('F') => {
            let view = app.snapshot.view.toggled();
            dispatch(controller, app, Command::SetView(view));
        }
        KeyCode::Char('m') => {
            if let Some(folder) = app.snapshot.folder.clone() {
                let command = if app.snapshot.is_bookmarked(&folder) {
                    Command::RemoveBookmark(folder)
                } else {
                    Command::AddBookmark(folder)
                };
                dispatch(controller, app, command);
            }
        }
        KeyCode::Char('p') => app.open_places(),
        _ => {}
    }

    false
}

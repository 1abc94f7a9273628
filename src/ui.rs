//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Mode, Place};
use crate::config::UiSettings;
use crate::controller::{FileView, Snapshot, ViewMode};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("enter/space", "play/stop"),
        ("x", "select"),
        ("a/c", "select shown/clear"),
        ("/", "search"),
        ("o", "open folder"),
        ("p", "places"),
        ("m", "bookmark folder"),
        ("r/R", "rename/batch"),
        ("y", "copy selection"),
        ("t", "open last copy target"),
        ("f/F", "favorite/favorites view"),
        ("q", "quit"),
    ])
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k",
        "gg/G",
        "enter/space",
        "x",
        "a/c",
        "/",
        "o",
        "p",
        "m",
        "r/R",
        "y",
        "t",
        "f/F",
        "q",
    ];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_seconds(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() => format_mmss(Duration::from_secs_f64(s.max(0.0))),
        _ => "--:--".to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Status line parts, joined with bullets.
fn status_text(app: &App) -> String {
    let snap = &app.snapshot;
    let mut parts: Vec<String> = Vec::new();

    match &snap.folder {
        Some(dir) => {
            let mark = if snap.is_bookmarked(dir) { " *" } else { "" };
            parts.push(format!("Dir: {dir}{mark}"));
        }
        None => parts.push("Dir: -".to_string()),
    }

    parts.push(match snap.view {
        ViewMode::All => format!("VIEW: all {}/{}", snap.files.len(), snap.total),
        ViewMode::Favorites => format!("VIEW: favorites {}/{}", snap.files.len(), snap.total),
    });

    if !snap.query.is_empty() {
        parts.push(format!("FILTER: {}", snap.query));
    }
    if snap.selected > 0 {
        parts.push(format!("Selected: {}", snap.selected));
    }

    parts.push(match &snap.now_playing {
        Some(path) => format!("Playing: {}", file_name(path)),
        None if any_pending(snap) => "Starting...".to_string(),
        None => "Stopped".to_string(),
    });

    if let Some(msg) = &app.message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn any_pending(snap: &Snapshot) -> bool {
    snap.files.iter().any(|f| f.pending)
}

fn row_text(file: &FileView) -> String {
    let play = if file.pending {
        "…"
    } else if file.playing {
        "▶"
    } else {
        " "
    };
    let sel = if file.selected { "[x]" } else { "[ ]" };
    let fav = if file.favorite { "★" } else { " " };
    format!(
        "{play} {sel} {fav} {}  {}",
        file.name,
        format_seconds(file.duration_seconds)
    )
}

/// Window of `total` rows of height `height` keeping `selected` centered
/// when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" soundpad ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = Paragraph::new(status_text(app))
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Main list. Only build items for the visible window.
    {
        let files = &app.snapshot.files;
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let (start, end, selected_in_window) =
            visible_window(files.len(), list_height, app.cursor());

        let items: Vec<ListItem> = files[start..end]
            .iter()
            .map(|f| {
                let item = ListItem::new(row_text(f));
                if f.playing {
                    item.bold()
                } else {
                    item
                }
            })
            .collect();

        let title = if files.is_empty() && app.snapshot.total > 0 {
            " files (nothing matches) "
        } else {
            " files "
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if !files.is_empty() {
            state.select(Some(selected_in_window));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    let footer = Paragraph::new(controls_text())
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    match &app.mode {
        Mode::Normal => {}
        Mode::Prompt(prompt) => {
            let area = centered_rect_sized(72, 3, chunks[2]);
            frame.render_widget(Clear, area);
            let input = Paragraph::new(format!("{}_", prompt.input))
                .block(padded_block(prompt.kind.title()));
            frame.render_widget(input, area);
        }
        Mode::Places { cursor } => draw_places(frame, chunks[2], &app.places(), *cursor),
        Mode::Notice(text) => {
            let area = centered_rect_sized(60, 7, chunks[2]);
            frame.render_widget(Clear, area);
            let notice = Paragraph::new(text.as_str())
                .block(padded_block(" error (any key closes) ").red())
                .wrap(Wrap { trim: true });
            frame.render_widget(notice, area);
        }
    }
}

fn draw_places(frame: &mut Frame, within: Rect, places: &[Place], cursor: usize) {
    let height = (places.len() as u16).saturating_add(2).max(3);
    let area = centered_rect_sized(72, height, within);
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = if places.is_empty() {
        vec![ListItem::new("no bookmarks or history yet")]
    } else {
        places
            .iter()
            .map(|p| {
                let mark = if p.bookmarked { "* " } else { "  " };
                ListItem::new(format!("{mark}{}", p.path))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" places "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !places.is_empty() {
        state.select(Some(cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::config;
use crate::logging;

/// File holding history and bookmarks inside the data directory.
pub const STATE_FILE: &str = "state.toml";

/// Resolve the data directory, falling back to `./.soundpad` when neither
/// the config nor the environment names one.
pub fn data_dir(settings: &config::Settings) -> PathBuf {
    settings
        .data_dir()
        .unwrap_or_else(|| PathBuf::from(".soundpad"))
}

/// Start file logging. Failure leaves the app running without logs.
pub fn init_logging(dir: &std::path::Path, settings: &config::Settings) {
    if let Err(e) = logging::init(dir, &settings.logging.level) {
        eprintln!("soundpad: logging disabled: {e}");
    }
}

/// Folder to open first: command line, then config, then the most recent
/// history entry, then the working directory.
pub fn initial_folder(settings: &config::Settings, last_visited: Option<String>) -> Option<String> {
    pick_initial_folder(
        env::args().nth(1),
        settings.ui.start_dir.clone(),
        last_visited,
        env::current_dir()
            .ok()
            .map(|p| p.to_string_lossy().into_owned()),
    )
}

fn pick_initial_folder(
    arg: Option<String>,
    configured: Option<String>,
    last_visited: Option<String>,
    cwd: Option<String>,
) -> Option<String> {
    let picked = arg
        .or(configured)
        .or(last_visited)
        .or(cwd)
        .filter(|s| !s.trim().is_empty());
    if picked.is_none() {
        warn!("no folder to open at startup");
    }
    picked
}

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::backend::LocalBackend;
use crate::controller::{Command, Controller};
use crate::store::TomlFileStore;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = settings::load_settings();
    let data_dir = startup::data_dir(&loaded.settings);
    startup::init_logging(&data_dir, &loaded.settings);
    loaded.log_fallback();
    let settings = loaded.settings;

    let store = TomlFileStore::new(data_dir.join(startup::STATE_FILE));
    let (backend, events) = LocalBackend::new(settings.library.clone(), &data_dir);
    let controller = Controller::new(backend, Box::new(store));
    let mut app = App::new(controller.snapshot());

    if let Some(folder) = startup::initial_folder(&settings, controller.last_folder()) {
        event_loop::dispatch(&controller, &mut app, Command::OpenFolder(folder));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &controller,
        &events,
        &mut state,
    );

    controller.backend().shutdown();
    info!("shutting down");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

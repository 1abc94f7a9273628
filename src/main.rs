mod app;
mod audio;
mod backend;
mod batch;
mod config;
mod controller;
mod library;
mod logging;
mod playback;
mod registry;
mod runtime;
mod search;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

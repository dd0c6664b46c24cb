// src/main.rs

mod analysis;
mod charts;
mod cli;
mod config;
mod controls;
mod data_loader;
mod error;
mod insights;
mod logging;
mod render;
mod stats;
mod tui_app;
mod virtual_table;

use clap::Parser;
use cli::{cli_to_config, Cli};
use config::Config;
use data_loader::get_loader;
use error::Result;
use tui_app::TuiApp;

use std::io;
use std::process;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    config.merge_with_cli(&cli_to_config(&cli));

    logging::init_logger(config.verbose, config.log_file.as_deref())?;
    logging::log_config_info(&config);

    // Reject an unknown -b before the terminal is taken over.
    if let Some(ref format) = config.format {
        get_loader(format)?;
    }

    let mut app = TuiApp::new(config, cli.page);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let outcome = app.main_loop(&mut terminal);

    terminal.show_cursor()?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    outcome
}

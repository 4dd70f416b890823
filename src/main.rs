//! table-sort - sort table rows by column in the terminal
//!
//! Loads a CSV/TSV file or a pipe-delimited text table and sorts its rows by
//! string, date or status columns. Every sort flips the direction.

mod action;
mod app;
mod cli;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::cli::Cli;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::io;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.init_config {
        return init_config(&cli);
    }

    let (mut config, config_warning) = load_config(&cli)?;
    config.start_descending |= cli.descending;

    if let Some(log_file) = cli.log_file.clone().or_else(logging::default_log_file) {
        logging::init_or_warn(&log_file, config.log_level());
    }
    if let Some(warning) = config_warning {
        log::warn!("{}", warning);
    }

    let path = cli
        .file
        .clone()
        .context("No table file given (see --help)")?;
    let table = services::load_table(&path)?;

    let mut app = App::with_table(config, table, Some(path));
    app.run_sorts(&cli.sorts)?;

    if cli.print {
        services::write_csv(&app.table, io::stdout().lock())?;
        return Ok(());
    }

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(250));
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;
    result
}

/// Load the config from `--config` or the default location.
///
/// An explicit path must load; a broken default file only produces a warning.
fn load_config(cli: &Cli) -> Result<(Config, Option<String>)> {
    if let Some(ref path) = cli.config {
        return Ok((Config::load_from(path)?, None));
    }

    match Config::load() {
        Ok(Some(config)) => Ok((config, None)),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => Ok((Config::default(), Some(format!("{:#}, using defaults", e)))),
    }
}

/// Write a default config file
fn init_config(cli: &Cli) -> Result<()> {
    let config = Config::default();
    match cli.config {
        Some(ref path) => {
            config.save_to(path)?;
            println!("Wrote {}", path.display());
        }
        None => {
            config.save()?;
            if let Some(dir) = Config::config_dir() {
                println!("Wrote {}", dir.join("config.json").display());
            }
        }
    }
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            let area = frame.area();
            if let Err(e) = app.draw(frame, area) {
                log::error!("draw error: {}", e);
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                log::trace!("action: {}", action);
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

//! Leavedesk - employee leave management from the terminal
//!
//! A terminal UI client for a leave-management portal: sign in, review leave
//! balances and history, submit requests, and pull admin reports.

mod api;
mod app;
mod assets;
mod cli;
mod session;
mod ui;

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use api::transport::api_url_from_env;
use api::HttpTransport;
use app::{App, AppState};
use assets::{AssetManifest, AssetStore};
use cli::{Cli, StartupConfig};

/// Sets up a panic hook that restores the terminal before printing the panic
/// message. This ensures the terminal is usable even if the application
/// panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match app.state {
        AppState::Login => ui::render_login(frame, app),
        AppState::Dashboard => ui::render_dashboard(frame, app),
        AppState::RequestLeave => ui::render_request_form(frame, app),
        AppState::Profile => ui::render_profile(frame, app),
        AppState::Admin => ui::render_admin(frame, app),
    }

    if let Some(notice) = &app.notice {
        ui::render_notice(frame, notice);
    }
    if app.has_pending() || app.loading.is_active() {
        ui::render_loading_overlay(frame, &app.loading);
    }
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Refreshes the offline asset cache in the background
///
/// A failed install costs offline support for this version only; online
/// operation continues either way, so errors are not surfaced.
fn spawn_asset_refresh() {
    let portal_base = api_url_from_env();
    tokio::spawn(async move {
        let manifest = AssetManifest::builtin(&portal_base);
        if let Some(store) = AssetStore::new(manifest) {
            let transport = HttpTransport::new(portal_base.as_str());
            if store.install(&transport).await.is_ok() {
                let _ = store.activate();
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
    };

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance; a persisted session skips the login screen
    let mut app = App::new(config);
    spawn_asset_refresh();

    // Main event loop
    loop {
        app.tick();

        // Render UI; pending work shows the loading line in this frame
        terminal.draw(|f| render_ui(f, &app))?;

        if let Some(action) = app.take_pending() {
            app.run_pending(action).await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

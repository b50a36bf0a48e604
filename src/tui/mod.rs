// Interactive dashboard over a loaded BOM table.

pub mod app;
pub mod events;
pub mod layout;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use tracing::{error, info};

use crate::config::DashConfig;
use crate::ingest::LoadedTable;
use app::DashboardApp;
use events::EventHandler;

/// Entry point for the interactive dashboard.
pub fn run_dashboard(table: LoadedTable, config: DashConfig, source_name: String) -> Result<()> {
    info!("Starting availability dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DashboardApp::new(table, config, source_name);
    let mut event_handler = EventHandler::new();

    let result = run_dashboard_loop(&mut terminal, &mut app, &mut event_handler);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("Dashboard error: {:?}", err);
        return Err(err);
    }

    info!("Dashboard shut down");
    Ok(())
}

fn run_dashboard_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DashboardApp,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            app.render(frame);
        })?;

        if let Some(action) = event_handler.poll()? {
            if app.handle_action(action)? {
                break; // App requested exit
            }
        }
    }

    Ok(())
}

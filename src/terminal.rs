// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end
//!
//! Owns the raw-mode alternate screen and drives the dashboard: refresh,
//! draw, then wait briefly for a key. The dashboard is unmounted before the
//! terminal is restored.

use crate::app::{Dashboard, Message, MountOptions, render};
use crate::backends::camera::CaptureBackend;
use crate::constants::timing;
use crate::errors::{AppError, AppResult};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Run the dashboard until the user quits.
///
/// Must be called with a tokio runtime entered.
pub fn run(backend: Arc<dyn CaptureBackend>, options: MountOptions) -> AppResult<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    let result = run_app(&mut terminal, backend, options);
    if let Err(e) = &result {
        error!(error = %e, "Dashboard loop failed");
    }

    // Every step is attempted even if an earlier one fails
    let restored = first_error([
        disable_raw_mode(),
        execute!(terminal.backend_mut(), LeaveAlternateScreen),
        terminal.show_cursor(),
    ]);

    result?;
    restored.map_err(AppError::from)
}

/// Already-evaluated results, first failure wins
fn first_error(results: impl IntoIterator<Item = io::Result<()>>) -> io::Result<()> {
    results.into_iter().collect()
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: Arc<dyn CaptureBackend>,
    options: MountOptions,
) -> AppResult<()> {
    let mut dashboard = Dashboard::mount(backend, options);

    loop {
        dashboard.refresh();
        terminal.draw(|f| render(f, &dashboard, chrono::Utc::now()))?;

        if event::poll(timing::EVENT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(message) = key_to_message(key)
            && !dashboard.update(message)
        {
            break;
        }
    }

    info!(
        elapsed = dashboard.elapsed_seconds(),
        "Leaving dashboard"
    );
    Ok(())
}

/// Map a key press to a dashboard message
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('r') => Some(Message::ToggleRecording),
        KeyCode::Char('w') => Some(Message::ToggleWebcam),
        KeyCode::Char('h') => Some(Message::ToggleHelp),
        KeyCode::Enter | KeyCode::Esc => Some(Message::DismissAlert),
        _ => None,
    }
}

pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;
use mapty_core::AppConfig;

use crate::tui::app::{App, Focus};

pub fn run(config: &AppConfig) -> Result<()> {
    // Build the app before touching the terminal so startup errors print normally.
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, config: &AppConfig) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Alerts block until dismissed.
        if app.dismiss_alert() {
            continue;
        }

        if handle_key(app, key)? {
            return Ok(());
        }

        if app.reload_requested() {
            info!("reloading");
            *app = App::new(config)?;
        }
    }
}

/// Returns `true` when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.focus {
        Focus::Map => match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Left | KeyCode::Char('h') => app.pan(-1.0, 0.0),
            KeyCode::Right | KeyCode::Char('l') => app.pan(1.0, 0.0),
            KeyCode::Up | KeyCode::Char('k') => app.pan(0.0, 1.0),
            KeyCode::Down | KeyCode::Char('j') => app.pan(0.0, -1.0),
            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
            KeyCode::Char('-') => app.zoom_out(),
            KeyCode::Enter | KeyCode::Char(' ') => app.click_map(),
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Char('R') => app.reset_all()?,
            _ => {}
        },
        Focus::List => match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Enter | KeyCode::Char(' ') => app.open_selected(),
            KeyCode::Tab | KeyCode::Esc => app.toggle_focus(),
            KeyCode::Char('R') => app.reset_all()?,
            _ => {}
        },
        Focus::Form => match key.code {
            KeyCode::Enter => app.submit_form(),
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Tab | KeyCode::Down => app.next_field(),
            KeyCode::BackTab | KeyCode::Up => app.previous_field(),
            KeyCode::Left | KeyCode::Right => app.change_kind(),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        },
    }
    Ok(false)
}

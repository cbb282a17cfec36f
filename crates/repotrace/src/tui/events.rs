//! Event handling for the TUI.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime as TokioRuntime;
use tracing::info;

use repotrace_core::config::{self, ClientConfig};
use repotrace_core::AnalysisService;

use super::app::App;
use super::theme::ThemeRoot;
use super::ui;

/// Result type for TUI operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Initialize the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI event loop.
///
/// If `reference` is given it is analyzed as soon as the screen is up.
pub fn run(state_dir: &Path, client: &ClientConfig, reference: Option<String>) -> Result<()> {
    // Requests run here; the runtime must outlive the loop
    let runtime = TokioRuntime::new()?;

    let service = AnalysisService::from_config(client)?;
    let theme = ThemeRoot::new();
    let prefs = crate::open_preferences(state_dir, Box::new(theme.clone()));
    let export_dir = config::export_dir(state_dir);

    info!(
        "Starting TUI (service: {}, mode: {})",
        service.base_url(),
        prefs.mode()
    );

    let mut app = App::new(service, prefs, theme, export_dir);
    app.set_runtime_handle(runtime.handle().clone());

    if let Some(reference) = reference {
        app.paste(&reference);
        app.submit();
    }

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Run event loop
    let result = run_loop(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop.
fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with timeout
        if event::poll(tick_rate)? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Paste(text) if !app.is_pending() => app.paste(&text),
                _ => {}
            }
        }

        // Apply finished analyses
        app.poll_results();

        app.on_tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch one key press.
fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('s') if ctrl => app.export_report(),
        KeyCode::F(2) => app.toggle_theme(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),

        // The form is disabled while a request is in flight
        _ if app.is_pending() => {}

        KeyCode::Enter => app.submit(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Char(c) if !ctrl => app.enter_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        _ => {}
    }
}

//! Terminal UI: main entry point and event loop.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

use std::io;
use std::time::Duration;

use crossterm::event::{
    poll as ct_poll, read as ct_read, DisableFocusChange, DisableMouseCapture, EnableFocusChange,
    EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use self::app::App;
use crate::source::LetterSource;

/// Run the TUI application. Blocks until the user quits.
///
/// When `source` is given the letters are fetched in the background while
/// the loading screen is shown; otherwise `app` must already hold them.
pub fn run_tui(mut app: App, source: Option<(LetterSource, Duration)>) -> anyhow::Result<()> {
    if let Some((source, timeout)) = source {
        tracing::info!(source = %source.describe(), "Fetching letters");
        app.start_loading(source, timeout);
    }

    // Setup terminal (alternate screen, mouse for the cover card)
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app);
    app.teardown();

    // Restore terminal (always, even on error)
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableFocusChange)?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop: render → poll → handle → repeat.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    // Short enough for smooth strokes and the unfold animation
    let tick_rate = Duration::from_millis(33);

    loop {
        // Render
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Drain every pending event so a fast drag is not rendered per point
        if ct_poll(tick_rate)? {
            loop {
                match ct_read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        event::handle_key_event(app, key)?;
                    }
                    Event::Mouse(mouse) => event::handle_mouse_event(app, mouse),
                    Event::FocusLost => event::handle_focus_lost(app),
                    _ => {}
                }
                if app.should_quit || !ct_poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        // Periodic housekeeping
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

//! Bottom status bar showing transient messages or context-sensitive keyboard hints.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::desk::Screen;
use crate::i18n;
use crate::reveal::config::RevealMode;
use crate::tui::app::{App, PanelFocus};
use crate::tui::theme::current_theme;

/// Version string shown at the right edge of the status bar.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the status bar at the bottom with context-sensitive hints and version.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let version_text = format!("v{VERSION} ");
    let version_width = version_text.len() as u16;

    // Split: hints (flexible) | version (fixed)
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(version_width)])
        .split(area);

    // Left side: hints or status message
    let content = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(format!(" {msg}"), theme.status_bar))
    } else {
        let mut spans = Vec::new();
        if app.desk.screen() == Screen::Desk
            && app.desk.unseen_count() > 0
            && app.engine.mode() == RevealMode::Scratch
        {
            spans.push(Span::styled(
                format!(" {} \u{b7}", i18n::tui_hint_scratch()),
                theme.status_bar,
            ));
        }
        for (i, (key, desc)) in build_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", theme.status_bar));
            }
            spans.push(Span::styled(format!(" {key}"), theme.search_prompt));
            spans.push(Span::styled(format!(":{desc}"), theme.status_bar));
        }
        Line::from(spans)
    };

    let bar = Paragraph::new(content).style(theme.status_bar);
    frame.render_widget(bar, chunks[0]);

    // Right side: version
    let version = Paragraph::new(Line::from(Span::styled(version_text, theme.help_dim)))
        .alignment(Alignment::Right)
        .style(theme.status_bar);
    frame.render_widget(version, chunks[1]);
}

/// Return context-sensitive hint pairs (key, description) for the active screen.
fn build_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = Vec::new();

    match app.desk.screen() {
        Screen::Loading | Screen::LoadFailed => {}
        Screen::Desk => {
            if app.desk.unseen_count() > 0 {
                hints.push(("Enter", i18n::tui_hint_open()));
            }
            hints.push(("A", i18n::tui_hint_archive()));
        }
        Screen::Letter => {
            hints.push(("h", i18n::tui_hint_heart()));
            hints.push(("x", i18n::tui_hint_store()));
            if app.desk.current_letter().is_some_and(|l| l.has_audio()) {
                hints.push(("p", i18n::tui_hint_audio()));
            }
            hints.push(("j/k", i18n::tui_hint_scroll()));
            hints.push(("A", i18n::tui_hint_archive()));
            hints.push(("Esc", i18n::tui_hint_back()));
        }
        Screen::Archive => match app.focus {
            PanelFocus::List => {
                hints.push(("j/k", i18n::tui_hint_nav()));
                hints.push(("Enter", i18n::tui_hint_open()));
                hints.push(("/", i18n::tui_hint_search()));
                hints.push(("f", i18n::tui_hint_filter()));
                hints.push(("s", i18n::tui_hint_sort()));
                hints.push(("Tab", i18n::tui_hint_panel()));
                hints.push(("Esc", i18n::tui_hint_back()));
            }
            PanelFocus::Sidebar => {
                hints.push(("j/k", i18n::tui_hint_nav()));
                hints.push(("Enter", i18n::tui_hint_apply()));
                hints.push(("Tab", i18n::tui_hint_panel()));
                hints.push(("Esc", i18n::tui_hint_back()));
            }
        },
    }
    hints.push(("?", i18n::tui_hint_help()));
    hints.push(("q", i18n::tui_hint_quit()));

    hints
}

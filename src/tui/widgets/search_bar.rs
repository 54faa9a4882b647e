//! Search bar widget that appears at the bottom when search is active.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Render the search input bar with a result counter.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let spans: Vec<Span<'static>> = vec![
        Span::styled(" /: ", theme.search_prompt),
        Span::styled(app.search_query.clone(), theme.status_bar),
        Span::styled("_", theme.search_prompt), // cursor indicator
        // Result counter: (matching / opened)
        Span::styled(
            format!(
                " ({} / {})",
                app.desk.archive_len(),
                app.desk.ledger().len()
            ),
            theme.help_dim,
        ),
        Span::styled(
            format!(
                "   Enter:{}  Esc:{}",
                i18n::tui_hint_apply(),
                i18n::tui_hint_cancel()
            ),
            theme.help_dim,
        ),
    ];

    let line = Line::from(spans);
    let bar = Paragraph::new(line).style(theme.status_bar);
    frame.render_widget(bar, area);
}

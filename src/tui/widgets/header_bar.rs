//! Top header bar showing the letter source and the current screen.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::desk::Screen;
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Render the top header bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let mut spans = vec![
        Span::styled(format!(" {}", i18n::app_name()), theme.header_bar),
        Span::styled(format!(" | {}", app.source_label), theme.header_bar),
    ];

    match app.desk.screen() {
        Screen::Letter => {
            if let Some(letter) = app.desk.current_letter() {
                spans.push(Span::styled(
                    format!(" | {} #{}", i18n::tui_letter(), letter.number),
                    theme.header_bar,
                ));
            }
        }
        Screen::Archive => {
            spans.push(Span::styled(
                format!(" | {}: {}", i18n::tui_archive(), App::filter_label(&app.desk.query().filter)),
                theme.header_bar,
            ));
            let search = &app.desk.query().search;
            if !search.is_empty() && !app.search_active {
                spans.push(Span::styled(format!(" | /\"{search}\""), theme.header_bar));
            }
        }
        Screen::Desk | Screen::Loading | Screen::LoadFailed => {}
    }

    if app.desk.is_ready() {
        let counts = app.desk.counts();
        spans.push(Span::styled(
            format!(
                " | {} {} \u{b7} {} \u{2665}",
                app.desk.unseen_count(),
                i18n::tui_unseen_left(),
                counts.hearted
            ),
            theme.header_bar,
        ));
    }

    // Right-aligned help hint
    let left_len: usize = spans.iter().map(|s| s.content.width()).sum();
    let right_text = format!(" [?] {} ", i18n::tui_hint_help());
    let right_len = right_text.width();
    if area.width as usize > left_len + right_len {
        let padding = area.width as usize - left_len - right_len;
        spans.push(Span::styled(" ".repeat(padding), theme.header_bar));
    }
    spans.push(Span::styled(right_text, theme.header_bar));

    let line = Line::from(spans);
    let bar = Paragraph::new(line).style(theme.header_bar);
    frame.render_widget(bar, area);
}

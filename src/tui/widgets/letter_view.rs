//! Letter view: the open letter, unfolding while the open animation runs.

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use ratatui::Frame;

use crate::i18n;
use crate::model::state::Status;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Widest the sheet gets, in cells.
const SHEET_WIDTH: u16 = 72;

/// Render the open letter.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();
    let Some(letter) = app.desk.current_letter() else {
        return;
    };

    let width = SHEET_WIDTH.min(area.width);
    let sheet = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y,
        width,
        area.height,
    );

    let title = format!(" {} #{} ", i18n::tui_letter(), letter.number);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_focused)
        .title(Span::styled(title, theme.letter_label))
        .padding(Padding::horizontal(1))
        .style(theme.letter_body);
    let inner = block.inner(sheet);
    frame.render_widget(block, sheet);

    if inner.height < 2 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    // ── Meta line: tag, status, audio ────────────
    let mut meta = Vec::new();
    if !letter.tag.is_empty() {
        meta.push(Span::styled(format!("[{}]", letter.tag), theme.letter_label));
        meta.push(Span::raw("  "));
    }
    match app.desk.current_status() {
        Some(Status::Hearted) => {
            meta.push(Span::styled(
                format!("\u{2665} {}", i18n::status_hearted()),
                theme.hearted,
            ));
        }
        Some(status) => meta.push(Span::styled(status_label(status), theme.help_dim)),
        None => {}
    }
    if letter.has_audio() {
        let audio = if app.desk.is_playing() {
            format!("  \u{266b} {}", i18n::tui_audio_playing())
        } else {
            format!("  \u{266a} {}", i18n::tui_audio())
        };
        meta.push(Span::styled(audio, theme.help_dim));
    }
    frame.render_widget(Paragraph::new(Line::from(meta)), chunks[0]);

    // ── Body ─────────────────────────────────────
    let progress = app.desk.reveal_progress(Instant::now());
    let body = unfolded(&letter.text, progress);
    let paragraph = Paragraph::new(body)
        .style(theme.letter_body)
        .wrap(Wrap { trim: false })
        .scroll((app.letter_scroll, 0));
    frame.render_widget(paragraph, chunks[1]);
}

/// Localized status name.
pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Read => i18n::status_read(),
        Status::Hearted => i18n::status_hearted(),
        Status::Archived => i18n::status_archived(),
    }
}

/// The leading part of `text` visible at `progress` (0–1) of the unfold.
fn unfolded(text: &str, progress: f32) -> String {
    if progress >= 1.0 {
        return text.to_string();
    }
    let total = text.chars().count();
    let shown = (total as f32 * progress.max(0.0)).ceil() as usize;
    text.chars().take(shown).collect()
}

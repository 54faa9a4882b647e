//! The desk: loading and failure screens, and the cover card with the
//! count of letters still waiting.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::reveal_card;
use crate::desk::LoadState;
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Largest card, in cells.
const CARD_WIDTH: u16 = 44;
const CARD_HEIGHT: u16 = 11;

/// Render the desk with the cover card, or a message when no letter waits.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = current_theme();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let waiting = app.desk.unseen_count();
    if waiting == 0 {
        let text = if app.desk.letters().is_empty() {
            i18n::tui_no_entries()
        } else {
            i18n::tui_all_opened()
        };
        render_message(frame, vertical[0], vec![Line::from(Span::styled(text, theme.desk))]);
    } else {
        let card = card_rect(vertical[0]);
        reveal_card::render(frame, app, card);
    }

    let opened = app.desk.ledger().len();
    let counts = Line::from(vec![
        Span::styled(format!("{waiting} {}", i18n::tui_unseen_left()), theme.letter_label),
        Span::styled("  \u{b7}  ", theme.help_dim),
        Span::styled(format!("{opened} {}", i18n::tui_opened()), theme.help_dim),
    ]);
    let footer = Paragraph::new(counts).alignment(Alignment::Center);
    frame.render_widget(footer, vertical[1]);
}

/// Render the screen shown while fetching, or after the fetch failed.
pub fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();
    let lines = match app.desk.load_state() {
        LoadState::Failed(reason) => vec![
            Line::from(Span::styled(i18n::tui_load_failed(), theme.error)),
            Line::from(""),
            Line::from(Span::styled(reason.clone(), theme.desk)),
            Line::from(""),
            Line::from(Span::styled(i18n::tui_load_failed_hint(), theme.help_dim)),
        ],
        _ => vec![
            Line::from(Span::styled(i18n::tui_loading(), theme.desk)),
            Line::from(Span::styled(app.source_label.clone(), theme.help_dim)),
        ],
    };
    render_message(frame, area, lines);
}

/// Center a short block of lines in `area`.
fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let target = Rect::new(area.x, top, area.width, height);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, target);
}

/// The card, centered in `area` and shrunk to fit.
fn card_rect(area: Rect) -> Rect {
    let w = CARD_WIDTH.min(area.width.saturating_sub(4)).max(area.width.min(8));
    let h = CARD_HEIGHT.min(area.height.saturating_sub(2)).max(area.height.min(3));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_rect_fits_and_centers() {
        let card = card_rect(Rect::new(0, 1, 100, 30));
        assert_eq!((card.width, card.height), (CARD_WIDTH, CARD_HEIGHT));
        assert_eq!(card.x, 28);

        let small = card_rect(Rect::new(0, 0, 20, 5));
        assert_eq!((small.width, small.height), (16, 3));
        assert!(small.right() <= 20 && small.bottom() <= 5);
    }
}

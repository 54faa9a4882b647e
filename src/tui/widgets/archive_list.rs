//! Archive table: virtual-scrolling list of opened letters.

use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use super::letter_view::status_label;
use super::truncate_str;
use crate::i18n;
use crate::ledger::query::SortOrder;
use crate::model::state::Status;
use crate::tui::app::{App, PanelFocus};
use crate::tui::theme::current_theme;

/// Render the archive table with virtual scrolling.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = current_theme();

    let border_style = if app.focus == PanelFocus::List {
        theme.border_focused
    } else {
        theme.border
    };
    let sort = match app.desk.query().sort {
        SortOrder::Newest => i18n::tui_sort_newest(),
        SortOrder::Oldest => i18n::tui_sort_oldest(),
    };
    let title = format!(
        " {} ({}) \u{b7} {sort} ",
        i18n::tui_archive(),
        app.desk.archive_len()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    if app.desk.archive_len() == 0 {
        let empty = Paragraph::new(Span::styled(i18n::tui_archive_empty(), theme.help_dim))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    // Header row takes 1 line, rest is data
    let viewport_height = (inner.height as usize).saturating_sub(1);
    app.list_viewport_height = viewport_height;

    // Column widths
    let number_w = 5u16;
    let tag_w = 12u16.min(inner.width / 5);
    let status_w = 10u16;
    let updated_w = 16u16;
    let fixed = number_w + tag_w + status_w + updated_w + 4; // column spacing
    let excerpt_w = inner.width.saturating_sub(fixed);

    let constraints = [
        Constraint::Length(number_w),
        Constraint::Length(tag_w),
        Constraint::Length(status_w),
        Constraint::Length(updated_w),
        Constraint::Min(excerpt_w),
    ];

    let header = Row::new(vec![
        i18n::tui_col_number(),
        i18n::tui_col_tag(),
        i18n::tui_col_status(),
        i18n::tui_col_updated(),
        i18n::tui_col_letter(),
    ])
    .style(theme.list_header);

    // Virtual scrolling: only build rows for visible range
    let letters = app.desk.archive_letters();
    let start = app.list_scroll_offset.min(letters.len());
    let end = (start + viewport_height).min(letters.len());

    let rows: Vec<Row> = letters[start..end]
        .iter()
        .enumerate()
        .map(|(offset, letter)| {
            let state = app.desk.ledger().get(&letter.id);
            let status = state.map(|s| s.status);
            let updated = state
                .map(|s| {
                    s.updated_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                })
                .unwrap_or_default();
            let status_text = match status {
                Some(Status::Hearted) => format!("\u{2665} {}", status_label(Status::Hearted)),
                Some(s) => status_label(s).to_string(),
                None => String::new(),
            };

            let style = if start + offset == app.selected {
                theme.list_selected
            } else if status == Some(Status::Hearted) {
                theme.hearted
            } else {
                theme.list_normal
            };

            Row::new(vec![
                format!("{}", letter.number),
                truncate_str(&letter.tag, tag_w as usize),
                status_text,
                updated,
                truncate_str(&letter.excerpt(excerpt_w as usize * 2), excerpt_w as usize),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, constraints)
        .header(header)
        .column_spacing(1);

    frame.render_widget(table, inner);
}

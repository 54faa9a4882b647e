//! Sidebar widget listing the archive filters: all, favorites and each tag.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::i18n;
use crate::ledger::query::ArchiveFilter;
use crate::tui::app::{App, PanelFocus};
use crate::tui::theme::current_theme;

/// Render the filter sidebar panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let is_focused = app.focus == PanelFocus::Sidebar;
    let border_style = if is_focused {
        theme.border_focused
    } else {
        theme.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", i18n::tui_filters()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 || inner.width < 4 {
        return;
    }

    let max_width = inner.width as usize;
    let active = &app.desk.query().filter;
    let mut lines: Vec<Line> = Vec::new();

    for (i, filter) in app.filter_options().iter().enumerate() {
        // Separator between the fixed entries and the tags
        if i == 2 && inner.height > 3 {
            lines.push(Line::from(Span::styled(
                "\u{2500}".repeat(max_width.min(40)),
                theme.border,
            )));
        }

        let is_selected = app.sidebar_selected == i;
        let style = if is_selected && is_focused {
            theme.sidebar_selected
        } else if filter == active {
            theme.sidebar_selected.remove_modifier(Modifier::BOLD)
        } else {
            theme.sidebar
        };

        let label = match filter {
            ArchiveFilter::Favorites => format!("\u{2665} {}", App::filter_label(filter)),
            _ => App::filter_label(filter),
        };
        let marker = if filter == active { "\u{25b8}" } else { " " };
        let entry = super::truncate_str(&format!("{marker}{label}"), max_width);
        lines.push(Line::from(Span::styled(entry, style)));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

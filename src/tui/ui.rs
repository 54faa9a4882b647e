//! Main render function that dispatches to widgets.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::Block;
use ratatui::Frame;

use super::app::App;
use super::theme::current_theme;
use super::widgets;
use crate::desk::Screen;

/// Render the entire TUI frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    frame.render_widget(Block::default().style(current_theme().desk), size);

    // Vertical layout: header (1) + content (flex) + status (1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header bar
            Constraint::Min(5),    // content
            Constraint::Length(1), // status bar or search bar
        ])
        .split(size);

    // Header bar
    widgets::header_bar::render(frame, app, vertical[0]);

    // Main content, one screen at a time
    match app.desk.screen() {
        Screen::Loading | Screen::LoadFailed => {
            widgets::desk_view::render_loading(frame, app, vertical[1]);
        }
        Screen::Desk => widgets::desk_view::render(frame, app, vertical[1]),
        Screen::Letter => widgets::letter_view::render(frame, app, vertical[1]),
        Screen::Archive => {
            let h_split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(24), Constraint::Min(30)])
                .split(vertical[1]);
            widgets::sidebar::render(frame, app, h_split[0]);
            widgets::archive_list::render(frame, app, h_split[1]);
        }
    }

    // Status bar or search bar
    if app.search_active {
        widgets::search_bar::render(frame, app, vertical[2]);
    } else {
        widgets::status_bar::render(frame, app, vertical[2]);
    }

    // Popups (rendered on top of everything)
    if app.show_help {
        widgets::help_popup::render(frame, app);
    }
}

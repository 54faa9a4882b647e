//! Keyboard, mouse and focus event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::app::{App, PanelFocus};
use crate::desk::Screen;
use crate::model::state::Status;

/// Process a key event and update the application state.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    // ── Search bar input mode (captures all keys) ─────────
    if app.search_active {
        return handle_search_input(app, key);
    }

    // ── Popup handling (captures all keys) ────────────────
    if app.show_help {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.show_help = false,
            _ => {}
        }
        return Ok(());
    }

    // ── Always-available shortcuts ────────────────────────
    match (key.modifiers, key.code) {
        // Ctrl+C always quits, from any screen
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
            return Ok(());
        }
        (_, KeyCode::Char('?')) => {
            app.show_help = true;
            return Ok(());
        }
        (_, KeyCode::Char('q')) => {
            app.should_quit = true;
            return Ok(());
        }
        _ => {}
    }

    // ── Screen-specific shortcuts ─────────────────────────
    match app.desk.screen() {
        Screen::Loading | Screen::LoadFailed => {}
        Screen::Desk => handle_desk_keys(app, key),
        Screen::Letter => handle_letter_keys(app, key),
        Screen::Archive => match app.focus {
            PanelFocus::List => handle_archive_keys(app, key),
            PanelFocus::Sidebar => handle_sidebar_keys(app, key),
        },
    }
    Ok(())
}

/// Key handling on the desk with the cover card.
fn handle_desk_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('o') | KeyCode::Char(' ') => app.open_random(),
        KeyCode::Char('A') => app.show_archive(),
        _ => {}
    }
}

/// Key handling while a letter is open.
fn handle_letter_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.close_letter(),
        KeyCode::Char('h') => app.set_letter_status(Status::Hearted),
        KeyCode::Char('x') => app.set_letter_status(Status::Archived),
        KeyCode::Char('p') => app.toggle_audio(),
        KeyCode::Char('A') => app.show_archive(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.letter_scroll = app.letter_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.letter_scroll = app.letter_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.letter_scroll = 0,
        _ => {}
    }
}

/// Key handling when the archive table has focus.
fn handle_archive_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        // ── Navigation ───────────────────────────────────────
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => {
            app.selected = 0;
            app.ensure_selected_visible();
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.selected = app.desk.archive_len().saturating_sub(1);
            app.ensure_selected_visible();
        }
        KeyCode::PageDown => {
            let page = app.list_viewport_height.max(1);
            app.selected = (app.selected + page).min(app.desk.archive_len().saturating_sub(1));
            app.ensure_selected_visible();
        }
        KeyCode::PageUp => {
            let page = app.list_viewport_height.max(1);
            app.selected = app.selected.saturating_sub(page);
            app.ensure_selected_visible();
        }

        // ── Actions ──────────────────────────────────────────
        KeyCode::Enter => app.open_selected(),
        KeyCode::Esc | KeyCode::Char('A') => app.hide_archive(),
        KeyCode::Char('/') => {
            app.search_active = true;
        }
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('s') => app.toggle_sort(),
        KeyCode::Tab | KeyCode::Char('L') => app.focus = PanelFocus::Sidebar,
        _ => {}
    }
}

/// Key handling when the filter sidebar has focus.
fn handle_sidebar_keys(app: &mut App, key: KeyEvent) {
    let total = app.filter_options().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.sidebar_selected + 1 < total {
                app.sidebar_selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.sidebar_selected > 0 {
                app.sidebar_selected -= 1;
            }
        }
        KeyCode::Enter => {
            app.apply_sidebar_filter();
            app.focus = PanelFocus::List;
        }
        KeyCode::Esc | KeyCode::Tab | KeyCode::Char('L') => app.focus = PanelFocus::List,
        KeyCode::Char('f') => app.cycle_filter(),
        _ => {}
    }
}

/// Key handling while typing in the search bar. Results update as you type.
fn handle_search_input(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.search_active = false;
            app.search_query.clear();
            app.execute_search();
        }
        KeyCode::Enter => {
            app.search_active = false;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.execute_search();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
            app.execute_search();
        }
        _ => {}
    }
    Ok(())
}

/// Route mouse input to the cover card, or scroll the current screen.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.show_help {
        return;
    }
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(col, row),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            app.pointer_move(col, row)
        }
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(),
        MouseEventKind::ScrollDown => match app.desk.screen() {
            Screen::Archive => app.select_next(),
            Screen::Letter => app.letter_scroll = app.letter_scroll.saturating_add(1),
            _ => {}
        },
        MouseEventKind::ScrollUp => match app.desk.screen() {
            Screen::Archive => app.select_prev(),
            Screen::Letter => app.letter_scroll = app.letter_scroll.saturating_sub(1),
            _ => {}
        },
        _ => {}
    }
}

/// The terminal lost focus: end any stroke and leave hover.
pub fn handle_focus_lost(app: &mut App) {
    app.pointer_leave();
}

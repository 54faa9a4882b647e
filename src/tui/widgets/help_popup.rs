//! Help popup showing keyboard shortcuts in multi-column layout.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::{current_theme, Theme};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single shortcut entry.
struct Shortcut {
    key: &'static str,
    desc: &'static str,
}

/// Render the help popup centered on screen with multi-column shortcuts.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = current_theme();
    let screen = frame.area();

    let popup_width = (screen.width * 78 / 100).min(screen.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(2) as usize; // borders

    let cols = if inner_width >= 84 {
        3
    } else if inner_width >= 56 {
        2
    } else {
        1
    };
    let col_width = inner_width / cols;
    let sep_width = inner_width.saturating_sub(2);

    let lines = build_lines(app, cols, col_width, sep_width, &theme);

    // Size popup to fit content: lines + 2 (borders) + 1 (bottom padding)
    let content_height = lines.len() as u16 + 1;
    let popup_height = (content_height + 2).min(screen.height.saturating_sub(2));

    let area = centered_rect_exact(popup_width, popup_height, screen);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(i18n::tui_help_title())
        .style(theme.popup);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Build all the help content lines.
fn build_lines(
    app: &App,
    cols: usize,
    col_width: usize,
    sep_width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    // ── App header ─────────────────────────────────
    lines.push(Line::from(vec![
        Span::styled(format!("  {}", i18n::app_name()), theme.popup_title),
        Span::styled(format!("  v{VERSION}"), theme.help_dim),
        Span::styled(format!("  ({})", app.engine.mode().name()), theme.help_dim),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", i18n::tui_help_description()),
        theme.help_dim,
    )));
    lines.push(Line::from(""));

    let sections: [(&str, Vec<Shortcut>); 4] = [
        (
            i18n::tui_help_desk(),
            vec![
                Shortcut {
                    key: "Enter / o",
                    desc: i18n::tui_help_open_random(),
                },
                Shortcut {
                    key: "mouse",
                    desc: i18n::tui_help_mouse(),
                },
                Shortcut {
                    key: "A",
                    desc: i18n::tui_help_show_archive(),
                },
            ],
        ),
        (
            i18n::tui_help_letter(),
            vec![
                Shortcut {
                    key: "h",
                    desc: i18n::tui_help_heart(),
                },
                Shortcut {
                    key: "x",
                    desc: i18n::tui_help_store(),
                },
                Shortcut {
                    key: "p",
                    desc: i18n::tui_help_audio(),
                },
                Shortcut {
                    key: "j / k",
                    desc: i18n::tui_help_scroll(),
                },
                Shortcut {
                    key: "Esc",
                    desc: i18n::tui_help_back(),
                },
            ],
        ),
        (
            i18n::tui_help_archive(),
            vec![
                Shortcut {
                    key: "j / k",
                    desc: i18n::tui_help_next_prev(),
                },
                Shortcut {
                    key: "Enter",
                    desc: i18n::tui_help_open_selected(),
                },
                Shortcut {
                    key: "/",
                    desc: i18n::tui_help_search(),
                },
                Shortcut {
                    key: "f",
                    desc: i18n::tui_help_filter(),
                },
                Shortcut {
                    key: "s",
                    desc: i18n::tui_help_sort(),
                },
                Shortcut {
                    key: "Esc",
                    desc: i18n::tui_help_back(),
                },
            ],
        ),
        (
            i18n::tui_help_general(),
            vec![
                Shortcut {
                    key: "?",
                    desc: i18n::tui_help_this_help(),
                },
                Shortcut {
                    key: "q",
                    desc: i18n::tui_help_quit(),
                },
                Shortcut {
                    key: "Ctrl-C",
                    desc: i18n::tui_help_force_quit(),
                },
            ],
        ),
    ];

    for (title, shortcuts) in &sections {
        add_section_header(&mut lines, title, theme, sep_width);
        add_shortcuts_columns(&mut lines, shortcuts, cols, col_width, theme);
        lines.push(Line::from(""));
    }

    lines
}

/// Add a section header with a trailing separator line.
fn add_section_header(lines: &mut Vec<Line<'static>>, title: &str, theme: &Theme, width: usize) {
    let title_len = title.width() + 4;
    let remaining = width.saturating_sub(title_len);
    let sep = "\u{2500}".repeat(remaining);
    lines.push(Line::from(vec![
        Span::styled(format!("  {title} "), theme.help_section),
        Span::styled(sep, theme.help_dim),
    ]));
}

/// Lay out shortcuts in N columns per row.
fn add_shortcuts_columns(
    lines: &mut Vec<Line<'static>>,
    shortcuts: &[Shortcut],
    cols: usize,
    col_width: usize,
    theme: &Theme,
) {
    let key_w: usize = 10;

    for row in shortcuts.chunks(cols) {
        let mut spans: Vec<Span<'static>> = vec![Span::raw("  ")];

        for s in row {
            let padded_key = format!("{:>width$}", s.key, width = key_w);
            let desc_avail = col_width.saturating_sub(key_w + 3);
            let desc = super::truncate_str(s.desc, desc_avail);
            let padding = col_width.saturating_sub(key_w + 1 + desc.width()).max(1);

            spans.push(Span::styled(padded_key, theme.search_prompt));
            spans.push(Span::styled(format!(" {desc}"), theme.popup));
            spans.push(Span::raw(" ".repeat(padding)));
        }

        lines.push(Line::from(spans));
    }
}

/// Calculate a centered rectangle with exact dimensions, clamped to screen.
fn centered_rect_exact(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

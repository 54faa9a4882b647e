//! The cover card drawn over the pile of unseen letters.
//!
//! In scratch mode every terminal cell shows the block of surface pixels
//! beneath it: fully opaque blocks take the averaged cover color, fully
//! erased blocks show what lies under the card, and partly erased blocks
//! are drawn with shade glyphs.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::reveal::config::RevealConfig;
use crate::reveal::RevealKind;
use crate::tui::app::App;
use crate::tui::theme::color;

/// One cell of the card, before it is written to the buffer.
struct CardCell {
    symbol: char,
    fg: Color,
    bg: Color,
}

/// Render the card into `area` and register its placement for mouse input.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    app.place_card(area);

    let prompt = centered_row(app.reveal.texts.for_mode(app.reveal.mode), area, 0);
    let label = centered_row(&under_caption(&app.reveal), area, 1);
    let (cw, ch) = app.cell_px;
    let background = color(app.reveal.background);
    let ink = color(app.reveal.text_color);
    let radius = app.reveal.corner_radius;

    let buf = frame.buffer_mut();
    for dy in 0..area.height {
        for dx in 0..area.width {
            if outside_corner(dx, dy, area.width, area.height, radius) {
                continue;
            }
            let under = CardCell {
                symbol: label_char(&label, dx, dy).unwrap_or(' '),
                fg: ink,
                bg: background,
            };
            let cell = match app.engine.kind() {
                RevealKind::Scratch(card) => {
                    let (px, py) = (dx as u32 * cw, dy as u32 * ch);
                    let (opaque, avg) = card.surface().sample_block(px, py, cw, ch);
                    // Without a mask the prompt is drawn unclipped
                    let prompt_visible = card
                        .mask()
                        .map_or(true, |m| m.coverage(px, py, cw, ch) > 0.5);
                    let cover = color(avg.unwrap_or(card.cover_color()));
                    layer_cell(under, opaque, cover, ink)
                        .with_prompt(&prompt, dx, dy, prompt_visible && opaque > 0.5, ink)
                }
                _ if app.engine.is_uncovered() => under,
                _ => {
                    let cover = color(app.reveal.cover_color);
                    layer_cell(under, 1.0, cover, ink).with_prompt(&prompt, dx, dy, true, ink)
                }
            };
            put(buf, area.x + dx, area.y + dy, cell);
        }
    }
}

/// Text shown beneath the card. A terminal cannot draw the image itself,
/// so its file name stands in next to the label.
fn under_caption(reveal: &RevealConfig) -> String {
    match (&reveal.bottom.source, reveal.use_image) {
        (Some(source), true) => {
            let name = source.rsplit(['/', '\\']).next().unwrap_or(source);
            format!("{} [{name}]", reveal.bottom.label)
        }
        _ => reveal.bottom.label.clone(),
    }
}

/// Combine the content under the card with the cover layer.
fn layer_cell(under: CardCell, opaque: f32, cover: Color, ink: Color) -> CardCell {
    if opaque <= 0.0 {
        return under;
    }
    if opaque >= 1.0 {
        return CardCell {
            symbol: ' ',
            fg: ink,
            bg: cover,
        };
    }
    let symbol = if opaque < 0.34 {
        '\u{2591}' // ░
    } else if opaque < 0.67 {
        '\u{2592}' // ▒
    } else {
        '\u{2593}' // ▓
    };
    CardCell {
        symbol,
        fg: cover,
        bg: under.bg,
    }
}

impl CardCell {
    /// Overlay the prompt glyph for this cell, when the prompt covers it.
    fn with_prompt(self, prompt: &Row, dx: u16, dy: u16, visible: bool, ink: Color) -> Self {
        match label_char(prompt, dx, dy) {
            Some(c) if visible => Self {
                symbol: c,
                fg: ink,
                bg: self.bg,
            },
            _ => self,
        }
    }
}

/// A line of text positioned inside the card.
struct Row {
    y: u16,
    x: u16,
    chars: Vec<char>,
}

/// Center `text` horizontally; `offset` rows below the vertical middle.
fn centered_row(text: &str, area: Rect, offset: u16) -> Row {
    let text = super::truncate_str(text, area.width.saturating_sub(2) as usize);
    let width = UnicodeWidthStr::width(text.as_str()) as u16;
    let middle = area.height.saturating_sub(1) / 2;
    Row {
        y: (middle + offset).min(area.height.saturating_sub(1)),
        x: area.width.saturating_sub(width) / 2,
        // Wide glyphs would break the one-char-per-cell layout
        chars: text
            .chars()
            .map(|c| if c.width() == Some(1) { c } else { '?' })
            .collect(),
    }
}

fn label_char(row: &Row, dx: u16, dy: u16) -> Option<char> {
    if dy != row.y || dx < row.x {
        return None;
    }
    row.chars.get((dx - row.x) as usize).copied()
}

/// Cells cut away to round the corners: those whose distance to the
/// nearest corner, summed over both axes, is below `radius`.
fn outside_corner(dx: u16, dy: u16, width: u16, height: u16, radius: u16) -> bool {
    if radius == 0 {
        return false;
    }
    let from_x = dx.min(width.saturating_sub(1) - dx);
    let from_y = dy.min(height.saturating_sub(1) - dy);
    from_x + from_y < radius
}

fn put(buf: &mut Buffer, x: u16, y: u16, cell: CardCell) {
    if let Some(target) = buf.cell_mut((x, y)) {
        target.set_char(cell.symbol).set_fg(cell.fg).set_bg(cell.bg);
    }
}

//! TUI widgets for rendering different UI panels.

pub mod archive_list;
pub mod desk_view;
pub mod header_bar;
pub mod help_popup;
pub mod letter_view;
pub mod reveal_card;
pub mod search_bar;
pub mod sidebar;
pub mod status_bar;

use unicode_width::UnicodeWidthChar;

/// Truncate a string to fit within `max_width` display columns.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > max_width {
            if max_width > 0 {
                // Make room for the ellipsis
                while width + 1 > max_width {
                    match out.pop() {
                        Some(p) => width -= p.width().unwrap_or(0),
                        None => break,
                    }
                }
                out.push('\u{2026}');
            }
            return out;
        }
        width += cw;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 5), "hell\u{2026}");
        assert_eq!(truncate_str("abc", 0), "");
        assert_eq!(truncate_str("日本語テキスト", 5), "日本\u{2026}");
    }
}

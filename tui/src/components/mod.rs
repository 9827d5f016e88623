pub mod chat_view;
pub mod upload_area;

pub use chat_view::ChatView;
pub use upload_area::UploadArea;

use unicode_width::UnicodeWidthChar;

const THROBBER_FRAMES: [&str; 3] = ["●○○", "○●○", "○○●"];

/// Three-dot loading indicator, advanced by the tick counter.
pub fn throbber(tick: usize) -> &'static str {
    THROBBER_FRAMES[tick % THROBBER_FRAMES.len()]
}

/// Terminal cells taken by `text`.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// The part of a single-line input that fits in `width` cells while keeping
/// the cursor (a byte offset into `text`) on screen, and the cursor column
/// relative to that part.
pub fn input_window(text: &str, cursor: usize, width: usize) -> (&str, usize) {
    let width = width.max(1);
    let before = &text[..cursor];

    // One cell stays free for the cursor itself.
    let mut column = display_width(before);
    let mut start = 0;
    let mut dropped = before.char_indices();
    while column >= width {
        match dropped.next() {
            Some((offset, c)) => {
                column -= c.width().unwrap_or(0);
                start = offset + c.len_utf8();
            }
            None => break,
        }
    }

    let mut used = 0;
    let mut end = start;
    for (offset, c) in text[start..].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = start + offset + c.len_utf8();
    }

    (&text[start..end], column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_shown_whole() {
        assert_eq!(input_window("hello", 5, 20), ("hello", 5));
        assert_eq!(input_window("hello", 0, 20), ("hello", 0));
    }

    #[test]
    fn long_input_scrolls_to_keep_cursor_visible() {
        let text = format!("{}TAIL", "q".repeat(100));
        let (visible, column) = input_window(&text, text.len(), 76);
        assert!(visible.ends_with("TAIL"));
        assert_eq!(display_width(visible), 75);
        assert_eq!(column, 75);

        // Cursor back at the start shows the head again.
        let (visible, column) = input_window(&text, 0, 76);
        assert_eq!(visible, "q".repeat(76));
        assert_eq!(column, 0);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(display_width("文a"), 3);
        assert_eq!(input_window("文文文", 9, 4), ("文", 2));
    }
}

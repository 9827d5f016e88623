//! Chat screen: transcript pinned to the latest message plus the question
//! input.

use qa_client::chat_panel::INPUT_PLACEHOLDER;
use qa_client::{ChatPanel, MessageKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::{display_width, input_window, throbber};
use unicode_width::UnicodeWidthChar;

pub struct ChatView<'a> {
    panel: &'a ChatPanel,
    tick: usize,
}

impl<'a> ChatView<'a> {
    pub fn new(panel: &'a ChatPanel) -> Self {
        Self { panel, tick: 0 }
    }

    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    pub fn layout(area: Rect) -> [Rect; 2] {
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area)
    }

    pub fn cursor_position(area: Rect, panel: &ChatPanel) -> (u16, u16) {
        let input = Self::layout(area)[1];
        let inner_width = usize::from(input.width.saturating_sub(2));
        let (_, column) = input_window(panel.input(), panel.cursor(), inner_width);
        let column = column.min(inner_width.saturating_sub(1));
        // `column` now fits inside the input box, so it fits in a u16.
        (input.x + 1 + column as u16, input.y + 1)
    }

    fn message_lines(&self, width: usize) -> Vec<Line<'static>> {
        let transcript = self.panel.transcript();
        let visible = transcript.len() - self.panel.scroll_back().min(transcript.len());
        let mut lines = Vec::new();

        for message in &transcript[..visible] {
            let (label, style) = match message.kind {
                MessageKind::User => ("👤 You", Style::default().fg(Color::Cyan)),
                MessageKind::Bot => ("🤖 Bot", Style::default().fg(Color::Green)),
                MessageKind::Error => ("⚠ Error", Style::default().fg(Color::Red)),
            };

            lines.push(Line::from(Span::styled(
                label,
                style.add_modifier(Modifier::BOLD),
            )));
            for row in wrap_text(&message.content, width.saturating_sub(2)) {
                lines.push(Line::from(Span::styled(format!("  {}", row), style)));
            }
            lines.push(Line::from(""));
        }

        if self.panel.is_loading() && self.panel.scroll_back() == 0 {
            lines.push(Line::from(vec![
                Span::styled(
                    "🤖 Bot ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled(throbber(self.tick), Style::default().fg(Color::Green)),
            ]));
        }

        lines
    }

    fn render_messages(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Conversation")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.panel.transcript().is_empty() && !self.panel.is_loading() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "💬 Ask anything about the uploaded document",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        let lines = self.message_lines(inner.width as usize);
        // Keep the newest lines in view.
        let skip = lines.len().saturating_sub(inner.height as usize);
        Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>()).render(inner, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let loading = self.panel.is_loading();
        let (visible, _) = input_window(
            self.panel.input(),
            self.panel.cursor(),
            usize::from(area.width.saturating_sub(2)),
        );

        let content = if self.panel.input().is_empty() {
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else if loading {
            Span::styled(visible, Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(visible, Style::default().fg(Color::White))
        };

        let (title, border) = if loading {
            ("Question (waiting for answer)", Color::DarkGray)
        } else if self.panel.can_submit() {
            ("Question [Enter to send]", Color::Green)
        } else {
            ("Question", Color::Gray)
        };

        Paragraph::new(Line::from(content))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .render(area, buf);
    }
}

impl<'a> Widget for ChatView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [messages, input] = Self::layout(area);
        self.render_messages(messages, buf);
        self.render_input(input, buf);
    }
}

/// Greedy word wrap measured in terminal cells. Words wider than `width`
/// are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut row = String::new();
        let mut row_width = 0;

        for mut word in paragraph.split_whitespace() {
            let mut word_width = display_width(word);

            if row_width > 0 && row_width + 1 + word_width > width {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            while word_width > width {
                if row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                let (head, rest) = split_at_width(word, width);
                if rest.is_empty() {
                    break;
                }
                rows.push(head.to_string());
                word = rest;
                word_width = display_width(word);
            }

            if row_width > 0 {
                row.push(' ');
                row_width += 1;
            }
            row_width += word_width;
            row.push_str(word);
        }

        rows.push(row);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

// Longest prefix of `word` that fits in `width` cells; never empty.
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (offset, c) in word.char_indices() {
        let w = c.width().unwrap_or(0);
        if offset > 0 && used + w > width {
            return word.split_at(offset);
        }
        used += w;
    }
    (word, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("This is a test response", 10),
            vec!["This is a", "test", "response"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_text("文文文文", 5), vec!["文文", "文文"]);
        assert_eq!(wrap_text("ab 文文", 4), vec!["ab", "文文"]);

        let rows = wrap_text(&format!("{}END", "文".repeat(60)), 76);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| display_width(row) <= 76));
        assert!(rows[1].ends_with("END"));
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        assert_eq!(wrap_text("one\n\ntwo", 20), vec!["one", "", "two"]);
        assert_eq!(wrap_text("", 20), vec![""]);
    }
}

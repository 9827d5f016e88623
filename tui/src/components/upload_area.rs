//! Upload screen: drop zone, path input and status lines.

use qa_client::UploadWidget;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use super::{input_window, throbber};

pub const UPLOAD_HINT: &str = "Drag and drop a PDF file here or type its path";

pub struct UploadArea<'a> {
    widget: &'a UploadWidget,
    path_input: &'a str,
    tick: usize,
}

impl<'a> UploadArea<'a> {
    pub fn new(widget: &'a UploadWidget, path_input: &'a str) -> Self {
        Self {
            widget,
            path_input,
            tick: 0,
        }
    }

    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Splits `area` into drop zone, path input and status.
    pub fn layout(area: Rect) -> [Rect; 3] {
        Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .areas(area)
    }

    /// The part of `area` that reacts to mouse drags.
    pub fn drop_zone(area: Rect) -> Rect {
        Self::layout(area)[0]
    }

    /// Where the terminal cursor sits while typing a path.
    pub fn cursor_position(area: Rect, path_input: &str) -> (u16, u16) {
        let input = Self::layout(area)[1];
        let inner_width = usize::from(input.width.saturating_sub(2));
        let (_, column) = input_window(path_input, path_input.len(), inner_width);
        let column = column.min(inner_width.saturating_sub(1));
        (input.x + 1 + column as u16, input.y + 1)
    }

    fn render_drop_zone(&self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.widget.is_dragging() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled("📄", Style::default().fg(Color::Yellow))),
            Line::from(""),
            Line::from(Span::styled(
                UPLOAD_HINT,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(if self.widget.is_dragging() {
                        BorderType::Double
                    } else {
                        BorderType::Rounded
                    })
                    .border_style(border_style),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_path_input(&self, area: Rect, buf: &mut Buffer) {
        let content = if self.path_input.is_empty() {
            Span::styled("/path/to/document.pdf", Style::default().fg(Color::DarkGray))
        } else {
            // Typing always happens at the end of the path.
            let (visible, _) = input_window(
                self.path_input,
                self.path_input.len(),
                usize::from(area.width.saturating_sub(2)),
            );
            Span::styled(visible, Style::default().fg(Color::White))
        };

        Paragraph::new(Line::from(content))
            .block(
                Block::default()
                    .title("File")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray)),
            )
            .render(area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();

        if self.widget.is_uploading() {
            lines.push(Line::from(vec![
                Span::styled("Uploading ", Style::default().fg(Color::Cyan)),
                Span::styled(throbber(self.tick), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!(" {}%", self.widget.progress()),
                    Style::default().fg(Color::Gray),
                ),
            ]));
        }

        if let Some(error) = self.widget.error() {
            lines.push(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl<'a> Widget for UploadArea<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [drop_zone, input, status] = Self::layout(area);
        self.render_drop_zone(drop_zone, buf);
        self.render_path_input(input, buf);
        self.render_status(status, buf);
    }
}

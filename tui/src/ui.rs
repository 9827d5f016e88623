use crate::app::App;
use crate::components::{ChatView, UploadArea};
use qa_client::root_view::APP_TITLE;
use qa_client::View;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        APP_TITLE,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, header);

    let tick = app.tick();
    let help = match app.root().view() {
        View::Upload(widget) => {
            frame.render_widget(UploadArea::new(widget, app.path_input()).tick(tick), body);
            if !widget.is_uploading() {
                frame.set_cursor_position(UploadArea::cursor_position(body, app.path_input()));
            }
            "Enter: upload  Paste/drop a file: upload  Esc: quit"
        }
        View::Chat(panel) => {
            frame.render_widget(ChatView::new(panel).tick(tick), body);
            if !panel.is_loading() {
                frame.set_cursor_position(ChatView::cursor_position(body, panel));
            }
            "Enter: send  PgUp/PgDn: scroll  Esc: quit"
        }
    };

    frame.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        footer,
    );

    app.set_drop_zone(UploadArea::drop_zone(body));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use qa_client::{Answer, ApiError, PdfFile, QaBackend, QuestionRequest, UploadResult};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    // Accepts every upload. Questions get `answer`, or never settle without one.
    #[derive(Default)]
    struct ScriptedBackend {
        answer: Option<String>,
    }

    #[async_trait]
    impl QaBackend for ScriptedBackend {
        async fn upload_pdf(&self, _file: &PdfFile) -> Result<UploadResult, ApiError> {
            Ok(UploadResult(json!({ "success": true })))
        }

        async fn ask_question(&self, _request: &QuestionRequest) -> Result<Answer, ApiError> {
            match &self.answer {
                Some(answer) => Ok(Answer(json!({ "answer": answer }))),
                None => std::future::pending().await,
            }
        }
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Input(KeyEvent::new(code, KeyModifiers::NONE)))
            .await;
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    async fn chat_app(backend: ScriptedBackend) -> (App, mpsc::Receiver<Event>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let mut app = App::new(Arc::new(backend), tx);
        app.offer_file(&path.to_string_lossy(), false);
        // Loaded from disk, then uploaded.
        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            app.handle_event(event).await;
        }
        (app, rx)
    }

    #[tokio::test]
    async fn upload_screen_shows_title_and_hint() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = App::new(Arc::new(ScriptedBackend::default()), tx);

        let screen = render(&mut app);

        assert!(screen.contains(APP_TITLE));
        assert!(screen.contains(crate::components::upload_area::UPLOAD_HINT));
        assert!(!screen.contains(qa_client::chat_panel::INPUT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn upload_screen_shows_validation_error() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = App::new(Arc::new(ScriptedBackend::default()), tx);
        app.handle_event(Event::Paste(String::new())).await;

        assert!(render(&mut app).contains("Please upload a PDF file"));
    }

    #[tokio::test]
    async fn chat_screen_replaces_upload_screen() {
        let (mut app, _rx) = chat_app(ScriptedBackend::default()).await;

        let screen = render(&mut app);

        assert!(screen.contains(qa_client::chat_panel::INPUT_PLACEHOLDER));
        assert!(!screen.contains(crate::components::upload_area::UPLOAD_HINT));
    }

    #[tokio::test]
    async fn loading_indicator_shown_while_waiting() {
        let (mut app, _rx) = chat_app(ScriptedBackend::default()).await;
        type_text(&mut app, "Test question").await;
        press(&mut app, KeyCode::Enter).await;

        let screen = render(&mut app);

        assert!(screen.contains("Test question"));
        assert!(screen.contains("waiting for answer"));
        assert!(screen.contains(crate::components::throbber(0)));
    }

    #[tokio::test]
    async fn wide_character_answer_is_wrapped_not_clipped() {
        let answer = format!("{}END", "文".repeat(60));
        let (mut app, mut rx) = chat_app(ScriptedBackend {
            answer: Some(answer),
        })
        .await;
        type_text(&mut app, "Translate").await;
        press(&mut app, KeyCode::Enter).await;
        let answered = rx.recv().await.unwrap();
        app.handle_event(answered).await;

        let screen = render(&mut app);

        assert_eq!(screen.matches('文').count(), 60);
        assert!(screen.contains("END"));
    }

    #[tokio::test]
    async fn long_question_scrolls_to_show_its_end() {
        let (mut app, _rx) = chat_app(ScriptedBackend::default()).await;
        type_text(&mut app, &format!("{}TAIL", "q".repeat(100))).await;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, cursor.y)].symbol())
            .collect();
        assert!(row.contains("TAIL"));
        // Cursor sits just past the tail, inside the box.
        assert_eq!(buffer[(cursor.x - 1, cursor.y)].symbol(), "L");
        assert!(cursor.x < buffer.area.width - 1);
    }
}

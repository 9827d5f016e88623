use crate::api_client::{ApiError, QaBackend};
use crate::models::{Answer, Message, QuestionRequest};
use unicode_segmentation::UnicodeSegmentation;

pub const INPUT_PLACEHOLDER: &str = "Ask a question about the PDF...";

/// Transcript plus input line for questions about the uploaded document.
#[derive(Debug, Default)]
pub struct ChatPanel {
    transcript: Vec<Message>,
    input: String,
    // Byte offset into `input`, always on a grapheme boundary.
    cursor: usize,
    loading: bool,
    // How many messages the view is scrolled up from the latest one.
    scroll_back: usize,
    document_id: Option<String>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_id(mut self, document_id: Option<String>) -> Self {
        self.document_id = document_id;
        self
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the cursor into [`input`](Self::input).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        if self.loading {
            return;
        }
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, text: &str) {
        if self.loading {
            return;
        }
        // Single-line input: pasted newlines become spaces.
        let text = text.replace(['\r', '\n'], " ");
        self.input.insert_str(self.cursor, &text);
        self.cursor += text.len();
    }

    pub fn backspace(&mut self) {
        if self.loading || self.cursor == 0 {
            return;
        }
        let start = self.prev_boundary();
        self.input.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn delete(&mut self) {
        if self.loading || self.cursor >= self.input.len() {
            return;
        }
        let end = self.next_boundary();
        self.input.replace_range(self.cursor..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn prev_boundary(&self) -> usize {
        self.input[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.input[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
            .unwrap_or(self.cursor)
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_back + 1 < self.transcript.len() {
            self.scroll_back += 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }

    pub fn scroll_to_latest(&mut self) {
        self.scroll_back = 0;
    }

    fn push(&mut self, message: Message) {
        self.transcript.push(message);
        self.scroll_to_latest();
    }

    /// Takes the current input as a question. Returns `None` when nothing
    /// should be sent: blank input or a question already in flight.
    pub fn begin_submit(&mut self) -> Option<QuestionRequest> {
        if self.loading {
            log::debug!("Question already in flight, ignoring submit");
            return None;
        }

        let question = self.input.trim().to_string();
        if question.is_empty() {
            return None;
        }

        self.input.clear();
        self.cursor = 0;
        self.push(Message::user(question.clone()));
        self.loading = true;

        Some(QuestionRequest::new(question).with_document_id(self.document_id.as_deref()))
    }

    pub fn finish_submit(&mut self, result: Result<Answer, ApiError>) {
        if !self.loading {
            log::warn!("Answer arrived with no question in flight");
            return;
        }
        self.loading = false;

        match result {
            Ok(answer) => self.push(Message::bot(answer.text())),
            Err(e) => self.push(Message::error(e.to_string())),
        }
    }

    /// Runs a whole submit against `backend`. Returns whether a question was
    /// sent.
    pub async fn submit<B>(&mut self, backend: &B) -> bool
    where
        B: QaBackend + ?Sized,
    {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let result = backend.ask_question(&request).await;
        self.finish_submit(result);
        true
    }
}

use anyhow::Result;
use crossterm::event::{Event as TermEvent, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use qa_client::{Answer, ApiError, PdfFile, UploadResult};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum Event {
    Input(KeyEvent),
    /// Bracketed paste. Terminals deliver a dropped file as its pasted path.
    Paste(String),
    Mouse(MouseEvent),
    Resize,
    /// A candidate file finished loading from disk.
    FileLoaded {
        file: Result<PdfFile>,
        dropped: bool,
    },
    Uploaded(Result<UploadResult, ApiError>),
    Answered(Result<Answer, ApiError>),
    Tick,
}

pub struct EventHandler {
    pub tx: mpsc::Sender<Event>,
}

impl EventHandler {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub async fn run_terminal_listener(&self) -> Result<()> {
        let mut reader = crossterm::event::EventStream::new();

        while let Some(event) = reader.next().await {
            let event = match event? {
                // Only presses; repeats and releases are noise here.
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Input(key),
                TermEvent::Paste(text) => Event::Paste(text),
                TermEvent::Mouse(mouse) => Event::Mouse(mouse),
                TermEvent::Resize(_, _) => Event::Resize,
                _ => continue,
            };
            if self.tx.send(event).await.is_err() {
                break;
            }
        }

        Ok(())
    }

    pub async fn run_ticker(&self, tick_rate: Duration) {
        let mut interval = tokio::time::interval(tick_rate);

        loop {
            interval.tick().await;
            if self.tx.send(Event::Tick).await.is_err() {
                break;
            }
        }
    }
}

use crate::event::{Event, EventHandler};
use crate::ui;
use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, KeyCode,
    KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use qa_client::{
    declared_mime_type, is_pdf_type, PdfFile, QaBackend, QuestionRequest, RootView, View,
};
use ratatui::{backend::CrosstermBackend, layout::Position, layout::Rect, Terminal};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(300);

pub struct App {
    root: RootView,
    backend: Arc<dyn QaBackend>,
    tx: mpsc::Sender<Event>,
    path_input: String,
    drop_zone: Rect,
    tick: usize,
    running: bool,
}

impl App {
    pub fn new(backend: Arc<dyn QaBackend>, tx: mpsc::Sender<Event>) -> Self {
        Self {
            root: RootView::new(),
            backend,
            tx,
            path_input: String::new(),
            drop_zone: Rect::default(),
            tick: 0,
            running: true,
        }
    }

    pub fn root(&self) -> &RootView {
        &self.root
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_drop_zone(&mut self, area: Rect) {
        self.drop_zone = area;
    }

    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Input(key) => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FileLoaded { file, dropped } => self.accept_loaded(file, dropped),
            Event::Uploaded(result) => {
                let Some(widget) = self.root.upload_widget_mut() else {
                    return;
                };
                if let Some(result) = widget.finish_upload(result) {
                    self.path_input.clear();
                    self.root.on_upload_success(result);
                }
            }
            Event::Answered(result) => {
                if let Some(panel) = self.root.chat_panel_mut() {
                    panel.finish_submit(result);
                }
            }
            Event::Tick => self.tick = self.tick.wrapping_add(1),
            Event::Resize => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.running = false;
            return;
        }
        if matches!(key.code, KeyCode::Char(_)) && !is_text_input(key.modifiers) {
            return;
        }

        match self.root.view_mut() {
            View::Upload(widget) => {
                if widget.is_uploading() {
                    return;
                }
                match key.code {
                    KeyCode::Char(c) => self.path_input.push(c),
                    KeyCode::Backspace => {
                        self.path_input.pop();
                    }
                    KeyCode::Enter => {
                        let raw = self.path_input.clone();
                        self.offer_file(&raw, false);
                    }
                    _ => {}
                }
            }
            View::Chat(panel) => match key.code {
                KeyCode::Char(c) => panel.insert_char(c),
                KeyCode::Backspace => panel.backspace(),
                KeyCode::Delete => panel.delete(),
                KeyCode::Left => panel.move_cursor_left(),
                KeyCode::Right => panel.move_cursor_right(),
                KeyCode::Home => panel.move_cursor_home(),
                KeyCode::End => panel.move_cursor_end(),
                KeyCode::Up | KeyCode::PageUp => panel.scroll_up(),
                KeyCode::Down | KeyCode::PageDown => panel.scroll_down(),
                KeyCode::Enter => {
                    if let Some(request) = panel.begin_submit() {
                        self.spawn_question(request);
                    }
                }
                _ => {}
            },
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match self.root.view_mut() {
            View::Upload(_) => self.offer_file(text, true),
            View::Chat(panel) => panel.insert_str(text),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let inside = self.drop_zone.contains(Position::new(mouse.column, mouse.row));

        match self.root.view_mut() {
            View::Upload(widget) => match mouse.kind {
                MouseEventKind::Drag(_) if inside => widget.drag_over(),
                MouseEventKind::Drag(_) | MouseEventKind::Moved | MouseEventKind::Up(_) => {
                    if widget.is_dragging() {
                        widget.drag_leave();
                    }
                }
                _ => {}
            },
            View::Chat(panel) => match mouse.kind {
                MouseEventKind::ScrollUp => panel.scroll_up(),
                MouseEventKind::ScrollDown => panel.scroll_down(),
                _ => {}
            },
        }
    }

    /// Offers the file named by `raw` to the upload widget, through the drop
    /// channel when `dropped`. The declared type is checked before anything
    /// is read; PDFs are then loaded on a background task.
    pub fn offer_file(&mut self, raw: &str, dropped: bool) {
        let Some(widget) = self.root.upload_widget_mut() else {
            return;
        };
        if widget.is_uploading() {
            log::debug!("Upload already in flight, ignoring {:?}", raw);
            return;
        }

        match parse_file_path(raw) {
            Some(path) if is_pdf_type(declared_mime_type(&path)) => {
                if dropped {
                    widget.drag_leave();
                }
                self.spawn_load(path, dropped);
            }
            Some(path) => {
                log::info!("Rejected {} by its declared type", path.display());
                self.start_upload(None, dropped);
            }
            None => self.start_upload(None, dropped),
        }
    }

    fn accept_loaded(&mut self, file: Result<PdfFile>, dropped: bool) {
        match file {
            Ok(file) => self.start_upload(Some(file), dropped),
            Err(e) => {
                log::warn!("{:#}", e);
                if let Some(widget) = self.root.upload_widget_mut() {
                    if !widget.is_uploading() {
                        widget.set_error(e.to_string());
                    }
                }
            }
        }
    }

    fn start_upload(&mut self, file: Option<PdfFile>, dropped: bool) {
        let Some(widget) = self.root.upload_widget_mut() else {
            return;
        };
        let accepted = if dropped {
            widget.begin_drop(file)
        } else {
            widget.begin_upload(file)
        };

        if let Some(file) = accepted {
            self.spawn_upload(file);
        }
    }

    fn spawn_load(&self, path: PathBuf, dropped: bool) {
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let file = PdfFile::from_path(&path).await;
            if tx.send(Event::FileLoaded { file, dropped }).await.is_err() {
                log::debug!("UI gone before {} was loaded", path.display());
            }
        });
    }

    fn spawn_upload(&self, file: PdfFile) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = backend.upload_pdf(&file).await;
            if tx.send(Event::Uploaded(result)).await.is_err() {
                log::debug!("UI gone before upload of {} settled", file.file_name);
            }
        });
    }

    fn spawn_question(&self, request: QuestionRequest) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = backend.ask_question(&request).await;
            if tx.send(Event::Answered(result)).await.is_err() {
                log::debug!("UI gone before question settled");
            }
        });
    }
}

/// Turns typed or pasted text into a path. Terminals paste dropped files
/// quoted, backslash-escaped or as `file://` URLs; only the first one is
/// taken.
pub fn parse_file_path(raw: &str) -> Option<PathBuf> {
    let first = raw.lines().map(str::trim).find(|line| !line.is_empty())?;

    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| {
            first
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(first);

    if unquoted.starts_with("file://") {
        return reqwest::Url::parse(unquoted).ok()?.to_file_path().ok();
    }

    let mut unescaped = String::with_capacity(unquoted.len());
    let mut chars = unquoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if !cfg!(windows) => {
                if let Some(next) = chars.next() {
                    unescaped.push(next);
                }
            }
            other => unescaped.push(other),
        }
    }

    if unescaped.is_empty() {
        None
    } else {
        Some(PathBuf::from(unescaped))
    }
}

// Ctrl or Alt alone marks a shortcut. Both together is how AltGr characters
// arrive on some platforms.
fn is_text_input(modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    ctrl == alt
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(
        std::io::stdout(),
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        std::io::stdout(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    Ok(())
}

pub async fn run(backend: Arc<dyn QaBackend>, initial_file: Option<PathBuf>) -> Result<()> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(100);
    let mut app = App::new(backend, tx.clone());

    let terminal_events = EventHandler::new(tx.clone());
    tokio::spawn(async move {
        if let Err(e) = terminal_events.run_terminal_listener().await {
            log::error!("Terminal event error: {:#}", e);
        }
    });
    let ticks = EventHandler::new(tx);
    tokio::spawn(async move { ticks.run_ticker(TICK_RATE).await });

    if let Some(path) = initial_file {
        app.offer_file(&path.to_string_lossy(), false);
    }

    let result = event_loop(&mut terminal, &mut app, &mut rx).await;
    restore_terminal()?;
    log::info!("Session ended");
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App, rx: &mut mpsc::Receiver<Event>) -> Result<()> {
    while app.is_running() {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match rx.recv().await {
            Some(event) => app.handle_event(event).await,
            None => break,
        }
    }
    Ok(())
}

use crate::chat_panel::ChatPanel;
use crate::models::UploadResult;
use crate::upload_widget::UploadWidget;

pub const APP_TITLE: &str = "PDF Document QA Chatbot";

/// What the session knows about the uploaded document. Set once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub file_uploaded: bool,
    pub document_id: Option<String>,
}

#[derive(Debug)]
pub enum View {
    Upload(UploadWidget),
    Chat(ChatPanel),
}

#[derive(Debug)]
pub struct RootView {
    session: Session,
    view: View,
}

impl Default for RootView {
    fn default() -> Self {
        Self::new()
    }
}

impl RootView {
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            view: View::Upload(UploadWidget::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn upload_widget_mut(&mut self) -> Option<&mut UploadWidget> {
        match &mut self.view {
            View::Upload(widget) => Some(widget),
            View::Chat(_) => None,
        }
    }

    pub fn chat_panel_mut(&mut self) -> Option<&mut ChatPanel> {
        match &mut self.view {
            View::Chat(panel) => Some(panel),
            View::Upload(_) => None,
        }
    }

    /// Success notification from the upload widget. Switches to the chat
    /// panel for the rest of the session.
    pub fn on_upload_success(&mut self, result: UploadResult) {
        if self.session.file_uploaded {
            log::debug!("Session already has a document, ignoring upload result");
            return;
        }

        self.session = Session {
            file_uploaded: true,
            document_id: result.document_id().map(str::to_string),
        };
        log::info!(
            "Document uploaded (id: {}), switching to chat",
            self.session.document_id.as_deref().unwrap_or("none")
        );

        self.view = View::Chat(ChatPanel::new().with_document_id(self.session.document_id.clone()));
    }
}

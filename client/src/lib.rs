pub mod api_client;
pub mod chat_panel;
pub mod config;
pub mod models;
pub mod root_view;
pub mod upload_widget;

pub use api_client::{ApiClient, ApiError, QaBackend};
pub use chat_panel::ChatPanel;
pub use config::ClientConfig;
pub use models::*;
pub use root_view::{RootView, Session, View};
pub use upload_widget::UploadWidget;

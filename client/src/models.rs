use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Bot,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            content: content.into(),
        }
    }
}

/// A candidate file handed to the upload widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub file_name: String,
    /// Declared type, derived from the extension the way a browser would.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub async fn from_path(file_path: &Path) -> Result<Self> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .with_context(|| format!("{} does not name a file", file_path.display()))?;

        let bytes = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Could not read {}", file_path.display()))?;

        log::debug!("Loaded {} ({} bytes)", file_name, bytes.len());

        Ok(Self {
            mime_type: declared_mime_type(file_path).to_string(),
            file_name,
            bytes,
        })
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_type(&self.mime_type)
    }
}

pub fn is_pdf_type(mime_type: &str) -> bool {
    mime_type.contains("pdf")
}

/// MIME type a path declares through its extension. Never touches the file.
pub fn declared_mime_type(file_path: &Path) -> &'static str {
    let extension = file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Payload returned by the upload endpoint. Only an optional `file_id` is
/// looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadResult(pub Value);

impl UploadResult {
    pub fn document_id(&self) -> Option<&str> {
        self.0.get("file_id").and_then(Value::as_str)
    }
}

/// Payload returned by the question endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answer(pub Value);

impl Answer {
    pub fn text(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => match other.get("answer") {
                Some(Value::String(answer)) => answer.clone(),
                _ => other.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

impl QuestionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            document_id: None,
        }
    }

    pub fn with_document_id(mut self, document_id: Option<&str>) -> Self {
        self.document_id = document_id.map(str::to_string);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

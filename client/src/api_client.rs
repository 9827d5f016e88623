use crate::config::ClientConfig;
use crate::models::*;
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Uniform failure for both backend calls. The display text is what the
/// user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Error uploading PDF: {0}")]
    Upload(String),
    #[error("Error getting answer: {0}")]
    Question(String),
}

/// The two calls the UI makes against the backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QaBackend: Send + Sync {
    async fn upload_pdf(&self, file: &PdfFile) -> Result<UploadResult, ApiError>;
    async fn ask_question(&self, request: &QuestionRequest) -> Result<Answer, ApiError>;
}

pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_upload(&self, file: &PdfFile) -> Result<UploadResult, String> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| e.to_string())?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            log_rejection("upload", response).await;
            return Err("PDF upload failed".to_string());
        }

        response.json().await.map_err(|e| e.to_string())
    }

    async fn send_question(&self, request: &QuestionRequest) -> Result<Answer, String> {
        let response = self
            .client
            .post(self.config.endpoint("question"))
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            log_rejection("question", response).await;
            return Err("Failed to get answer".to_string());
        }

        response.json().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl QaBackend for ApiClient {
    async fn upload_pdf(&self, file: &PdfFile) -> Result<UploadResult, ApiError> {
        log::info!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());

        let result = self.send_upload(file).await.map_err(ApiError::Upload);
        match &result {
            Ok(_) => log::info!("Upload of {} accepted", file.file_name),
            Err(e) => log::warn!("{}", e),
        }
        result
    }

    async fn ask_question(&self, request: &QuestionRequest) -> Result<Answer, ApiError> {
        log::info!("Asking question ({} chars)", request.question.chars().count());

        let result = self.send_question(request).await.map_err(ApiError::Question);
        if let Err(e) = &result {
            log::warn!("{}", e);
        }
        result
    }
}

// The backend's reason is only logged; the user gets the fixed message.
async fn log_rejection(endpoint: &str, response: Response) {
    let status = response.status();
    let detail = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.detail)
            .unwrap_or(body),
        Err(e) => e.to_string(),
    };
    log::warn!("Backend rejected /{} with {}: {}", endpoint, status, detail);
}
